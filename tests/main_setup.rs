use serial_test::serial;
use std::{env, panic};
use sushi_burrito::{AppConfig, config::Env};

const VARS: [&str; 5] = [
    "APP_ENV",
    "BIND_ADDRESS",
    "TEMPLATE_DIR",
    "TEMPLATE_BASE_URL",
    "SESSION_FILE",
];

// --- Setup/Teardown Utilities ---

/// Runs `test` with the given variables set (and every other config variable
/// cleared), then restores the original environment.
fn run_with_env<T, R>(vars: &[(&str, &str)], test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> =
        VARS.iter().map(|&var| (var, env::var(var).ok())).collect();

    unsafe {
        for var in VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals {
        unsafe {
            match original_value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_production_fail_fast() {
    let result = run_with_env(
        &[
            ("APP_ENV", "production"),
            ("TEMPLATE_BASE_URL", "https://pos.example.com"),
        ],
        || panic::catch_unwind(AppConfig::load),
    );
    assert!(
        result.is_err(),
        "Production config loading should panic without TEMPLATE_DIR"
    );
}

#[test]
#[serial]
fn test_production_base_url_falls_back_to_bind_port() {
    let config = run_with_env(
        &[
            ("APP_ENV", "production"),
            ("TEMPLATE_DIR", "/srv/views"),
            ("BIND_ADDRESS", "0.0.0.0:8443"),
        ],
        AppConfig::load,
    );
    assert_eq!(config.env, Env::Production);
    assert_eq!(config.template_base_url, "http://localhost:8443");
}

#[test]
#[serial]
fn test_app_config_production_with_base_url() {
    let config = run_with_env(
        &[
            ("APP_ENV", "production"),
            ("TEMPLATE_BASE_URL", "https://pos.example.com"),
            ("TEMPLATE_DIR", "/srv/views"),
        ],
        AppConfig::load,
    );
    assert_eq!(config.env, Env::Production);
    assert_eq!(config.template_base_url, "https://pos.example.com");
    assert_eq!(config.template_dir, "/srv/views");
}

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    let config = run_with_env(&[("APP_ENV", "local")], AppConfig::load);

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.bind_address, "0.0.0.0:3000");
    assert_eq!(config.template_dir, "views");
    assert_eq!(config.template_base_url, "http://localhost:3000");
    assert_eq!(config.session_file, ".session.json");
}

#[test]
#[serial]
fn test_local_base_url_follows_bind_port() {
    let config = run_with_env(&[("BIND_ADDRESS", "127.0.0.1:8080")], AppConfig::load);
    assert_eq!(config.env, Env::Local);
    assert_eq!(config.template_base_url, "http://localhost:8080");
}
