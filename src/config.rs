use std::env;

/// AppConfig
///
/// Holds the application's configuration. Immutable once loaded and shared
/// with handlers through `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects log format and fail-fast rules.
    pub env: Env,
    // Address the HTTP server binds to.
    pub bind_address: String,
    // Directory whose files are served under `/views`.
    pub template_dir: String,
    // Origin `ContentLoader::from_config` fetches templates from.
    pub template_base_url: String,
    // File `ContentLoader::from_config` keeps the session in.
    pub session_file: String,
}

/// Env
///
/// Defines the runtime context.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Non-panicking values for tests; nothing is read from the environment.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_address: "127.0.0.1:3000".to_string(),
            template_dir: "views".to_string(),
            template_base_url: "http://localhost:3000".to_string(),
            session_file: ".session.json".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics in production if `TEMPLATE_DIR` is not set.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let template_dir = match env {
            Env::Production => {
                env::var("TEMPLATE_DIR").expect("FATAL: TEMPLATE_DIR must be set in production.")
            }
            Env::Local => env::var("TEMPLATE_DIR").unwrap_or_else(|_| "views".to_string()),
        };

        let template_base_url = env::var("TEMPLATE_BASE_URL").unwrap_or_else(|_| {
            let port = bind_address.rsplit(':').next().unwrap_or("3000");
            let url = format!("http://localhost:{port}");
            if env == Env::Production {
                tracing::warn!(%url, "TEMPLATE_BASE_URL not set, using the bind port");
            }
            url
        });

        Self {
            env,
            template_dir,
            session_file: env::var("SESSION_FILE")
                .unwrap_or_else(|_| ".session.json".to_string()),
            template_base_url,
            bind_address,
        }
    }
}
