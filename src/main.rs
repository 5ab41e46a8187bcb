use std::sync::Arc;
use sushi_burrito::{
    AppState,
    config::{AppConfig, Env},
    create_router, restaurant_routes,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point: configuration, logging, route table, then the HTTP server
/// that hands the browser shell its templates and route metadata.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sushi_burrito=debug,tower_http=info,axum=info".into());

    // 3. Pretty logs locally, JSON in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Route Table
    let routes = restaurant_routes()
        .build()
        .expect("FATAL: the built-in route table is inconsistent.");
    tracing::info!(
        routes = routes.routes().count(),
        template_dir = %config.template_dir,
        "route table loaded"
    );

    // 5. Router and Server Startup
    let bind_address = config.bind_address.clone();
    let app = create_router(AppState {
        routes: Arc::new(routes),
        config,
    });

    let listener = TcpListener::bind(&bind_address)
        .await
        .expect("FATAL: could not bind the HTTP listener.");

    tracing::info!("Listening on {}", bind_address);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
