use crate::{AppState, handlers};
use axum::{Router, routing::get};
use tower_http::services::ServeDir;

/// Public Router Module
///
/// Serves the view templates the content loader fetches. Every route's
/// `template` path resolves below `/views`; a missing file is a plain 404,
/// which the loader treats as a hard failure. `ServeDir` refuses paths that
/// climb out of the template directory.
pub fn public_routes(template_dir: &str) -> Router<AppState> {
    Router::new()
        // GET /health
        .route("/health", get(handlers::health))
        // GET /views/{file}
        .nest_service("/views", ServeDir::new(template_dir))
}
