use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// API Router Module
///
/// Route metadata for browser shells that want to share the server's route
/// table instead of carrying their own copy.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // GET /api/routes
        // The full manifest in registration order.
        .route("/routes", get(handlers::get_routes))
        // GET /api/nav/{role}
        // Ordered links for one role; 404 for an unknown tag.
        .route("/nav/{role}", get(handlers::get_nav_links))
}
