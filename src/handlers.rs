use crate::{
    RouteTableState,
    models::{NavLink, Role, RouteManifestEntry},
    router::nav,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

// --- Handlers ---

/// health
///
/// [Public Route] Liveness probe for load balancers.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}

/// get_routes
///
/// [Public Route] The route table as the client shell sees it: path, template,
/// title and access policy of every registered route, in registration order.
#[utoipa::path(
    get,
    path = "/api/routes",
    responses((status = 200, description = "Route manifest", body = [RouteManifestEntry]))
)]
pub async fn get_routes(State(routes): State<RouteTableState>) -> Json<Vec<RouteManifestEntry>> {
    Json(routes.manifest())
}

/// get_nav_links
///
/// [Public Route] The ordered navigation bar for a role tag.
/// Unknown tags answer 404 rather than an empty bar so typos are visible.
#[utoipa::path(
    get,
    path = "/api/nav/{role}",
    params(("role" = String, Path, description = "Role tag: admin, waiter or kitchen")),
    responses(
        (status = 200, description = "Navigation links", body = [NavLink]),
        (status = 404, description = "Unknown role")
    )
)]
pub async fn get_nav_links(Path(role): Path<String>) -> Result<Json<Vec<NavLink>>, StatusCode> {
    let role = role.parse::<Role>().map_err(|e| {
        tracing::debug!(error = %e, "navigation requested for unknown role");
        StatusCode::NOT_FOUND
    })?;
    Ok(Json(nav::links_for(Some(role))))
}
