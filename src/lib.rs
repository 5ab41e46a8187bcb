use axum::{Router, extract::FromRef, http::HeaderName};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Client shell core: routing, chrome and the page model it draws into.
pub mod document;
pub mod router;
pub mod session;
pub mod templates;
pub mod views;

// Shared types and errors.
pub mod error;
pub mod models;

// HTTP surface serving templates and route metadata.
pub mod config;
pub mod handlers;
pub mod routes;
use routes::{api, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use document::Document;
pub use router::{ContentLoader, Navigator, RouteTable, restaurant_routes};
pub use session::{FileSessionStore, MemorySessionStore, SessionContext};
pub use templates::{HttpTemplateSource, StaticTemplateSource};

/// ApiDoc
///
/// OpenAPI document for the template server, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::health, handlers::get_routes, handlers::get_nav_links),
    components(schemas(
        models::Role,
        models::NavLink,
        models::RouteManifestEntry,
    )),
    tags((name = "sushi-burrito", description = "Sushi Burrito shell API"))
)]
struct ApiDoc;

/// RouteTableState
///
/// The route table shared with handlers.
pub type RouteTableState = Arc<RouteTable>;

/// AppState
///
/// The single state container shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// The route table the manifest endpoints describe.
    pub routes: RouteTableState,
    /// Configuration: The loaded, immutable environment configuration.
    pub config: AppConfig,
}

impl FromRef<AppState> for RouteTableState {
    fn from_ref(app_state: &AppState) -> RouteTableState {
        app_state.routes.clone()
    }
}

/// create_router
///
/// Assembles the HTTP routes, applies the observability layers and registers
/// the application state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes(&state.config.template_dir))
        .nest("/api", api::api_routes())
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`: method, URI and the request id, so every
/// log line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
