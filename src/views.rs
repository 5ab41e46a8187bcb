use async_trait::async_trait;
use std::sync::Arc;

use crate::document::Document;
use crate::error::ControllerError;
use crate::router::fragment::QueryParams;
use crate::router::navigator::Navigator;
use crate::session::SessionContext;

/// ViewContext
///
/// Everything a view controller may touch: the page it was mounted into, the
/// query parameters of the fragment that opened it, the session and a way to
/// navigate onwards.
#[derive(Clone)]
pub struct ViewContext {
    pub path: String,
    pub query: QueryParams,
    pub document: Document,
    pub session: SessionContext,
    pub navigator: Navigator,
}

/// ViewController
///
/// Per-page logic that runs after the page's template has been mounted.
/// Returning an error sends the user to the not-found view.
#[async_trait]
pub trait ViewController: Send + Sync {
    async fn mount(&self, ctx: ViewContext) -> Result<(), ControllerError>;
}

/// ControllerState
///
/// The concrete type a route keeps its controller in.
pub type ControllerState = Arc<dyn ViewController>;
