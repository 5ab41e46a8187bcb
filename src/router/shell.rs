use async_trait::async_trait;
use std::sync::Arc;

use super::nav;
use super::navigator::Navigator;
use super::table::Route;
use crate::document::{ControlHandler, Document};
use crate::models::Role;
use crate::session::SessionContext;

/// LogoutHandler
///
/// Bound to the header's logout control: clears the session and sends the
/// user to the login page.
struct LogoutHandler {
    session: SessionContext,
    navigator: Navigator,
    login_path: String,
}

#[async_trait]
impl ControlHandler for LogoutHandler {
    async fn on_click(&self) {
        if let Err(e) = self.session.logout().await {
            tracing::error!(error = %e, "failed to clear session on logout");
        }
        self.navigator.navigate_to(&self.login_path);
    }
}

/// SharedUi
///
/// Keeps the chrome around the content region (header, nav, footer, page
/// title, logout control) in step with the route that was just rendered.
#[derive(Clone)]
pub struct SharedUi {
    document: Document,
    session: SessionContext,
    navigator: Navigator,
    login_path: String,
}

impl SharedUi {
    pub fn new(
        document: Document,
        session: SessionContext,
        navigator: Navigator,
        login_path: &str,
    ) -> Self {
        Self {
            document,
            session,
            navigator,
            login_path: login_path.to_string(),
        }
    }

    /// update
    ///
    /// Footer is always shown; header and nav only for signed-in users. The
    /// logout node is replaced before binding so handlers never accumulate.
    pub fn update(&self, is_authenticated: bool, role: Option<Role>, route: &Route) {
        self.document
            .set_chrome(is_authenticated, is_authenticated, true);
        self.document.set_page_title(&route.title);

        self.document.replace_logout_control();
        self.document.bind_logout(Arc::new(LogoutHandler {
            session: self.session.clone(),
            navigator: self.navigator.clone(),
            login_path: self.login_path.clone(),
        }));

        let role = if is_authenticated { role } else { None };
        nav::render(&self.document, role, &route.path);
    }
}
