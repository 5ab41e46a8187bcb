use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::{Notification, NotificationLevel, RenderedNavLink};

/// ControlHandler
///
/// Something that reacts to a click on a page control.
#[async_trait]
pub trait ControlHandler: Send + Sync {
    async fn on_click(&self);
}

/// A control node. Replacing the node drops every handler bound to it.
#[derive(Default)]
struct ControlNode {
    generation: u64,
    handlers: Vec<Arc<dyn ControlHandler>>,
}

#[derive(Default)]
struct PageState {
    title: String,
    page_title: String,
    content: Option<String>,
    header_visible: bool,
    nav_visible: bool,
    footer_visible: bool,
    nav_links: Vec<RenderedNavLink>,
    logout: ControlNode,
    notifications: Vec<Notification>,
    renders: Vec<String>,
}

/// Document
///
/// The page the shell draws into: a single content region plus the shared
/// chrome (header, nav, footer, page title, logout control) and the toast
/// area. Cloning yields another handle on the same page.
#[derive(Clone, Default)]
pub struct Document {
    state: Arc<Mutex<PageState>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn page(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // --- Content region ---

    /// Replaces the content region's markup and records the write.
    pub fn mount(&self, html: String) {
        let mut page = self.page();
        page.renders.push(html.clone());
        page.content = Some(html);
    }

    pub fn content(&self) -> Option<String> {
        self.page().content.clone()
    }

    /// Every markup string ever written to the content region, oldest first.
    pub fn render_history(&self) -> Vec<String> {
        self.page().renders.clone()
    }

    // --- Titles ---

    pub fn set_title(&self, title: &str) {
        self.page().title = title.to_string();
    }

    pub fn title(&self) -> String {
        self.page().title.clone()
    }

    /// The visible heading inside the header bar.
    pub fn set_page_title(&self, title: &str) {
        self.page().page_title = title.to_string();
    }

    pub fn page_title(&self) -> String {
        self.page().page_title.clone()
    }

    // --- Chrome visibility ---

    pub fn set_chrome(&self, header: bool, nav: bool, footer: bool) {
        let mut page = self.page();
        page.header_visible = header;
        page.nav_visible = nav;
        page.footer_visible = footer;
    }

    pub fn header_visible(&self) -> bool {
        self.page().header_visible
    }

    pub fn nav_visible(&self) -> bool {
        self.page().nav_visible
    }

    pub fn footer_visible(&self) -> bool {
        self.page().footer_visible
    }

    // --- Navigation bar ---

    pub fn set_nav_links(&self, links: Vec<RenderedNavLink>) {
        self.page().nav_links = links;
    }

    pub fn nav_links(&self) -> Vec<RenderedNavLink> {
        self.page().nav_links.clone()
    }

    // --- Logout control ---

    /// replace_logout_control
    ///
    /// Swaps the logout node for a fresh one, discarding all bound handlers.
    /// Returns the new node's generation.
    pub fn replace_logout_control(&self) -> u64 {
        let mut page = self.page();
        let generation = page.logout.generation + 1;
        page.logout = ControlNode {
            generation,
            handlers: Vec::new(),
        };
        generation
    }

    pub fn bind_logout(&self, handler: Arc<dyn ControlHandler>) {
        self.page().logout.handlers.push(handler);
    }

    pub fn logout_handler_count(&self) -> usize {
        self.page().logout.handlers.len()
    }

    /// click_logout
    ///
    /// Fires every handler bound to the current logout node and returns how
    /// many ran. The page lock is released before any handler runs.
    pub async fn click_logout(&self) -> usize {
        let handlers = self.page().logout.handlers.clone();
        for handler in &handlers {
            handler.on_click().await;
        }
        handlers.len()
    }

    // --- Notifications ---

    pub fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        let notification = Notification::new(level, message);
        tracing::debug!(level = ?notification.level, message = %notification.message, "notification raised");
        self.page().notifications.push(notification);
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.page().notifications.clone()
    }
}
