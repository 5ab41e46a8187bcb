use crate::document::Document;
use crate::models::{NavLink, RenderedNavLink, Role};

/// links_for
///
/// The ordered navigation bar for a role. An unrecognized role gets nothing.
pub fn links_for(role: Option<Role>) -> Vec<NavLink> {
    match role {
        Some(Role::Admin) => vec![
            NavLink::to("/dashboard", "Dashboard"),
            NavLink::to("/menu", "Menu"),
            NavLink::to("/users", "Staff"),
            NavLink::to("/kitchen", "Kitchen"),
            NavLink::to("/tables", "Tables"),
            NavLink::to("/orders", "Orders"),
            NavLink::to("/invoices", "Invoices"),
            NavLink::to("/stats", "Statistics"),
        ],
        Some(Role::Waiter) => vec![
            NavLink::to("/tables", "Tables"),
            NavLink::to("/orders", "Orders"),
            NavLink::to("/invoices", "Invoices"),
        ],
        Some(Role::Kitchen) => vec![NavLink::to("/kitchen", "Orders board")],
        None => Vec::new(),
    }
}

/// render
///
/// Draws the role's links into the navigation bar, flagging the one whose
/// path equals `current_path`.
pub fn render(document: &Document, role: Option<Role>, current_path: &str) {
    let links = links_for(role)
        .into_iter()
        .map(|link| RenderedNavLink {
            active: link.path == current_path,
            link,
        })
        .collect();
    document.set_nav_links(links);
}
