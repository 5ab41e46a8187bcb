/// Client Router Module Index
///
/// The hash-routed shell: the route table, the fragment grammar, the
/// navigator that changes the fragment, the content loader that reacts to
/// it, and the shared chrome kept in step with every render.

/// Path-keyed route table and its access policies.
pub mod table;

/// `#/<path>[?<query>]` parsing.
pub mod fragment;

/// Fragment ownership and the navigation event source.
pub mod navigator;

/// The resolve / check / fetch / mount / control pipeline.
pub mod loader;

/// Header, nav, footer, title and logout control.
pub mod shell;

/// Role-based navigation bar rendering.
pub mod nav;

pub use fragment::{QueryParams, parse_query};
pub use loader::{ContentLoader, LoaderState, NavigationOutcome, RedirectReason};
pub use navigator::{Location, NavigationEvent, Navigator};
pub use shell::SharedUi;
pub use table::{Access, Route, RouteTable, RouteTableBuilder, restaurant_routes};
