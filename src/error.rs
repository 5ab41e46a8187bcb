use thiserror::Error;

use crate::models::Role;

/// TemplateError
///
/// Failure to obtain a view's HTML fragment. Any variant is terminal for the
/// navigation that requested it.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template '{path}' answered with status {status}")]
    Status { path: String, status: u16 },

    #[error("template '{0}' is not available")]
    Missing(String),

    #[error("template '{path}' could not be fetched: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

/// ControllerError
///
/// Raised by a view controller while it populates its freshly mounted view.
#[derive(Debug, Error)]
#[error("view controller for '{path}' failed: {reason}")]
pub struct ControllerError {
    pub path: String,
    pub reason: String,
}

impl ControllerError {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// NavigationError
///
/// The taxonomy of reasons a navigation does not end on the requested view.
/// The content loader is the only place these become redirects.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("no route registered for '{0}'")]
    NotFound(String),

    #[error("'{0}' requires an authenticated session")]
    Unauthenticated(String),

    #[error("role {role:?} may not open '{path}'")]
    Forbidden { path: String, role: Option<Role> },

    #[error(transparent)]
    TemplateFetch(#[from] TemplateError),

    #[error(transparent)]
    ControllerInit(#[from] ControllerError),
}

/// RouteTableError
///
/// Structural problems found while assembling a route table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route path '{0}' must start with '/'")]
    InvalidPath(String),

    #[error("route '{0}' is registered twice")]
    Duplicate(String),

    #[error("route '{0}' restricts access to an empty role set")]
    EmptyRoleSet(String),

    #[error("exactly one not-found route is required, found {0}")]
    NotFoundCount(usize),

    #[error("login route '{0}' is missing or not public")]
    BadLogin(String),

    #[error("landing route '{0}' is missing or not open to every authenticated role")]
    BadLanding(String),

    #[error("role '{role}' cannot open its own landing route '{path}'")]
    BadRoleLanding { role: Role, path: String },

    #[error("cannot attach a controller to unknown route '{0}'")]
    UnknownRoute(String),
}

/// SessionError
///
/// Failures of the persistent session store backend.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
