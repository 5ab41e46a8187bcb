use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Staff Roles ---

/// Role
///
/// The fixed set of staff role tags a session can carry. The tag is what the
/// login flow writes into the session store, so parsing is lenient about case
/// but strict about the vocabulary: anything else is an unrecognized role.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    Waiter,
    Kitchen,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Waiter, Role::Kitchen];

    /// The tag persisted in the session store.
    pub fn tag(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Waiter => "waiter",
            Role::Kitchen => "kitchen",
        }
    }

    /// default_landing
    ///
    /// Where a member of this role is sent when a route refuses them.
    pub fn default_landing(&self) -> &'static str {
        match self {
            Role::Admin => "/dashboard",
            Role::Waiter => "/tables",
            Role::Kitchen => "/kitchen",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Returned when a stored role tag is outside the known vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized role tag '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "waiter" => Ok(Role::Waiter),
            "kitchen" => Ok(Role::Kitchen),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

// --- Session ---

/// Session
///
/// A snapshot of the authenticated-user context, read at the start of every
/// navigation. `role` is `None` when no tag is stored or the tag is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Session {
    pub is_authenticated: bool,
    pub role: Option<Role>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(role: Role) -> Self {
        Self {
            is_authenticated: true,
            role: Some(role),
        }
    }
}

// --- Navigation ---

/// NavLink
///
/// One entry of a role's navigation bar. `href` is what the anchor points at,
/// `path` is the route path used to decide which link is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavLink {
    pub href: String,
    pub label: String,
    pub path: String,
}

impl NavLink {
    pub fn to(path: &str, label: &str) -> Self {
        Self {
            href: format!("#{path}"),
            label: label.to_string(),
            path: path.to_string(),
        }
    }
}

/// A navigation link as it was last rendered into the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RenderedNavLink {
    #[serde(flatten)]
    #[ts(flatten)]
    pub link: NavLink,
    pub active: bool,
}

// --- Route Manifest (served to the browser shell) ---

/// RouteManifestEntry
///
/// Serializable projection of a registered route. Controllers are code and
/// never leave the process, so only whether one is attached is reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RouteManifestEntry {
    pub path: String,
    pub template: String,
    pub title: String,
    /// One of `public`, `authenticated`, `restricted`, `not_found`.
    pub access: String,
    /// Allowed roles for `restricted` routes, empty otherwise.
    pub roles: Vec<Role>,
    pub has_controller: bool,
}

// --- Notifications ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Notification
///
/// A user-visible toast raised by the shell, e.g. the "forbidden" warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub message: String,
    #[ts(type = "string")]
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}
