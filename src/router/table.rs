use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::error::RouteTableError;
use crate::models::{Role, RouteManifestEntry};
use crate::views::ControllerState;

/// Access
///
/// The access policy of a route. The content loader matches on this
/// exhaustively, so adding a kind forces every policy check to be revisited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Only for signed-out visitors; signed-in users are bounced to the landing page.
    Public,
    /// Any signed-in user, whatever their role.
    Authenticated,
    /// Signed-in users whose role is in the set.
    Restricted(BTreeSet<Role>),
    /// The reserved fallback view, open to everyone.
    NotFound,
}

impl Access {
    pub fn restricted(roles: impl IntoIterator<Item = Role>) -> Self {
        Access::Restricted(roles.into_iter().collect())
    }

    /// Whether a signed-in user with `role` passes this policy.
    pub fn admits(&self, role: Role) -> bool {
        match self {
            Access::Authenticated | Access::NotFound => true,
            Access::Restricted(roles) => roles.contains(&role),
            Access::Public => false,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Authenticated => "authenticated",
            Access::Restricted(_) => "restricted",
            Access::NotFound => "not_found",
        }
    }
}

/// Route
///
/// A path-keyed unit of template, title, access policy and optional controller.
#[derive(Clone)]
pub struct Route {
    pub path: String,
    pub template: String,
    pub title: String,
    pub access: Access,
    pub controller: Option<ControllerState>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("template", &self.template)
            .field("title", &self.title)
            .field("access", &self.access)
            .field("controller", &self.controller.is_some())
            .finish()
    }
}

impl Route {
    pub fn manifest_entry(&self) -> RouteManifestEntry {
        RouteManifestEntry {
            path: self.path.clone(),
            template: self.template.clone(),
            title: self.title.clone(),
            access: self.access.label().to_string(),
            roles: match &self.access {
                Access::Restricted(roles) => roles.iter().copied().collect(),
                _ => Vec::new(),
            },
            has_controller: self.controller.is_some(),
        }
    }
}

/// RouteTable
///
/// Exact-match lookup from path to route. Built once through
/// [`RouteTableBuilder`], which guarantees the reserved routes exist.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    index: HashMap<String, usize>,
    not_found: usize,
    login: String,
    landing: String,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    pub fn lookup(&self, path: &str) -> Option<&Route> {
        self.index.get(path).map(|&i| &self.routes[i])
    }

    pub fn not_found(&self) -> &Route {
        &self.routes[self.not_found]
    }

    pub fn login_path(&self) -> &str {
        &self.login
    }

    /// The page signed-in users land on from `/` or from a public route.
    pub fn landing_path(&self) -> &str {
        &self.landing
    }

    /// Where a refused role is sent; unrecognized roles go to login.
    pub fn role_landing(&self, role: Option<Role>) -> &str {
        role.map(|r| r.default_landing())
            .filter(|path| self.index.contains_key(*path))
            .unwrap_or(self.login.as_str())
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn manifest(&self) -> Vec<RouteManifestEntry> {
        self.routes.iter().map(Route::manifest_entry).collect()
    }
}

/// RouteTableBuilder
///
/// Collects routes and validates the table's structure on `build`.
pub struct RouteTableBuilder {
    routes: Vec<Route>,
    controllers: Vec<(String, ControllerState)>,
    login: String,
    landing: String,
}

impl Default for RouteTableBuilder {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            controllers: Vec::new(),
            login: "/login".to_string(),
            landing: "/dashboard".to_string(),
        }
    }
}

impl RouteTableBuilder {
    pub fn route(mut self, path: &str, template: &str, title: &str, access: Access) -> Self {
        self.routes.push(Route {
            path: path.to_string(),
            template: template.to_string(),
            title: title.to_string(),
            access,
            controller: None,
        });
        self
    }

    pub fn public(self, path: &str, template: &str, title: &str) -> Self {
        self.route(path, template, title, Access::Public)
    }

    pub fn authenticated(self, path: &str, template: &str, title: &str) -> Self {
        self.route(path, template, title, Access::Authenticated)
    }

    pub fn restricted(
        self,
        path: &str,
        template: &str,
        title: &str,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        self.route(path, template, title, Access::restricted(roles))
    }

    pub fn not_found(self, path: &str, template: &str, title: &str) -> Self {
        self.route(path, template, title, Access::NotFound)
    }

    pub fn login(mut self, path: &str) -> Self {
        self.login = path.to_string();
        self
    }

    pub fn landing(mut self, path: &str) -> Self {
        self.landing = path.to_string();
        self
    }

    /// Attaches a view controller to an already registered path.
    pub fn controller(mut self, path: &str, controller: ControllerState) -> Self {
        self.controllers.push((path.to_string(), controller));
        self
    }

    pub fn build(self) -> Result<RouteTable, RouteTableError> {
        let mut routes = self.routes;
        let mut index = HashMap::with_capacity(routes.len());

        for (i, route) in routes.iter().enumerate() {
            if !route.path.starts_with('/') {
                return Err(RouteTableError::InvalidPath(route.path.clone()));
            }
            if let Access::Restricted(roles) = &route.access {
                if roles.is_empty() {
                    return Err(RouteTableError::EmptyRoleSet(route.path.clone()));
                }
            }
            if index.insert(route.path.clone(), i).is_some() {
                return Err(RouteTableError::Duplicate(route.path.clone()));
            }
        }

        let not_found: Vec<usize> = routes
            .iter()
            .enumerate()
            .filter(|(_, r)| r.access == Access::NotFound)
            .map(|(i, _)| i)
            .collect();
        let [not_found] = not_found[..] else {
            return Err(RouteTableError::NotFoundCount(not_found.len()));
        };

        let has_access = |path: &String, access: Access| {
            index
                .get(path)
                .is_some_and(|&i| routes[i].access == access)
        };
        if !has_access(&self.login, Access::Public) {
            return Err(RouteTableError::BadLogin(self.login));
        }
        if !has_access(&self.landing, Access::Authenticated) {
            return Err(RouteTableError::BadLanding(self.landing));
        }

        // An unregistered role landing falls back to login; a registered one
        // must admit its role or a refusal would redirect onto another refusal.
        for role in Role::ALL {
            let path = role.default_landing();
            let Some(&i) = index.get(path) else {
                continue;
            };
            if !routes[i].access.admits(role) {
                return Err(RouteTableError::BadRoleLanding {
                    role,
                    path: path.to_string(),
                });
            }
        }

        for (path, controller) in self.controllers {
            let &i = index
                .get(&path)
                .ok_or_else(|| RouteTableError::UnknownRoute(path.clone()))?;
            routes[i].controller = Some(controller);
        }

        Ok(RouteTable {
            routes,
            index,
            not_found,
            login: self.login,
            landing: self.landing,
        })
    }
}

/// restaurant_routes
///
/// The Sushi Burrito route set, without controllers. Callers attach their
/// view controllers through [`RouteTableBuilder::controller`].
pub fn restaurant_routes() -> RouteTableBuilder {
    RouteTable::builder()
        .login("/login")
        .landing("/dashboard")
        .public("/login", "views/login.html", "Sign in")
        .authenticated("/dashboard", "views/dashboard.html", "Dashboard")
        // Back office
        .restricted("/menu", "views/menu.html", "Menu", [Role::Admin])
        .restricted("/users", "views/users.html", "Staff", [Role::Admin])
        .restricted("/stats", "views/stats.html", "Statistics", [Role::Admin])
        // Kitchen board
        .restricted(
            "/kitchen",
            "views/kitchen.html",
            "Kitchen",
            [Role::Kitchen, Role::Admin],
        )
        // Floor
        .restricted(
            "/tables",
            "views/tables.html",
            "Tables",
            [Role::Waiter, Role::Admin],
        )
        .restricted(
            "/orders",
            "views/orders.html",
            "Orders",
            [Role::Waiter, Role::Admin],
        )
        .restricted(
            "/invoices",
            "views/invoices.html",
            "Invoices",
            [Role::Waiter, Role::Admin],
        )
        .not_found("/404", "views/404.html", "Page not found")
}
