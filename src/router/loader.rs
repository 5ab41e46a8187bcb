use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::Instrument;
use uuid::Uuid;

use super::fragment::{self, ParsedFragment};
use super::navigator::{EventReceiver, Location, NavigationEvent, Navigator};
use super::shell::SharedUi;
use super::table::{Access, Route, RouteTable};
use crate::config::AppConfig;
use crate::document::Document;
use crate::error::{NavigationError, SessionError};
use crate::models::{NotificationLevel, Session};
use crate::session::{FileSessionStore, SessionContext};
use crate::templates::{HttpTemplateSource, TemplateState};
use crate::views::ViewContext;

/// Markup shown when the not-found view itself cannot be rendered.
const FALLBACK_NOT_FOUND: &str = "<section class=\"not-found\"><h1>Page not found</h1></section>";

/// Upper bound on events handled by one `run_until_idle` call.
const MAX_EVENTS_PER_DRAIN: usize = 64;

/// LoaderState
///
/// Where the most recent navigation run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoaderState {
    #[default]
    Idle,
    Resolving,
    Redirecting,
    Rendering,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// `/` sent to login or to the landing page.
    Home,
    /// No route matched.
    NotFound,
    /// A public page was opened with a live session.
    AlreadySignedIn,
    /// A protected page was opened without a session.
    SignInRequired,
    /// The session's role is outside the route's allow-list.
    Forbidden,
    /// Template fetch or controller failed.
    Failed,
}

/// NavigationOutcome
///
/// How a single content loader run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Rendered {
        path: String,
    },
    Redirected {
        from: String,
        to: String,
        reason: RedirectReason,
    },
    /// A later run started while this one was in flight; it wrote nothing
    /// further and issued no redirect.
    Superseded {
        path: String,
    },
    /// The not-found view failed and the built-in fallback was shown.
    Fallback {
        path: String,
    },
}

/// Result of the synchronous policy pass.
enum Resolved<'a> {
    Home(String),
    AlreadySignedIn,
    Render(&'a Route),
}

/// ContentLoader
///
/// Turns the current fragment into a rendered page: resolve, check the
/// access policy, fetch and mount the template, sync the shared chrome, then
/// hand over to the route's controller. It only runs in response to a
/// [`NavigationEvent`]; redirects are issued through the [`Navigator`].
#[derive(Clone)]
pub struct ContentLoader {
    table: Arc<RouteTable>,
    templates: TemplateState,
    session: SessionContext,
    document: Document,
    navigator: Navigator,
    shell: SharedUi,
    generation: Arc<AtomicU64>,
    state: Arc<Mutex<LoaderState>>,
    history: Arc<Mutex<Vec<NavigationOutcome>>>,
    events: Arc<tokio::sync::Mutex<EventReceiver>>,
}

impl ContentLoader {
    pub fn new(
        table: RouteTable,
        templates: TemplateState,
        session: SessionContext,
        document: Document,
        initial_fragment: &str,
    ) -> Self {
        let (location, events) = Location::new(initial_fragment);
        let navigator = Navigator::new(location);
        let shell = SharedUi::new(
            document.clone(),
            session.clone(),
            navigator.clone(),
            table.login_path(),
        );

        Self {
            table: Arc::new(table),
            templates,
            session,
            document,
            navigator,
            shell,
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(Mutex::new(LoaderState::Idle)),
            history: Arc::new(Mutex::new(Vec::new())),
            events: Arc::new(tokio::sync::Mutex::new(events)),
        }
    }

    /// from_config
    ///
    /// A loader wired the way a deployed shell runs: templates fetched over
    /// HTTP from `template_base_url`, session kept in `session_file` so it
    /// survives a reload.
    pub async fn from_config(
        config: &AppConfig,
        table: RouteTable,
        document: Document,
        initial_fragment: &str,
    ) -> Result<Self, SessionError> {
        let store = FileSessionStore::open(&config.session_file).await?;
        tracing::debug!(
            base_url = %config.template_base_url,
            session_file = %config.session_file,
            "content loader configured"
        );
        Ok(Self::new(
            table,
            Arc::new(HttpTemplateSource::new(&config.template_base_url)),
            SessionContext::new(Arc::new(store)),
            document,
            initial_fragment,
        ))
    }

    // --- Accessors ---

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn location(&self) -> &Location {
        self.navigator.location()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn state(&self) -> LoaderState {
        *lock(&self.state)
    }

    /// Every outcome so far, oldest first.
    pub fn history(&self) -> Vec<NavigationOutcome> {
        lock(&self.history).clone()
    }

    // --- Event loop ---

    /// run_until_idle
    ///
    /// Handles queued navigation events one after another, including the
    /// ones raised by redirects along the way, and returns their outcomes.
    pub async fn run_until_idle(&self) -> Vec<NavigationOutcome> {
        let mut outcomes = Vec::new();
        while outcomes.len() < MAX_EVENTS_PER_DRAIN {
            let next = self.events.lock().await.try_recv();
            let Ok(event) = next else {
                return outcomes;
            };
            outcomes.push(self.handle(event).await);
        }
        tracing::warn!(
            handled = outcomes.len(),
            "navigation did not settle, possible redirect cycle"
        );
        outcomes
    }

    /// run
    ///
    /// Long-running event loop. Each event gets its own task, so runs may
    /// overlap the way browser event handlers interleave; the generation
    /// check keeps a slow, older run from overwriting a newer page.
    pub async fn run(self) {
        loop {
            let next = self.events.lock().await.recv().await;
            let Some(event) = next else {
                tracing::info!("navigation event source closed");
                return;
            };
            let loader = self.clone();
            tokio::spawn(async move {
                loader.handle(event).await;
            });
        }
    }

    // --- A single run ---

    async fn handle(&self, event: NavigationEvent) -> NavigationOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let fragment = self.location().fragment();
        let span = tracing::info_span!(
            "navigation",
            nav_id = %Uuid::new_v4(),
            ?event,
            %fragment,
            generation
        );

        let outcome = self.run_once(generation).instrument(span).await;

        self.set_state(LoaderState::Idle);
        lock(&self.history).push(outcome.clone());
        outcome
    }

    async fn run_once(&self, generation: u64) -> NavigationOutcome {
        self.set_state(LoaderState::Resolving);
        let parsed = self.location().parsed();
        let session = self.session.current().await;
        let from = parsed.path.clone().unwrap_or_else(|| "/".to_string());

        if self.is_stale(generation) {
            return self.superseded(&from);
        }

        match self.resolve(&parsed, session) {
            Ok(Resolved::Home(to)) => self.redirect(&from, &to, RedirectReason::Home),
            Ok(Resolved::AlreadySignedIn) => {
                let landing = self.table.landing_path().to_string();
                self.redirect(&from, &landing, RedirectReason::AlreadySignedIn)
            }
            Ok(Resolved::Render(route)) => {
                match self.render(route, &parsed, session, generation).await {
                    Ok(outcome) => outcome,
                    Err(e) if self.is_stale(generation) => {
                        tracing::debug!(error = %e, "stale navigation failed, ignoring");
                        self.superseded(&from)
                    }
                    Err(e) => self.fail(&from, e),
                }
            }
            Err(e) => self.deny(&from, session, e),
        }
    }

    /// resolve
    ///
    /// Path normalization, lookup and the ordered policy checks. Nothing
    /// here touches the page.
    fn resolve(
        &self,
        parsed: &ParsedFragment,
        session: Session,
    ) -> Result<Resolved<'_>, NavigationError> {
        let Some(path) = parsed.path.as_deref() else {
            let home = if session.is_authenticated {
                self.table.landing_path()
            } else {
                self.table.login_path()
            };
            return Ok(Resolved::Home(home.to_string()));
        };

        let route = self
            .table
            .lookup(path)
            .ok_or_else(|| NavigationError::NotFound(path.to_string()))?;

        match &route.access {
            Access::Public if session.is_authenticated => Ok(Resolved::AlreadySignedIn),
            Access::Public | Access::NotFound => Ok(Resolved::Render(route)),
            Access::Authenticated | Access::Restricted(_) if !session.is_authenticated => {
                Err(NavigationError::Unauthenticated(path.to_string()))
            }
            Access::Authenticated => Ok(Resolved::Render(route)),
            Access::Restricted(roles) => match session.role {
                Some(role) if roles.contains(&role) => Ok(Resolved::Render(route)),
                role => Err(NavigationError::Forbidden {
                    path: path.to_string(),
                    role,
                }),
            },
        }
    }

    async fn render(
        &self,
        route: &Route,
        parsed: &ParsedFragment,
        session: Session,
        generation: u64,
    ) -> Result<NavigationOutcome, NavigationError> {
        self.set_state(LoaderState::Rendering);

        let html = self.templates.fetch(&route.template).await?;

        if self.is_stale(generation) {
            return Ok(self.superseded(&route.path));
        }

        self.document.mount(html);
        self.document.set_title(&route.title);
        self.shell
            .update(session.is_authenticated, session.role, route);

        if let Some(controller) = &route.controller {
            let query = parsed
                .query
                .as_deref()
                .map(fragment::parse_query)
                .unwrap_or_default();
            controller
                .mount(ViewContext {
                    path: route.path.clone(),
                    query,
                    document: self.document.clone(),
                    session: self.session.clone(),
                    navigator: self.navigator.clone(),
                })
                .await?;

            if self.is_stale(generation) {
                return Ok(self.superseded(&route.path));
            }
        }

        tracing::info!(path = %route.path, title = %route.title, "rendered");
        Ok(NavigationOutcome::Rendered {
            path: route.path.clone(),
        })
    }

    /// Turns a policy refusal into its redirect.
    fn deny(&self, from: &str, session: Session, error: NavigationError) -> NavigationOutcome {
        match error {
            NavigationError::NotFound(_) => {
                tracing::warn!(error = %error, "unknown route");
                let to = self.table.not_found().path.clone();
                self.redirect(from, &to, RedirectReason::NotFound)
            }
            NavigationError::Unauthenticated(_) => {
                tracing::debug!(error = %error, "sign-in required");
                let to = self.table.login_path().to_string();
                self.redirect(from, &to, RedirectReason::SignInRequired)
            }
            NavigationError::Forbidden { ref path, .. } => {
                tracing::warn!(error = %error, "forbidden");
                self.document.notify(
                    NotificationLevel::Warning,
                    format!("You are not allowed to open {path}."),
                );
                let to = self.table.role_landing(session.role).to_string();
                self.redirect(from, &to, RedirectReason::Forbidden)
            }
            NavigationError::TemplateFetch(_) | NavigationError::ControllerInit(_) => {
                self.fail(from, error)
            }
        }
    }

    /// fail
    ///
    /// Template and controller failures end on the not-found view. If that
    /// view is the one failing, the built-in fallback is mounted instead.
    fn fail(&self, from: &str, error: NavigationError) -> NavigationOutcome {
        self.set_state(LoaderState::Failed);
        tracing::error!(error = %error, "navigation failed");

        let not_found = self.table.not_found();
        if from == not_found.path {
            self.document.mount(FALLBACK_NOT_FOUND.to_string());
            self.document.set_title(&not_found.title);
            return NavigationOutcome::Fallback {
                path: not_found.path.clone(),
            };
        }

        let to = not_found.path.clone();
        self.redirect(from, &to, RedirectReason::Failed)
    }

    fn redirect(&self, from: &str, to: &str, reason: RedirectReason) -> NavigationOutcome {
        self.set_state(LoaderState::Redirecting);
        if !self.navigator.navigate_to(to) {
            tracing::warn!(%from, %to, ?reason, "redirect target is the current location");
        }
        NavigationOutcome::Redirected {
            from: from.to_string(),
            to: to.to_string(),
            reason,
        }
    }

    /// A newer run has started since `generation` was taken.
    fn is_stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    fn superseded(&self, path: &str) -> NavigationOutcome {
        tracing::debug!(%path, "superseded by a newer navigation");
        NavigationOutcome::Superseded {
            path: path.to_string(),
        }
    }

    fn set_state(&self, state: LoaderState) {
        *lock(&self.state) = state;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
