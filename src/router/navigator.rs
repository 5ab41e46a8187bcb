use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

use super::fragment::{self, ParsedFragment};

/// NavigationEvent
///
/// The only two things that make the content loader run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    /// The page was (re)loaded with whatever fragment it already had.
    PageLoad,
    /// The fragment changed after load.
    FragmentChanged,
}

pub(crate) type EventReceiver = mpsc::UnboundedReceiver<NavigationEvent>;

/// Location
///
/// Holds the current fragment and raises navigation events, mirroring the
/// browser's `location.hash` and its `hashchange`/`load` events.
#[derive(Clone)]
pub struct Location {
    fragment: Arc<Mutex<String>>,
    events: mpsc::UnboundedSender<NavigationEvent>,
}

impl Location {
    pub(crate) fn new(initial: &str) -> (Self, EventReceiver) {
        let (events, receiver) = mpsc::unbounded_channel();
        let location = Self {
            fragment: Arc::new(Mutex::new(normalize(initial))),
            events,
        };
        (location, receiver)
    }

    fn slot(&self) -> MutexGuard<'_, String> {
        self.fragment.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The raw fragment including its leading `#`.
    pub fn fragment(&self) -> String {
        self.slot().clone()
    }

    pub fn parsed(&self) -> ParsedFragment {
        fragment::split(&self.fragment())
    }

    /// The current route path, `/` for home.
    pub fn path(&self) -> String {
        self.parsed().path.unwrap_or_else(|| "/".to_string())
    }

    /// Raises the initial load event.
    pub fn page_load(&self) {
        self.emit(NavigationEvent::PageLoad);
    }

    /// set_fragment
    ///
    /// Writes the fragment and raises `FragmentChanged` only if it differs
    /// from the current one. Returns whether an event was raised.
    fn set_fragment(&self, value: &str) -> bool {
        let value = normalize(value);
        {
            let mut slot = self.slot();
            if *slot == value {
                return false;
            }
            *slot = value;
        }
        self.emit(NavigationEvent::FragmentChanged);
        true
    }

    fn emit(&self, event: NavigationEvent) {
        if self.events.send(event).is_err() {
            tracing::warn!(?event, "navigation event dropped, content loader is gone");
        }
    }
}

fn normalize(fragment: &str) -> String {
    if fragment.starts_with('#') {
        fragment.to_string()
    } else {
        format!("#{fragment}")
    }
}

/// Navigator
///
/// The one way application code changes the current route. It never calls
/// the content loader; the fragment change it causes does.
#[derive(Clone)]
pub struct Navigator {
    location: Location,
}

impl Navigator {
    pub fn new(location: Location) -> Self {
        Self { location }
    }

    /// navigate_to
    ///
    /// Points the fragment at `path` (which may carry a `?query`). Navigating
    /// to the current fragment is a no-op, as in the browser.
    pub fn navigate_to(&self, path: &str) -> bool {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        tracing::debug!(%path, "navigate");
        self.location.set_fragment(&path)
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_raises_event_only_on_change() {
        let (location, mut events) = Location::new("");
        let navigator = Navigator::new(location.clone());

        assert!(navigator.navigate_to("/menu"));
        assert_eq!(location.fragment(), "#/menu");
        assert_eq!(events.try_recv().unwrap(), NavigationEvent::FragmentChanged);

        assert!(!navigator.navigate_to("/menu"));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_path_ignores_query_and_defaults_home() {
        let (location, _events) = Location::new("#/orders?table=3");
        assert_eq!(location.path(), "/orders");

        let (home, _events) = Location::new("");
        assert_eq!(home.fragment(), "#");
        assert_eq!(home.path(), "/");
    }

    #[test]
    fn test_relative_path_is_anchored() {
        let (location, _events) = Location::new("#/");
        Navigator::new(location.clone()).navigate_to("tables");
        assert_eq!(location.fragment(), "#/tables");
    }
}
