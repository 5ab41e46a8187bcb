use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::SessionError;
use crate::models::{Role, Session};

/// Key holding `"true"` while a user is signed in.
pub const AUTH_KEY: &str = "is_authenticated";
/// Key holding the signed-in user's role tag.
pub const ROLE_KEY: &str = "role";

// 1. SessionStore Contract
/// SessionStore
///
/// The page-wide key-value store the session lives in. Implementations must
/// outlive a single navigation; the file-backed one also outlives the process,
/// which is how a session survives a reload.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    async fn remove(&self, key: &str) -> Result<(), SessionError>;
}

// 2. In-memory store
/// MemorySessionStore
///
/// Volatile store used by tests and by shells that do not need reload survival.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

// 3. File-backed store
/// FileSessionStore
///
/// Persists the whole key-value map as a JSON object after every mutation.
/// The file is read once on open; a missing file is an empty store.
pub struct FileSessionStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileSessionStore {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "session store opened");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Writes a sibling temp file and renames it over the store, so a reader
    /// sees either the old map or the new one, never a torn file.
    async fn flush(&self, entries: &HashMap<String, String>) -> Result<(), SessionError> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_file(&path, &bytes))
            .await
            .map_err(std::io::Error::other)??;
        Ok(())
    }
}

fn replace_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().await;
        if entries.remove(key).is_some() {
            self.flush(&entries).await?;
        }
        Ok(())
    }
}

/// SessionState
///
/// The concrete type used to share a session store.
pub type SessionState = Arc<dyn SessionStore>;

/// SessionContext
///
/// The explicit accessor/mutator pair over the session store. The router and
/// every view controller receive one of these instead of reaching into the
/// store directly.
#[derive(Clone)]
pub struct SessionContext {
    store: SessionState,
}

impl SessionContext {
    pub fn new(store: SessionState) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// current
    ///
    /// Reads the session. A store that cannot be read is treated as signed out,
    /// so a broken store can never grant access.
    pub async fn current(&self) -> Session {
        match self.read().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "session store unreadable, treating as signed out");
                Session::anonymous()
            }
        }
    }

    async fn read(&self) -> Result<Session, SessionError> {
        let is_authenticated = self.store.get(AUTH_KEY).await?.as_deref() == Some("true");
        let role = match self.store.get(ROLE_KEY).await? {
            Some(tag) => tag
                .parse::<Role>()
                .map_err(|e| tracing::debug!(error = %e, "ignoring stored role"))
                .ok(),
            None => None,
        };
        Ok(Session {
            is_authenticated,
            role,
        })
    }

    pub async fn login(&self, role: Role) -> Result<(), SessionError> {
        self.store.set(AUTH_KEY, "true").await?;
        self.store.set(ROLE_KEY, role.tag()).await?;
        tracing::info!(%role, "session opened");
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), SessionError> {
        self.store.remove(AUTH_KEY).await?;
        self.store.remove(ROLE_KEY).await?;
        tracing::info!("session cleared");
        Ok(())
    }

    /// Direct access for collaborators that manage extra keys.
    pub fn store(&self) -> &SessionState {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_then_logout_round_trip() {
        let session = SessionContext::in_memory();
        assert_eq!(session.current().await, Session::anonymous());

        session.login(Role::Kitchen).await.unwrap();
        assert_eq!(session.current().await, Session::signed_in(Role::Kitchen));

        session.logout().await.unwrap();
        assert_eq!(session.current().await, Session::anonymous());
    }

    #[tokio::test]
    async fn test_unknown_role_tag_reads_as_no_role() {
        let store = Arc::new(MemorySessionStore::new());
        store.set(AUTH_KEY, "true").await.unwrap();
        store.set(ROLE_KEY, "sommelier").await.unwrap();

        let session = SessionContext::new(store).current().await;
        assert!(session.is_authenticated);
        assert_eq!(session.role, None);
    }

    #[tokio::test]
    async fn test_auth_flag_must_be_literal_true() {
        let store = Arc::new(MemorySessionStore::new());
        store.set(AUTH_KEY, "yes").await.unwrap();
        let session = SessionContext::new(store).current().await;
        assert!(!session.is_authenticated);
    }
}
