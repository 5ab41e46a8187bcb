use std::sync::Arc;
use sushi_burrito::{
    FileSessionStore, SessionContext,
    error::SessionError,
    models::{Role, Session},
    session::{AUTH_KEY, ROLE_KEY, SessionStore},
};

#[tokio::test]
async fn test_session_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let first = SessionContext::new(Arc::new(FileSessionStore::open(&path).await.unwrap()));
    first.login(Role::Waiter).await.unwrap();

    // A reload opens the same file from scratch.
    let second = SessionContext::new(Arc::new(FileSessionStore::open(&path).await.unwrap()));
    assert_eq!(second.current().await, Session::signed_in(Role::Waiter));

    second.logout().await.unwrap();
    let third = SessionContext::new(Arc::new(FileSessionStore::open(&path).await.unwrap()));
    assert_eq!(third.current().await, Session::anonymous());
}

#[tokio::test]
async fn test_missing_file_is_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::open(dir.path().join("absent.json"))
        .await
        .unwrap();
    assert_eq!(store.get(AUTH_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_file_holds_plain_key_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let store = FileSessionStore::open(&path).await.unwrap();
    store.set(AUTH_KEY, "true").await.unwrap();
    store.set(ROLE_KEY, "kitchen").await.unwrap();

    let raw: serde_json::Value =
        serde_json::from_slice(&tokio::fs::read(&path).await.unwrap()).unwrap();
    assert_eq!(raw[AUTH_KEY], "true");
    assert_eq!(raw[ROLE_KEY], "kitchen");
}

#[tokio::test]
async fn test_corrupt_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    tokio::fs::write(&path, b"{not json").await.unwrap();

    let result = FileSessionStore::open(&path).await;
    assert!(matches!(result, Err(SessionError::Corrupt(_))));
}

#[tokio::test]
async fn test_writes_replace_the_file_without_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let session = SessionContext::new(Arc::new(FileSessionStore::open(&path).await.unwrap()));

    for role in [Role::Admin, Role::Waiter, Role::Kitchen] {
        session.login(role).await.unwrap();
        let raw = tokio::fs::read(&path).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(parsed[ROLE_KEY], role.tag());
    }
    session.logout().await.unwrap();

    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        names.push(entry.file_name().into_string().unwrap());
    }
    assert_eq!(names, vec!["session.json".to_string()]);
}
