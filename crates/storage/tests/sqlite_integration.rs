use storage::repository::{PersistenceStore, Storage, StorageError};
use storage::sqlite::SqliteStore;

async fn connect(name: &str) -> SqliteStore {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let store = SqliteStore::connect(&url).await.expect("connect");
    store.migrate().await.expect("migrate");
    store
}

#[tokio::test]
async fn sqlite_persists_each_value_kind() {
    let store = connect("memdb_value_kinds").await;

    store.set_int("best_streak", 12).await.unwrap();
    store
        .set_long("token_timestamp", 1_700_000_000_000)
        .await
        .unwrap();
    store.set_string("session_token", "tok-123").await.unwrap();

    assert_eq!(store.get_int("best_streak").await.unwrap(), Some(12));
    assert_eq!(
        store.get_long("token_timestamp").await.unwrap(),
        Some(1_700_000_000_000)
    );
    assert_eq!(
        store.get_string("session_token").await.unwrap().as_deref(),
        Some("tok-123")
    );
    assert_eq!(store.get_string("missing").await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_overwrites_and_changes_kind() {
    let store = connect("memdb_overwrite").await;

    store.set_int("best_streak", 3).await.unwrap();
    store.set_int("best_streak", 4).await.unwrap();
    assert_eq!(store.get_int("best_streak").await.unwrap(), Some(4));

    store.set_string("best_streak", "four").await.unwrap();
    let err = store.get_int("best_streak").await.unwrap_err();
    assert!(matches!(err, StorageError::TypeMismatch { .. }));
}

#[tokio::test]
async fn sqlite_clear_removes_only_named_keys() {
    let store = connect("memdb_clear").await;

    store.set_string("session_token", "tok").await.unwrap();
    store.set_long("token_timestamp", 42).await.unwrap();
    store.set_int("best_streak", 9).await.unwrap();

    store
        .clear(&["session_token", "token_timestamp"])
        .await
        .unwrap();

    assert_eq!(store.get_string("session_token").await.unwrap(), None);
    assert_eq!(store.get_long("token_timestamp").await.unwrap(), None);
    assert_eq!(store.get_int("best_streak").await.unwrap(), Some(9));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let store = connect("memdb_migrate_twice").await;
    store.migrate().await.expect("second migrate");
    store.set_int("best_streak", 1).await.unwrap();
    assert_eq!(store.get_int("best_streak").await.unwrap(), Some(1));
}

#[tokio::test]
async fn storage_sqlite_exposes_preferences() {
    let storage = Storage::sqlite("sqlite:file:memdb_storage_facade?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.preferences.set_int("best_streak", 5).await.unwrap();
    assert_eq!(
        storage.preferences.get_int("best_streak").await.unwrap(),
        Some(5)
    );
}

#[tokio::test]
async fn file_store_is_created_and_survives_reopen() {
    let dir = std::env::temp_dir().join(format!("trivia-store-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("prefs.sqlite3");
    let _ = std::fs::remove_file(&path);
    let url = format!("sqlite://{}", path.display());

    let storage = Storage::sqlite(&url).await.expect("open new file");
    assert!(path.exists());
    storage.preferences.set_int("best_streak", 9).await.unwrap();
    drop(storage);

    let reopened = Storage::sqlite(&url).await.expect("reopen");
    assert_eq!(
        reopened.preferences.get_int("best_streak").await.unwrap(),
        Some(9)
    );

    let _ = std::fs::remove_dir_all(&dir);
}
