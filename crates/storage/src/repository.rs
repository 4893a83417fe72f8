use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("key {key} holds a {found} value, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// A single persisted preference value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredValue {
    Int(i32),
    Long(i64),
    Text(String),
}

impl StoredValue {
    /// Storage tag for the value's kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            StoredValue::Int(_) => "int",
            StoredValue::Long(_) => "long",
            StoredValue::Text(_) => "string",
        }
    }

    fn into_int(self, key: &str) -> Result<i32, StorageError> {
        match self {
            StoredValue::Int(value) => Ok(value),
            other => Err(mismatch(key, "int", &other)),
        }
    }

    fn into_long(self, key: &str) -> Result<i64, StorageError> {
        match self {
            StoredValue::Long(value) => Ok(value),
            other => Err(mismatch(key, "long", &other)),
        }
    }

    fn into_text(self, key: &str) -> Result<String, StorageError> {
        match self {
            StoredValue::Text(value) => Ok(value),
            other => Err(mismatch(key, "string", &other)),
        }
    }
}

fn mismatch(key: &str, expected: &'static str, found: &StoredValue) -> StorageError {
    StorageError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}

/// Durable key-value contract for small app preferences (best streak, session token).
///
/// Adapters implement the raw `load`/`store`/`clear` primitives; the typed accessors
/// are provided on top of them.
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    /// Read the raw value for a key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn load(&self, key: &str) -> Result<Option<StoredValue>, StorageError>;

    /// Insert or replace the value for a key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn store(&self, key: &str, value: StoredValue) -> Result<(), StorageError>;

    /// Remove the given keys. Missing keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn clear(&self, keys: &[&str]) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::TypeMismatch` if the key holds a non-int value.
    async fn get_int(&self, key: &str) -> Result<Option<i32>, StorageError> {
        self.load(key).await?.map(|v| v.into_int(key)).transpose()
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set_int(&self, key: &str, value: i32) -> Result<(), StorageError> {
        self.store(key, StoredValue::Int(value)).await
    }

    /// # Errors
    ///
    /// Returns `StorageError::TypeMismatch` if the key holds a non-long value.
    async fn get_long(&self, key: &str) -> Result<Option<i64>, StorageError> {
        self.load(key).await?.map(|v| v.into_long(key)).transpose()
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set_long(&self, key: &str, value: i64) -> Result<(), StorageError> {
        self.store(key, StoredValue::Long(value)).await
    }

    /// # Errors
    ///
    /// Returns `StorageError::TypeMismatch` if the key holds a non-string value.
    async fn get_string(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.load(key).await?.map(|v| v.into_text(key)).transpose()
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set_string(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.store(key, StoredValue::Text(value.to_string())).await
    }
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    values: Arc<Mutex<HashMap<String, StoredValue>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersistenceStore for InMemoryStore {
    async fn load(&self, key: &str) -> Result<Option<StoredValue>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn store(&self, key: &str, value: StoredValue) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value);
        Ok(())
    }

    async fn clear(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        for key in keys {
            guard.remove(*key);
        }
        Ok(())
    }
}

/// Aggregates the preference store behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub preferences: Arc<dyn PersistenceStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            preferences: Arc::new(InMemoryStore::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn typed_accessors_read_back_what_was_written() {
        let store = InMemoryStore::new();
        store.set_int("best_streak", 7).await.unwrap();
        store.set_long("token_timestamp", 1_700_000_000_000).await.unwrap();
        store.set_string("session_token", "abc").await.unwrap();

        assert_eq!(store.get_int("best_streak").await.unwrap(), Some(7));
        assert_eq!(
            store.get_long("token_timestamp").await.unwrap(),
            Some(1_700_000_000_000)
        );
        assert_eq!(
            store.get_string("session_token").await.unwrap().as_deref(),
            Some("abc")
        );
        assert_eq!(store.get_int("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn reading_with_wrong_type_is_an_error() {
        let store = InMemoryStore::new();
        store.set_string("best_streak", "seven").await.unwrap();
        let err = store.get_int("best_streak").await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::TypeMismatch {
                expected: "int",
                found: "string",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn clear_removes_only_named_keys() {
        let store = InMemoryStore::new();
        store.set_string("session_token", "abc").await.unwrap();
        store.set_long("token_timestamp", 1).await.unwrap();
        store.set_int("best_streak", 3).await.unwrap();

        store
            .clear(&["session_token", "token_timestamp", "never_set"])
            .await
            .unwrap();

        assert_eq!(store.get_string("session_token").await.unwrap(), None);
        assert_eq!(store.get_long("token_timestamp").await.unwrap(), None);
        assert_eq!(store.get_int("best_streak").await.unwrap(), Some(3));
    }
}
