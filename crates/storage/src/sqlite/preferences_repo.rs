use async_trait::async_trait;
use chrono::Utc;

use crate::repository::{PersistenceStore, StorageError, StoredValue};

use super::SqliteStore;
use super::mapping::{map_preference_row, value_columns};

#[async_trait]
impl PersistenceStore for SqliteStore {
    async fn load(&self, key: &str) -> Result<Option<StoredValue>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT kind, int_value, text_value
            FROM preferences
            WHERE key = ?1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        row.as_ref().map(map_preference_row).transpose()
    }

    async fn store(&self, key: &str, value: StoredValue) -> Result<(), StorageError> {
        let (kind, int_value, text_value) = value_columns(&value);
        sqlx::query(
            r"
            INSERT INTO preferences (key, kind, int_value, text_value, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(key) DO UPDATE SET
                kind = excluded.kind,
                int_value = excluded.int_value,
                text_value = excluded.text_value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(kind)
        .bind(int_value)
        .bind(text_value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn clear(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        for key in keys {
            sqlx::query("DELETE FROM preferences WHERE key = ?1")
                .bind(*key)
                .execute(&mut *tx)
                .await
                .map_err(|err| StorageError::Connection(err.to_string()))?;
        }
        tx.commit()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
