use std::sync::Arc;

use storage::repository::PersistenceStore;

use crate::error::StreakError;

pub const BEST_STREAK_KEY: &str = "best_streak";

/// Persisted best answer streak. The stored value only ever grows.
#[derive(Clone)]
pub struct StreakService {
    store: Arc<dyn PersistenceStore>,
}

impl StreakService {
    #[must_use]
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self { store }
    }

    /// Load the best streak (0 when nothing is stored).
    ///
    /// # Errors
    ///
    /// Returns `StreakError` on storage failures.
    pub async fn best_streak(&self) -> Result<u32, StreakError> {
        let stored = self.store.get_int(BEST_STREAK_KEY).await?;
        Ok(stored.and_then(|value| u32::try_from(value).ok()).unwrap_or(0))
    }

    /// Persist `streak` if it beats the stored best. Returns whether it was written.
    ///
    /// # Errors
    ///
    /// Returns `StreakError` on storage failures.
    pub async fn save_best_streak(&self, streak: u32) -> Result<bool, StreakError> {
        if streak <= self.best_streak().await? {
            return Ok(false);
        }
        let value = i32::try_from(streak).unwrap_or(i32::MAX);
        self.store.set_int(BEST_STREAK_KEY, value).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryStore;

    #[tokio::test]
    async fn defaults_to_zero() {
        let streaks = StreakService::new(Arc::new(InMemoryStore::new()));
        assert_eq!(streaks.best_streak().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn never_lowers_the_stored_best() {
        let streaks = StreakService::new(Arc::new(InMemoryStore::new()));

        assert!(streaks.save_best_streak(4).await.unwrap());
        assert!(!streaks.save_best_streak(2).await.unwrap());
        assert!(!streaks.save_best_streak(4).await.unwrap());
        assert_eq!(streaks.best_streak().await.unwrap(), 4);

        assert!(streaks.save_best_streak(5).await.unwrap());
        assert_eq!(streaks.best_streak().await.unwrap(), 5);
    }
}
