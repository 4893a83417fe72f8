use std::sync::Arc;

use storage::repository::PersistenceStore;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use trivia_core::model::SessionToken;
use trivia_core::time::from_millis;

use crate::Clock;
use crate::api::TokenSource;

pub const SESSION_TOKEN_KEY: &str = "session_token";
pub const TOKEN_TIMESTAMP_KEY: &str = "token_timestamp";

/// Obtains, caches and expires the question deduplication token.
///
/// The token lives in memory and in the preference store (value plus issuance time in
/// Unix milliseconds). Only the token string leaves this type. Issuance failures never
/// surface as errors: callers get `None` and fetch without deduplication.
pub struct TokenManager {
    clock: Clock,
    source: Arc<dyn TokenSource>,
    store: Arc<dyn PersistenceStore>,
    // Held across issuance so concurrent callers share one token.
    cached: Mutex<Option<SessionToken>>,
}

impl TokenManager {
    #[must_use]
    pub fn new(
        clock: Clock,
        source: Arc<dyn TokenSource>,
        store: Arc<dyn PersistenceStore>,
    ) -> Self {
        Self {
            clock,
            source,
            store,
            cached: Mutex::new(None),
        }
    }

    /// Returns a token younger than the validity window, issuing a new one if needed.
    pub async fn get_valid_token(&self) -> Option<String> {
        let mut cached = self.cached.lock().await;
        let now = self.clock.now();

        if cached.is_none() {
            *cached = self.load_persisted().await;
        }
        if let Some(token) = cached.as_ref().filter(|token| token.is_valid_at(now)) {
            return Some(token.value().to_string());
        }

        *cached = None;
        let token = self.request_new_token().await?;
        let value = token.value().to_string();
        *cached = Some(token);
        Some(value)
    }

    /// Drops the cached token so the next `get_valid_token` issues a fresh one.
    pub async fn clear_token(&self) {
        let mut cached = self.cached.lock().await;
        *cached = None;
        if let Err(err) = self
            .store
            .clear(&[SESSION_TOKEN_KEY, TOKEN_TIMESTAMP_KEY])
            .await
        {
            warn!(%err, "failed to clear persisted session token");
        }
        debug!("session token cleared");
    }

    async fn load_persisted(&self) -> Option<SessionToken> {
        let value = match self.store.get_string(SESSION_TOKEN_KEY).await {
            Ok(value) => value?,
            Err(err) => {
                warn!(%err, "failed to read persisted session token");
                return None;
            }
        };
        let issued_at = match self.store.get_long(TOKEN_TIMESTAMP_KEY).await {
            Ok(millis) => millis.and_then(from_millis)?,
            Err(err) => {
                warn!(%err, "failed to read session token timestamp");
                return None;
            }
        };
        Some(SessionToken::new(value, issued_at))
    }

    async fn request_new_token(&self) -> Option<SessionToken> {
        let grant = match self.source.request_token().await {
            Ok(grant) => grant,
            Err(err) => {
                warn!(%err, "session token request failed");
                return None;
            }
        };
        if grant.response_code != 0 || grant.token.is_empty() {
            warn!(
                code = grant.response_code,
                message = %grant.response_message,
                "session token request rejected"
            );
            return None;
        }

        let token = SessionToken::new(grant.token, self.clock.now());
        self.persist(&token).await;
        info!("issued new session token");
        Some(token)
    }

    async fn persist(&self, token: &SessionToken) {
        if let Err(err) = self
            .store
            .set_string(SESSION_TOKEN_KEY, token.value())
            .await
        {
            warn!(%err, "failed to persist session token");
            return;
        }
        if let Err(err) = self
            .store
            .set_long(TOKEN_TIMESTAMP_KEY, token.issued_at().timestamp_millis())
            .await
        {
            warn!(%err, "failed to persist session token timestamp");
        }
    }
}
