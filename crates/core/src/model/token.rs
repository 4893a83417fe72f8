use chrono::{DateTime, Duration, Utc};

/// Hours a session token stays usable after issuance.
pub const TOKEN_VALIDITY_HOURS: i64 = 6;

/// A deduplication token issued by the trivia API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    value: String,
    issued_at: DateTime<Utc>,
}

impl SessionToken {
    #[must_use]
    pub fn new(value: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            issued_at,
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    #[must_use]
    pub fn validity() -> Duration {
        Duration::hours(TOKEN_VALIDITY_HOURS)
    }

    /// True while the token is younger than the validity window.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now - self.issued_at < Self::validity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn expires_exactly_at_six_hours() {
        let token = SessionToken::new("abc", fixed_now());
        assert!(token.is_valid_at(fixed_now()));
        assert!(token.is_valid_at(fixed_now() + Duration::hours(6) - Duration::milliseconds(1)));
        assert!(!token.is_valid_at(fixed_now() + Duration::hours(6)));
    }
}
