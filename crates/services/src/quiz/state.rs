use thiserror::Error;
use trivia_core::model::{GameConfig, Question};

use crate::error::TriviaApiError;

/// Why the session could not show a question. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum QuizFailure {
    #[error("No questions received")]
    NoQuestions,

    #[error(
        "🎉 You've seen every available question!\n\nThis session's question pool is used up. It will reset automatically."
    )]
    PoolExhausted,

    #[error("API Error (Code {0})")]
    Api(i32),

    #[error(
        "⏱️ Too many requests!\n\nThe trivia API limits how fast questions can be fetched.\nPlease wait a few seconds and try again."
    )]
    RateLimited,

    #[error("HTTP Error {0}")]
    Http(String),

    #[error("Error: {0}")]
    Network(String),
}

impl QuizFailure {
    /// Advisory failures invite the player to wait rather than signalling a fault.
    #[must_use]
    pub fn is_advisory(&self) -> bool {
        matches!(self, QuizFailure::RateLimited)
    }
}

impl From<&TriviaApiError> for QuizFailure {
    fn from(err: &TriviaApiError) -> Self {
        match err {
            TriviaApiError::RateLimited => QuizFailure::RateLimited,
            TriviaApiError::HttpStatus(status) => QuizFailure::Http(status.to_string()),
            other => QuizFailure::Network(other.to_string()),
        }
    }
}

/// What the quiz screen should show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QuizState {
    /// No game started yet.
    #[default]
    Idle,
    Loading,
    Ready(Question),
    Error(QuizFailure),
}

impl QuizState {
    #[must_use]
    pub fn question(&self) -> Option<&Question> {
        match self {
            QuizState::Ready(question) => Some(question),
            _ => None,
        }
    }
}

/// Published view of the session after each state change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuizSnapshot {
    pub state: QuizState,
    pub config: Option<GameConfig>,
    pub selected_answer: Option<String>,
    pub submitted: bool,
    pub last_answer_correct: Option<bool>,
    pub current_streak: u32,
    pub best_streak: u32,
    /// Index of the current question in the queue.
    pub cursor: usize,
    /// Questions fetched so far in this game.
    pub queued: usize,
}

impl QuizSnapshot {
    /// 1-based position for progress display.
    #[must_use]
    pub fn question_number(&self) -> usize {
        self.cursor + 1
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.queued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rate_limit_is_advisory() {
        assert!(QuizFailure::RateLimited.is_advisory());
        assert!(!QuizFailure::Network("timeout".into()).is_advisory());
        assert!(!QuizFailure::PoolExhausted.is_advisory());
    }

    #[test]
    fn messages_embed_codes_and_differ_for_rate_limits() {
        assert_eq!(QuizFailure::Api(2).to_string(), "API Error (Code 2)");
        assert_eq!(QuizFailure::NoQuestions.to_string(), "No questions received");
        assert!(QuizFailure::RateLimited.to_string().contains("Too many requests"));
    }

    #[test]
    fn api_errors_map_to_failures() {
        assert_eq!(
            QuizFailure::from(&TriviaApiError::RateLimited),
            QuizFailure::RateLimited
        );
        let failure = QuizFailure::from(&TriviaApiError::HttpStatus(
            reqwest::StatusCode::SERVICE_UNAVAILABLE,
        ));
        assert_eq!(failure, QuizFailure::Http("503 Service Unavailable".into()));
    }
}
