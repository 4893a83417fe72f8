use async_trait::async_trait;
use trivia_core::model::{CategoryId, Difficulty, GameConfig, Question, QuestionType};

use crate::error::TriviaApiError;

/// `response_code` values returned in trivia API bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    /// 0: results returned.
    Success,
    /// 1: not enough questions for the query.
    NoResults,
    /// 2: a query parameter was rejected.
    InvalidParameter,
    /// 3: the session token does not exist.
    TokenNotFound,
    /// 4: the session token has served every matching question.
    TokenEmpty,
    /// 5: too many requests from this client.
    RateLimit,
    Unknown(i32),
}

impl ResponseCode {
    #[must_use]
    pub fn from_raw(code: i32) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::NoResults,
            2 => Self::InvalidParameter,
            3 => Self::TokenNotFound,
            4 => Self::TokenEmpty,
            5 => Self::RateLimit,
            other => Self::Unknown(other),
        }
    }

    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::NoResults => 1,
            Self::InvalidParameter => 2,
            Self::TokenNotFound => 3,
            Self::TokenEmpty => 4,
            Self::RateLimit => 5,
            Self::Unknown(code) => code,
        }
    }
}

/// Filters for one question batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRequest {
    pub amount: u32,
    pub category: Option<CategoryId>,
    pub difficulty: Option<Difficulty>,
    pub question_type: QuestionType,
    pub token: Option<String>,
}

impl QuestionRequest {
    /// Multiple-choice request for a game configuration.
    #[must_use]
    pub fn for_config(config: &GameConfig, token: Option<String>) -> Self {
        Self {
            amount: config.question_count(),
            category: config.category(),
            difficulty: config.difficulty(),
            question_type: QuestionType::Multiple,
            token,
        }
    }

    /// Query string pairs; unset filters are omitted.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("amount", self.amount.to_string())];
        if let Some(category) = self.category {
            pairs.push(("category", category.to_string()));
        }
        if let Some(difficulty) = self.difficulty {
            pairs.push(("difficulty", difficulty.as_str().to_string()));
        }
        pairs.push(("type", self.question_type.as_str().to_string()));
        if let Some(token) = &self.token {
            pairs.push(("token", token.clone()));
        }
        pairs
    }
}

/// A question batch as answered by the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBatch {
    pub response_code: ResponseCode,
    pub questions: Vec<Question>,
}

/// Reply to a token request. `response_code` 0 means `token` is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub response_code: i32,
    pub response_message: String,
    pub token: String,
}

/// Where questions come from.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch one batch of questions.
    ///
    /// # Errors
    ///
    /// Returns `TriviaApiError::RateLimited` for HTTP 429 and other variants for
    /// transport or status failures.
    async fn fetch(&self, request: &QuestionRequest) -> Result<QuestionBatch, TriviaApiError>;
}

/// Issues deduplication tokens.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Ask for a fresh session token.
    ///
    /// # Errors
    ///
    /// Returns `TriviaApiError` for transport or status failures.
    async fn request_token(&self) -> Result<TokenGrant, TriviaApiError>;
}
