use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use trivia_core::model::{Difficulty, Question, QuestionType};
use url::Url;

use super::source::{
    QuestionBatch, QuestionRequest, QuestionSource, ResponseCode, TokenGrant, TokenSource,
};
use crate::error::{ApiConfigError, TriviaApiError};

pub const DEFAULT_BASE_URL: &str = "https://opentdb.com/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriviaApiConfig {
    base_url: Url,
    questions_url: Url,
    token_url: Url,
}

impl TriviaApiConfig {
    /// Parse a base URL and resolve the question and token endpoints under it.
    ///
    /// A missing trailing slash is added so endpoints join under the given path.
    ///
    /// # Errors
    ///
    /// Returns `ApiConfigError::InvalidBaseUrl` if the URL cannot be parsed.
    pub fn new(base_url: &str) -> Result<Self, ApiConfigError> {
        let invalid = |source| ApiConfigError::InvalidBaseUrl {
            raw: base_url.to_string(),
            source,
        };
        let trimmed = base_url.trim();
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        let base = Url::parse(&normalized).map_err(invalid)?;
        let questions_url = base.join("api.php").map_err(invalid)?;
        let token_url = base.join("api_token.php").map_err(invalid)?;
        Ok(Self {
            base_url: base,
            questions_url,
            token_url,
        })
    }

    /// Reads `TRIVIA_API_BASE_URL`, falling back to the public Open Trivia DB host.
    ///
    /// # Errors
    ///
    /// Returns `ApiConfigError::InvalidBaseUrl` if the variable holds an invalid URL.
    pub fn from_env() -> Result<Self, ApiConfigError> {
        let raw = env::var("TRIVIA_API_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        Self::new(&raw)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// HTTP client for Open Trivia DB. Serves both questions and session tokens.
#[derive(Clone)]
pub struct OpenTdbClient {
    client: Client,
    questions_url: Url,
    token_url: Url,
}

impl OpenTdbClient {
    /// # Errors
    ///
    /// Returns `TriviaApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &TriviaApiConfig) -> Result<Self, TriviaApiError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            questions_url: config.questions_url.clone(),
            token_url: config.token_url.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        query: &[(&str, String)],
    ) -> Result<T, TriviaApiError> {
        let response = self.client.get(url.clone()).query(query).send().await?;
        let status = response.status();
        tracing::debug!(%url, status = status.as_u16(), "trivia API response");

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TriviaApiError::RateLimited);
        }
        if !status.is_success() {
            return Err(TriviaApiError::HttpStatus(status));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl QuestionSource for OpenTdbClient {
    async fn fetch(&self, request: &QuestionRequest) -> Result<QuestionBatch, TriviaApiError> {
        let body: QuestionsResponse = self
            .get_json(&self.questions_url, &request.query_pairs())
            .await?;
        Ok(body.into_batch())
    }
}

#[async_trait]
impl TokenSource for OpenTdbClient {
    async fn request_token(&self) -> Result<TokenGrant, TriviaApiError> {
        let body: TokenResponse = self
            .get_json(&self.token_url, &[("command", "request".to_string())])
            .await?;
        Ok(TokenGrant {
            response_code: body.response_code,
            response_message: body.response_message,
            token: body.token,
        })
    }
}

#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    response_code: i32,
    #[serde(default)]
    results: Vec<ApiQuestion>,
}

impl QuestionsResponse {
    fn into_batch(self) -> QuestionBatch {
        QuestionBatch {
            response_code: ResponseCode::from_raw(self.response_code),
            questions: self.results.into_iter().map(ApiQuestion::into_question).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiQuestion {
    category: String,
    #[serde(rename = "type")]
    question_type: QuestionType,
    difficulty: Difficulty,
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

impl ApiQuestion {
    fn into_question(self) -> Question {
        Question::new(
            self.category,
            self.question_type,
            self.difficulty,
            self.question,
            self.correct_answer,
            self.incorrect_answers,
        )
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    response_code: i32,
    #[serde(default)]
    response_message: String,
    #[serde(default)]
    token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_normalizes_trailing_slash() {
        let config = TriviaApiConfig::new("http://localhost:8080/trivia").unwrap();
        assert_eq!(
            config.questions_url.as_str(),
            "http://localhost:8080/trivia/api.php"
        );
        let config = TriviaApiConfig::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(config.token_url.as_str(), "https://opentdb.com/api_token.php");
    }

    #[test]
    fn config_rejects_garbage() {
        assert!(matches!(
            TriviaApiConfig::new("not a url"),
            Err(ApiConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn questions_payload_maps_to_batch() {
        let body = r#"{
            "response_code": 0,
            "results": [{
                "type": "multiple",
                "difficulty": "medium",
                "category": "Science: Computers",
                "question": "What does &quot;CPU&quot; stand for?",
                "correct_answer": "Central Processing Unit",
                "incorrect_answers": ["Central Process Unit", "Computer Personal Unit", "Central Processor Unit"]
            }]
        }"#;
        let parsed: QuestionsResponse = serde_json::from_str(body).unwrap();
        let batch = parsed.into_batch();

        assert_eq!(batch.response_code, ResponseCode::Success);
        assert_eq!(batch.questions.len(), 1);
        let question = &batch.questions[0];
        assert_eq!(question.question_type(), QuestionType::Multiple);
        assert_eq!(question.difficulty(), Difficulty::Medium);
        assert_eq!(question.correct_answer(), "Central Processing Unit");
        assert_eq!(question.incorrect_answers().len(), 3);
    }

    #[test]
    fn token_error_payload_has_no_results() {
        let parsed: QuestionsResponse =
            serde_json::from_str(r#"{"response_code": 4, "results": []}"#).unwrap();
        assert_eq!(parsed.into_batch().response_code, ResponseCode::TokenEmpty);

        let parsed: QuestionsResponse = serde_json::from_str(r#"{"response_code": 3}"#).unwrap();
        assert!(parsed.results.is_empty());
    }

    #[test]
    fn token_payload_parses() {
        let parsed: TokenResponse = serde_json::from_str(
            r#"{"response_code":0,"response_message":"Token Generated Successfully!","token":"f00d"}"#,
        )
        .unwrap();
        assert_eq!(parsed.response_code, 0);
        assert_eq!(parsed.token, "f00d");
    }
}
