#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod error;
pub mod quiz;
pub mod streak_service;
pub mod token_manager;

pub use trivia_core::Clock;

pub use api::{
    OpenTdbClient, QuestionBatch, QuestionRequest, QuestionSource, ResponseCode, TokenGrant,
    TokenSource, TriviaApiConfig,
};
pub use app_services::AppServices;
pub use error::{ApiConfigError, AppServicesError, StreakError, TriviaApiError};
pub use quiz::{QuizFailure, QuizSessionController, QuizSnapshot, QuizState};
pub use streak_service::StreakService;
pub use token_manager::TokenManager;
