use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::api::{OpenTdbClient, QuestionSource, TokenSource, TriviaApiConfig};
use crate::error::AppServicesError;
use crate::quiz::QuizSessionController;
use crate::streak_service::StreakService;
use crate::token_manager::TokenManager;

/// Assembles app-facing services around one storage backend and one trivia source.
#[derive(Clone)]
pub struct AppServices {
    quiz: Arc<QuizSessionController>,
    streaks: StreakService,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the Open Trivia DB HTTP API.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or HTTP client setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        api: &TriviaApiConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let client = Arc::new(OpenTdbClient::new(api)?);
        Ok(Self::from_parts(&storage, client.clone(), client, clock).await)
    }

    /// Wire services from explicit collaborators.
    pub async fn from_parts(
        storage: &Storage,
        questions: Arc<dyn QuestionSource>,
        token_source: Arc<dyn TokenSource>,
        clock: Clock,
    ) -> Self {
        let tokens = Arc::new(TokenManager::new(
            clock,
            token_source,
            Arc::clone(&storage.preferences),
        ));
        let streaks = StreakService::new(Arc::clone(&storage.preferences));
        let quiz = Arc::new(
            QuizSessionController::new(questions, tokens, streaks.clone()).await,
        );
        Self { quiz, streaks }
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizSessionController> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn streaks(&self) -> StreakService {
        self.streaks.clone()
    }
}
