mod support;

use std::sync::Arc;

use services::{AppServices, QuizState};
use storage::repository::{PersistenceStore, Storage};
use trivia_core::model::GameConfig;
use trivia_core::time::fixed_clock;

use support::{CountingTokens, Reply, ScriptedQuestions, questions};

#[tokio::test]
async fn wired_services_share_one_preference_store() {
    let storage = Storage::in_memory();
    let source = Arc::new(ScriptedQuestions::new(vec![Reply::ok(questions("a", 3))]));
    let tokens = Arc::new(CountingTokens::default());

    let services = AppServices::from_parts(&storage, source.clone(), tokens, fixed_clock()).await;
    let quiz = services.quiz();
    quiz.start_game(GameConfig::default()).await;

    let question = quiz.snapshot().state.question().cloned().unwrap();
    quiz.select_answer(question.correct_answer()).await;
    quiz.submit_answer().await;

    assert!(matches!(quiz.snapshot().state, QuizState::Ready(_)));
    assert_eq!(services.streaks().best_streak().await.unwrap(), 1);
    assert_eq!(
        storage
            .preferences
            .get_string("session_token")
            .await
            .unwrap()
            .as_deref(),
        Some("tok-1")
    );
    assert_eq!(source.requests()[0].token.as_deref(), Some("tok-1"));
}
