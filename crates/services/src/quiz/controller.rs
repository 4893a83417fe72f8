use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};
use trivia_core::model::{GameConfig, Question};
use trivia_core::text;

use super::state::{QuizFailure, QuizSnapshot, QuizState};
use crate::api::{QuestionBatch, QuestionRequest, QuestionSource, ResponseCode};
use crate::error::TriviaApiError;
use crate::streak_service::StreakService;
use crate::token_manager::TokenManager;

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

#[derive(Default)]
struct QuizSession {
    config: Option<GameConfig>,
    // Bumped on every reset; fetch results from older generations are dropped.
    generation: u64,
    fetching: Option<u64>,
    queue: Vec<Question>,
    cursor: usize,
    selected_answer: Option<String>,
    submitted: bool,
    last_answer_correct: Option<bool>,
    current_streak: u32,
    best_streak: u32,
    state: QuizState,
}

impl QuizSession {
    fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot {
            state: self.state.clone(),
            config: self.config,
            selected_answer: self.selected_answer.clone(),
            submitted: self.submitted,
            last_answer_correct: self.last_answer_correct,
            current_streak: self.current_streak,
            best_streak: self.best_streak,
            cursor: self.cursor,
            queued: self.queue.len(),
        }
    }

    /// Same config, and either questions on hand or a fetch already running for it.
    fn is_serving(&self, config: &GameConfig) -> bool {
        self.config.as_ref() == Some(config)
            && (!self.queue.is_empty() || self.fetching == Some(self.generation))
    }

    fn reset(&mut self, config: GameConfig) {
        self.config = Some(config);
        self.generation = self.generation.wrapping_add(1);
        self.fetching = None;
        self.queue.clear();
        self.cursor = 0;
        self.selected_answer = None;
        self.submitted = false;
        self.last_answer_correct = None;
        self.current_streak = 0;
    }

    fn clear_answer(&mut self) {
        self.selected_answer = None;
        self.submitted = false;
        self.last_answer_correct = None;
    }

    /// Shows the question at the cursor. Returns false when the queue is exhausted.
    fn show_current(&mut self) -> bool {
        match self.queue.get(self.cursor) {
            Some(question) => {
                self.state = QuizState::Ready(question.clone());
                true
            }
            None => false,
        }
    }
}

/// A fetch claimed for one session generation.
struct FetchTicket {
    generation: u64,
    config: GameConfig,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Drives one quiz session: question queue, answer state and streaks.
///
/// Operations are serialized through an async mutex. Network round trips run with the
/// mutex released; their results are applied only if the session they were started for
/// is still the active one. Every state change is published once on a watch channel
/// (see [`QuizSessionController::subscribe`]). Public operations never return errors;
/// failures become [`QuizState::Error`].
pub struct QuizSessionController {
    questions: Arc<dyn QuestionSource>,
    tokens: Arc<TokenManager>,
    streaks: StreakService,
    session: Mutex<QuizSession>,
    updates: watch::Sender<QuizSnapshot>,
}

impl QuizSessionController {
    /// Builds a controller and restores the persisted best streak.
    pub async fn new(
        questions: Arc<dyn QuestionSource>,
        tokens: Arc<TokenManager>,
        streaks: StreakService,
    ) -> Self {
        let best_streak = streaks.best_streak().await.unwrap_or_else(|err| {
            warn!(%err, "failed to load best streak; starting from 0");
            0
        });
        let session = QuizSession {
            best_streak,
            ..QuizSession::default()
        };
        let (updates, _) = watch::channel(session.snapshot());
        Self {
            questions,
            tokens,
            streaks,
            session: Mutex::new(session),
            updates,
        }
    }

    /// Current published state.
    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        self.updates.borrow().clone()
    }

    /// Receiver notified after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuizSnapshot> {
        self.updates.subscribe()
    }

    /// Starts a game with `config`.
    ///
    /// Passing the config of the game already being served is a no-op, so re-renders that
    /// repeat the call do not refetch or lose progress. Any other config resets the session
    /// and fetches a first batch.
    pub async fn start_game(&self, config: GameConfig) {
        let ticket = {
            let mut session = self.session.lock().await;
            if session.is_serving(&config) {
                debug!(?config, "game already active; start ignored");
                return;
            }
            info!(?config, "starting game");
            session.reset(config);
            self.begin_fetch(&mut session)
        };
        self.run_fetch(ticket).await;
    }

    /// Restarts the active game from scratch, bypassing the same-config guard.
    pub async fn restart(&self) {
        let ticket = {
            let mut session = self.session.lock().await;
            let Some(config) = session.config else {
                return;
            };
            info!(?config, "restarting game");
            session.reset(config);
            self.begin_fetch(&mut session)
        };
        self.run_fetch(ticket).await;
    }

    /// Shows the question at the cursor, refilling the queue when it is exhausted.
    pub async fn show_current_question(&self) {
        let ticket = {
            let mut session = self.session.lock().await;
            if session.show_current() {
                self.publish(&session);
                return;
            }
            self.begin_fetch(&mut session)
        };
        self.run_fetch(ticket).await;
    }

    /// Selects an answer. Ignored once the answer has been submitted.
    pub async fn select_answer(&self, answer: impl Into<String>) {
        let mut session = self.session.lock().await;
        if session.submitted {
            return;
        }
        session.selected_answer = Some(answer.into());
        self.publish(&session);
    }

    /// Submits the selected answer and updates the streaks.
    ///
    /// Ignored without a selection, so a submitted question always has an answer. A
    /// second submit for the same question is also ignored. Without a shown question the
    /// submission is recorded but nothing is scored.
    pub async fn submit_answer(&self) {
        let mut session = self.session.lock().await;
        if session.submitted || session.selected_answer.is_none() {
            return;
        }
        session.submitted = true;

        let verdict = match (session.state.question(), session.selected_answer.as_deref()) {
            (Some(question), Some(answer)) => Some(question.is_correct_answer(answer)),
            _ => None,
        };

        let mut new_best = None;
        if let Some(correct) = verdict {
            session.last_answer_correct = Some(correct);
            if correct {
                session.current_streak = session.current_streak.saturating_add(1);
                if session.current_streak > session.best_streak {
                    session.best_streak = session.current_streak;
                    new_best = Some(session.best_streak);
                }
            } else {
                session.current_streak = 0;
            }
            debug!(correct, streak = session.current_streak, "answer submitted");
        }

        if let Some(best) = new_best {
            if let Err(err) = self.streaks.save_best_streak(best).await {
                warn!(%err, best, "failed to persist best streak");
            }
        }
        self.publish(&session);
    }

    /// Moves to the next question, fetching more when the queue runs out.
    pub async fn next_question(&self) {
        let ticket = {
            let mut session = self.session.lock().await;
            session.clear_answer();
            if session.cursor < session.queue.len() {
                session.cursor += 1;
            }
            if session.show_current() {
                self.publish(&session);
                return;
            }
            self.begin_fetch(&mut session)
        };
        self.run_fetch(ticket).await;
    }

    /// Resets the current streak without touching the best streak.
    pub async fn reset_streak(&self) {
        let mut session = self.session.lock().await;
        session.current_streak = 0;
        self.publish(&session);
    }

    /// Decodes HTML entities in API text for display.
    #[must_use]
    pub fn decode_html_entities(text: &str) -> String {
        text::decode_html_entities(text)
    }

    //
    // ─── FETCH CYCLE ───────────────────────────────────────────────────────────
    //

    /// Claims a fetch for the current generation and enters `Loading`.
    ///
    /// Returns `None` when there is no game or a fetch for this generation is already
    /// running. Publishes in either case so pending answer-state changes are visible.
    fn begin_fetch(&self, session: &mut QuizSession) -> Option<FetchTicket> {
        let Some(config) = session.config else {
            self.publish(session);
            return None;
        };
        if session.fetching == Some(session.generation) {
            debug!("fetch already in flight");
            self.publish(session);
            return None;
        }
        session.fetching = Some(session.generation);
        session.state = QuizState::Loading;
        self.publish(session);
        Some(FetchTicket {
            generation: session.generation,
            config,
        })
    }

    async fn run_fetch(&self, ticket: Option<FetchTicket>) {
        let Some(ticket) = ticket else {
            return;
        };
        let outcome = self.request_batch(&ticket).await;
        self.apply_fetch(&ticket, outcome).await;
    }

    /// Requests a batch, retrying once with a fresh token if the server rejects ours.
    async fn request_batch(&self, ticket: &FetchTicket) -> Result<QuestionBatch, TriviaApiError> {
        let mut retried = false;
        loop {
            let token = self.tokens.get_valid_token().await;
            if token.is_none() {
                debug!("fetching without a session token");
            }
            let request = QuestionRequest::for_config(&ticket.config, token);
            let batch = self.questions.fetch(&request).await?;

            match batch.response_code {
                ResponseCode::TokenNotFound if !retried => {
                    self.tokens.clear_token().await;
                    if !self.is_current(ticket).await {
                        return Ok(batch);
                    }
                    warn!("session token rejected; retrying with a fresh token");
                    retried = true;
                }
                ResponseCode::TokenEmpty => {
                    info!("session token exhausted");
                    self.tokens.clear_token().await;
                    return Ok(batch);
                }
                _ => return Ok(batch),
            }
        }
    }

    async fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.session.lock().await.generation == ticket.generation
    }

    async fn apply_fetch(
        &self,
        ticket: &FetchTicket,
        outcome: Result<QuestionBatch, TriviaApiError>,
    ) {
        let mut session = self.session.lock().await;
        if session.generation != ticket.generation {
            debug!(
                stale = ticket.generation,
                active = session.generation,
                "discarding superseded fetch result"
            );
            return;
        }
        session.fetching = None;

        let failure = match outcome {
            Ok(batch) => match batch.response_code {
                ResponseCode::Success if batch.questions.is_empty() => {
                    Some(QuizFailure::NoQuestions)
                }
                ResponseCode::Success => {
                    info!(count = batch.questions.len(), "questions received");
                    session.queue.extend(batch.questions);
                    if session.show_current() {
                        None
                    } else {
                        Some(QuizFailure::NoQuestions)
                    }
                }
                ResponseCode::TokenEmpty => Some(QuizFailure::PoolExhausted),
                other => Some(QuizFailure::Api(other.code())),
            },
            Err(err) => {
                warn!(%err, "question fetch failed");
                Some(QuizFailure::from(&err))
            }
        };

        if let Some(failure) = failure {
            session.state = QuizState::Error(failure);
        }
        self.publish(&session);
    }

    fn publish(&self, session: &QuizSession) {
        let snapshot = session.snapshot();
        self.updates.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}
