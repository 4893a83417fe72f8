#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use services::{
    QuestionBatch, QuestionRequest, QuestionSource, ResponseCode, TokenGrant, TokenSource,
    TriviaApiError,
};
use tokio::sync::Notify;
use trivia_core::model::{Difficulty, Question, QuestionType};

/// One scripted answer from the fake question source.
pub enum Reply {
    Batch(i32, Vec<Question>),
    RateLimited,
    Status(reqwest::StatusCode),
    /// Signals `started`, then waits for `release` before answering.
    Gated {
        started: Arc<Notify>,
        release: Arc<Notify>,
        code: i32,
        questions: Vec<Question>,
    },
}

impl Reply {
    pub fn ok(questions: Vec<Question>) -> Self {
        Reply::Batch(0, questions)
    }

    pub fn code(code: i32) -> Self {
        Reply::Batch(code, Vec::new())
    }
}

#[derive(Default)]
pub struct ScriptedQuestions {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<QuestionRequest>>,
}

impl ScriptedQuestions {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<QuestionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuestionSource for ScriptedQuestions {
    async fn fetch(&self, request: &QuestionRequest) -> Result<QuestionBatch, TriviaApiError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected question fetch");
        match reply {
            Reply::Batch(code, questions) => Ok(batch(code, questions)),
            Reply::RateLimited => Err(TriviaApiError::RateLimited),
            Reply::Status(status) => Err(TriviaApiError::HttpStatus(status)),
            Reply::Gated {
                started,
                release,
                code,
                questions,
            } => {
                started.notify_one();
                release.notified().await;
                Ok(batch(code, questions))
            }
        }
    }
}

fn batch(code: i32, questions: Vec<Question>) -> QuestionBatch {
    QuestionBatch {
        response_code: ResponseCode::from_raw(code),
        questions,
    }
}

/// Issues `tok-1`, `tok-2`, ... on each request.
#[derive(Default)]
pub struct CountingTokens {
    calls: AtomicUsize,
}

impl CountingTokens {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenSource for CountingTokens {
    async fn request_token(&self) -> Result<TokenGrant, TriviaApiError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TokenGrant {
            response_code: 0,
            response_message: "Token Generated Successfully!".into(),
            token: format!("tok-{n}"),
        })
    }
}

pub fn question(label: &str) -> Question {
    Question::new(
        "General Knowledge",
        QuestionType::Multiple,
        Difficulty::Easy,
        format!("Question {label}?"),
        format!("right-{label}"),
        vec![
            format!("wrong-{label}-a"),
            format!("wrong-{label}-b"),
            format!("wrong-{label}-c"),
        ],
    )
}

pub fn questions(prefix: &str, count: usize) -> Vec<Question> {
    (0..count).map(|i| question(&format!("{prefix}{i}"))).collect()
}
