use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::category::CategoryId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameConfigError {
    #[error("question count must be between 1 and {MAX_QUESTION_COUNT}, got {0}")]
    InvalidQuestionCount(u32),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty: {0}")]
pub struct ParseDifficultyError(pub String);

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Question difficulty as understood by the trivia API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Wire value used in API queries.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

//
// ─── GAME CONFIG ───────────────────────────────────────────────────────────────
//

/// Number of questions requested per batch when the caller does not choose one.
pub const DEFAULT_QUESTION_COUNT: u32 = 10;

/// Largest batch the trivia API will serve in one request.
pub const MAX_QUESTION_COUNT: u32 = 50;

/// Filters for a game. Two configs are the same game when all fields match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameConfig {
    category: Option<CategoryId>,
    difficulty: Option<Difficulty>,
    question_count: u32,
}

impl GameConfig {
    /// Creates a validated game configuration.
    ///
    /// # Errors
    ///
    /// Returns `GameConfigError::InvalidQuestionCount` if `question_count` is zero
    /// or above `MAX_QUESTION_COUNT`.
    pub fn new(
        category: Option<CategoryId>,
        difficulty: Option<Difficulty>,
        question_count: u32,
    ) -> Result<Self, GameConfigError> {
        if question_count == 0 || question_count > MAX_QUESTION_COUNT {
            return Err(GameConfigError::InvalidQuestionCount(question_count));
        }
        Ok(Self {
            category,
            difficulty,
            question_count,
        })
    }

    #[must_use]
    pub fn with_category(mut self, category: Option<CategoryId>) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn category(&self) -> Option<CategoryId> {
        self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }
}

impl Default for GameConfig {
    /// Quick play: any category, any difficulty, ten questions.
    fn default() -> Self {
        Self {
            category: None,
            difficulty: None,
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }
}
