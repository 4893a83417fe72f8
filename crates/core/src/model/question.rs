use rand::rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

use crate::model::game_config::Difficulty;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown question type: {0}")]
pub struct ParseQuestionTypeError(pub String);

/// Answer layout of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Four options, one correct.
    Multiple,
    /// True / False.
    Boolean,
}

impl QuestionType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Multiple => "multiple",
            QuestionType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = ParseQuestionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiple" => Ok(Self::Multiple),
            "boolean" => Ok(Self::Boolean),
            _ => Err(ParseQuestionTypeError(s.to_string())),
        }
    }
}

/// A single trivia question as served by the API.
///
/// Text fields keep the API's HTML entity encoding; decode them for display with
/// [`crate::text::decode_html_entities`].
///
/// The answer order returned by [`Question::all_answers`] is shuffled on first
/// access and then fixed. Clones share that order, so a question handed to a view
/// shows the same layout as the one held in the session queue. A question built
/// with [`Question::new`] shuffles independently.
#[derive(Debug, Clone)]
pub struct Question {
    category: String,
    question_type: QuestionType,
    difficulty: Difficulty,
    prompt: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
    shuffled: Arc<OnceLock<Vec<String>>>,
}

impl Question {
    #[must_use]
    pub fn new(
        category: impl Into<String>,
        question_type: QuestionType,
        difficulty: Difficulty,
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        incorrect_answers: Vec<String>,
    ) -> Self {
        Self {
            category: category.into(),
            question_type,
            difficulty,
            prompt: prompt.into(),
            correct_answer: correct_answer.into(),
            incorrect_answers,
            shuffled: Arc::new(OnceLock::new()),
        }
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn incorrect_answers(&self) -> &[String] {
        &self.incorrect_answers
    }

    /// Correct and incorrect answers in a random order fixed for this question.
    #[must_use]
    pub fn all_answers(&self) -> &[String] {
        self.shuffled.get_or_init(|| {
            let mut answers = Vec::with_capacity(self.incorrect_answers.len() + 1);
            answers.extend(self.incorrect_answers.iter().cloned());
            answers.push(self.correct_answer.clone());
            answers.as_mut_slice().shuffle(&mut rng());
            answers
        })
    }

    /// Exact comparison against the correct answer; no trimming or case folding.
    #[must_use]
    pub fn is_correct_answer(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }
}

impl PartialEq for Question {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category
            && self.question_type == other.question_type
            && self.difficulty == other.difficulty
            && self.prompt == other.prompt
            && self.correct_answer == other.correct_answer
            && self.incorrect_answers == other.incorrect_answers
    }
}

impl Eq for Question {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn build(correct: &str, incorrect: &[&str]) -> Question {
        Question::new(
            "Science: Computers",
            QuestionType::Multiple,
            Difficulty::Easy,
            "What does &quot;CPU&quot; stand for?",
            correct,
            incorrect.iter().map(|s| (*s).to_string()).collect(),
        )
    }

    fn sorted(values: &[String]) -> Vec<String> {
        let mut values = values.to_vec();
        values.sort();
        values
    }

    #[test]
    fn answer_order_is_stable_for_an_instance() {
        let question = build("Central Processing Unit", &["A", "B", "C"]);
        let first = question.all_answers().to_vec();
        let second = question.all_answers().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn clones_share_the_cached_order() {
        let question = build("Central Processing Unit", &["A", "B", "C"]);
        let copy = question.clone();
        let order = copy.all_answers().to_vec();
        assert_eq!(question.all_answers(), order.as_slice());
    }

    #[test]
    fn correctness_is_exact_match() {
        let question = build("Central Processing Unit", &["A", "B", "C"]);
        assert!(question.is_correct_answer("Central Processing Unit"));
        assert!(!question.is_correct_answer("central processing unit"));
        assert!(!question.is_correct_answer("Central Processing Unit "));
    }

    #[test]
    fn equality_ignores_answer_order() {
        let left = build("X", &["A", "B", "C"]);
        let right = build("X", &["A", "B", "C"]);
        let _ = left.all_answers();
        assert_eq!(left, right);
    }

    #[test]
    fn question_type_parses_wire_values() {
        assert_eq!("boolean".parse::<QuestionType>(), Ok(QuestionType::Boolean));
        assert!("open".parse::<QuestionType>().is_err());
    }

    proptest! {
        #[test]
        fn all_answers_is_a_permutation(
            correct in "[a-z]{1,8}",
            incorrect in prop::collection::vec("[a-z]{1,8}", 0..5),
        ) {
            let question = Question::new(
                "cat",
                QuestionType::Multiple,
                Difficulty::Medium,
                "prompt",
                correct.clone(),
                incorrect.clone(),
            );
            let mut expected = incorrect.clone();
            expected.push(correct);

            let answers = question.all_answers().to_vec();
            prop_assert_eq!(sorted(&answers), sorted(&expected));
            prop_assert_eq!(question.all_answers(), answers.as_slice());
        }
    }
}
