mod category;
mod game_config;
mod question;
mod token;

pub use category::{CATEGORIES, Category, CategoryId, category_name};
pub use game_config::{
    DEFAULT_QUESTION_COUNT, Difficulty, GameConfig, GameConfigError, MAX_QUESTION_COUNT,
    ParseDifficultyError,
};
pub use question::{ParseQuestionTypeError, Question, QuestionType};
pub use token::{SessionToken, TOKEN_VALIDITY_HOURS};
