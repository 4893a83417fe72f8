mod controller;
mod state;

pub use controller::QuizSessionController;
pub use state::{QuizFailure, QuizSnapshot, QuizState};
