use services::{QuizFailure, QuizSnapshot, QuizState};
use trivia_core::model::Question;
use trivia_core::text::decode_html_entities;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerState {
    Idle,
    Selected,
    Correct,
    Incorrect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOptionVm {
    /// Decoded text for display.
    pub label: String,
    /// Raw answer to hand back to `select_answer`.
    pub value: String,
    pub state: AnswerState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub progress_label: String,
    pub category: String,
    pub difficulty_chip: String,
    pub prompt: String,
    pub answers: Vec<AnswerOptionVm>,
    pub can_submit: bool,
    pub can_advance: bool,
    pub feedback: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorTone {
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizErrorVm {
    pub message: String,
    pub tone: ErrorTone,
}

impl From<&QuizFailure> for QuizErrorVm {
    fn from(failure: &QuizFailure) -> Self {
        let tone = if failure.is_advisory() {
            ErrorTone::Warning
        } else {
            ErrorTone::Error
        };
        Self {
            message: failure.to_string(),
            tone,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizScreenVm {
    Idle,
    Loading,
    Question(QuestionVm),
    Error(QuizErrorVm),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreakVm {
    pub current_label: String,
    pub best_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizVm {
    pub screen: QuizScreenVm,
    pub streak: StreakVm,
}

#[must_use]
pub fn map_quiz_snapshot(snapshot: &QuizSnapshot) -> QuizVm {
    let screen = match &snapshot.state {
        QuizState::Idle => QuizScreenVm::Idle,
        QuizState::Loading => QuizScreenVm::Loading,
        QuizState::Ready(question) => QuizScreenVm::Question(map_question(snapshot, question)),
        QuizState::Error(failure) => QuizScreenVm::Error(QuizErrorVm::from(failure)),
    };
    QuizVm {
        screen,
        streak: StreakVm {
            current_label: format!("🔥 {}", snapshot.current_streak),
            best_label: format!("🏆 {}", snapshot.best_streak),
        },
    }
}

fn map_question(snapshot: &QuizSnapshot, question: &Question) -> QuestionVm {
    let selected = snapshot.selected_answer.as_deref();
    let answers = question
        .all_answers()
        .iter()
        .map(|answer| AnswerOptionVm {
            label: decode_html_entities(answer),
            value: answer.clone(),
            state: answer_state(question, answer, selected, snapshot.submitted),
        })
        .collect();

    let feedback = snapshot.last_answer_correct.map(|correct| {
        if correct {
            "Correct!".to_string()
        } else {
            format!(
                "Wrong! The answer was {}",
                decode_html_entities(question.correct_answer())
            )
        }
    });

    QuestionVm {
        progress_label: format!(
            "Question {} of {}",
            snapshot.question_number(),
            snapshot.total_questions()
        ),
        category: decode_html_entities(question.category()),
        difficulty_chip: question.difficulty().as_str().to_uppercase(),
        prompt: decode_html_entities(question.prompt()),
        answers,
        can_submit: selected.is_some() && !snapshot.submitted,
        can_advance: snapshot.submitted,
        feedback,
    }
}

fn answer_state(
    question: &Question,
    answer: &str,
    selected: Option<&str>,
    submitted: bool,
) -> AnswerState {
    let is_selected = selected == Some(answer);
    if !submitted {
        return if is_selected {
            AnswerState::Selected
        } else {
            AnswerState::Idle
        };
    }
    if question.is_correct_answer(answer) {
        AnswerState::Correct
    } else if is_selected {
        AnswerState::Incorrect
    } else {
        AnswerState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trivia_core::model::{Difficulty, QuestionType};

    fn question() -> Question {
        Question::new(
            "Entertainment: Video Games",
            QuestionType::Multiple,
            Difficulty::Medium,
            "Who created &quot;Tetris&quot;?",
            "Alexey Pajitnov",
            vec![
                "Shigeru Miyamoto".to_string(),
                "Hideo Kojima".to_string(),
                "Will Wright".to_string(),
            ],
        )
    }

    fn ready(selected: Option<&str>, submitted: bool) -> QuizSnapshot {
        QuizSnapshot {
            state: QuizState::Ready(question()),
            selected_answer: selected.map(str::to_string),
            submitted,
            cursor: 2,
            queued: 10,
            current_streak: 3,
            best_streak: 7,
            ..QuizSnapshot::default()
        }
    }

    fn question_vm(snapshot: &QuizSnapshot) -> QuestionVm {
        match map_quiz_snapshot(snapshot).screen {
            QuizScreenVm::Question(vm) => vm,
            other => panic!("expected a question screen, got {other:?}"),
        }
    }

    fn state_of(vm: &QuestionVm, value: &str) -> AnswerState {
        vm.answers
            .iter()
            .find(|answer| answer.value == value)
            .map(|answer| answer.state)
            .unwrap()
    }

    #[test]
    fn question_screen_is_decoded_and_labelled() {
        let vm = question_vm(&ready(None, false));

        assert_eq!(vm.progress_label, "Question 3 of 10");
        assert_eq!(vm.prompt, "Who created \"Tetris\"?");
        assert_eq!(vm.difficulty_chip, "MEDIUM");
        assert_eq!(vm.answers.len(), 4);
        assert!(vm.answers.iter().all(|answer| answer.state == AnswerState::Idle));
        assert!(!vm.can_submit);
        assert!(!vm.can_advance);
        assert_eq!(vm.feedback, None);
    }

    #[test]
    fn selection_enables_submit() {
        let vm = question_vm(&ready(Some("Hideo Kojima"), false));

        assert_eq!(state_of(&vm, "Hideo Kojima"), AnswerState::Selected);
        assert_eq!(state_of(&vm, "Alexey Pajitnov"), AnswerState::Idle);
        assert!(vm.can_submit);
        assert!(!vm.can_advance);
    }

    #[test]
    fn submitted_wrong_answer_reveals_correct_one() {
        let mut snapshot = ready(Some("Hideo Kojima"), true);
        snapshot.last_answer_correct = Some(false);
        let vm = question_vm(&snapshot);

        assert_eq!(state_of(&vm, "Hideo Kojima"), AnswerState::Incorrect);
        assert_eq!(state_of(&vm, "Alexey Pajitnov"), AnswerState::Correct);
        assert_eq!(state_of(&vm, "Will Wright"), AnswerState::Idle);
        assert!(!vm.can_submit);
        assert!(vm.can_advance);
        assert_eq!(
            vm.feedback.as_deref(),
            Some("Wrong! The answer was Alexey Pajitnov")
        );
    }

    #[test]
    fn streak_labels() {
        let vm = map_quiz_snapshot(&ready(None, false));
        assert_eq!(vm.streak.current_label, "🔥 3");
        assert_eq!(vm.streak.best_label, "🏆 7");
    }

    #[test]
    fn rate_limit_is_a_warning() {
        let snapshot = QuizSnapshot {
            state: QuizState::Error(QuizFailure::RateLimited),
            ..QuizSnapshot::default()
        };
        let QuizScreenVm::Error(error) = map_quiz_snapshot(&snapshot).screen else {
            panic!("expected an error screen");
        };
        assert_eq!(error.tone, ErrorTone::Warning);

        let snapshot = QuizSnapshot {
            state: QuizState::Error(QuizFailure::Api(2)),
            ..QuizSnapshot::default()
        };
        let QuizScreenVm::Error(error) = map_quiz_snapshot(&snapshot).screen else {
            panic!("expected an error screen");
        };
        assert_eq!(error.tone, ErrorTone::Error);
        assert_eq!(error.message, "API Error (Code 2)");
    }

    #[test]
    fn loading_and_idle_map_directly() {
        let loading = QuizSnapshot {
            state: QuizState::Loading,
            ..QuizSnapshot::default()
        };
        assert_eq!(map_quiz_snapshot(&loading).screen, QuizScreenVm::Loading);
        assert_eq!(
            map_quiz_snapshot(&QuizSnapshot::default()).screen,
            QuizScreenVm::Idle
        );
    }
}
