mod game_setup_vm;
mod quiz_vm;

pub use game_setup_vm::{
    CategoryOptionVm, DifficultyOptionVm, GameSetupVm, HomePreset, HomePresetVm,
    category_options, difficulty_options, home_presets,
};
pub use quiz_vm::{
    AnswerOptionVm, AnswerState, ErrorTone, QuestionVm, QuizErrorVm, QuizScreenVm, QuizVm,
    StreakVm, map_quiz_snapshot,
};
