use trivia_core::model::{
    CATEGORIES, CategoryId, DEFAULT_QUESTION_COUNT, Difficulty, GameConfig, GameConfigError,
    category_name,
};

/// Entry points offered on the home screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HomePreset {
    QuickPlay,
    CustomGame,
}

impl HomePreset {
    /// Config to start straight away, or `None` when the preset needs the setup screen.
    #[must_use]
    pub fn config(self) -> Option<GameConfig> {
        match self {
            HomePreset::QuickPlay => Some(GameConfig::default()),
            HomePreset::CustomGame => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomePresetVm {
    pub preset: HomePreset,
    pub title: &'static str,
    pub subtitle: String,
}

#[must_use]
pub fn home_presets() -> Vec<HomePresetVm> {
    vec![
        HomePresetVm {
            preset: HomePreset::QuickPlay,
            title: "Quick Play",
            subtitle: format!("{DEFAULT_QUESTION_COUNT} questions from any category"),
        },
        HomePresetVm {
            preset: HomePreset::CustomGame,
            title: "Custom Game",
            subtitle: "Pick a category, difficulty and length".to_string(),
        },
    ]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryOptionVm {
    pub id: Option<CategoryId>,
    pub label: &'static str,
}

/// "Any Category" followed by the catalogue in id order.
#[must_use]
pub fn category_options() -> Vec<CategoryOptionVm> {
    std::iter::once(CategoryOptionVm {
        id: None,
        label: category_name(None),
    })
    .chain(CATEGORIES.iter().map(|category| CategoryOptionVm {
        id: Some(category.id),
        label: category.name,
    }))
    .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DifficultyOptionVm {
    pub value: Option<Difficulty>,
    pub label: &'static str,
}

#[must_use]
pub fn difficulty_options() -> Vec<DifficultyOptionVm> {
    std::iter::once(DifficultyOptionVm {
        value: None,
        label: "Any",
    })
    .chain(Difficulty::ALL.iter().map(|difficulty| DifficultyOptionVm {
        value: Some(*difficulty),
        label: difficulty.label(),
    }))
    .collect()
}

/// Form state of the custom game screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameSetupVm {
    category: Option<CategoryId>,
    difficulty: Option<Difficulty>,
    amount: u32,
}

impl Default for GameSetupVm {
    fn default() -> Self {
        Self {
            category: None,
            difficulty: None,
            amount: DEFAULT_QUESTION_COUNT,
        }
    }
}

impl GameSetupVm {
    pub fn set_category(&mut self, category: Option<CategoryId>) {
        self.category = category;
    }

    pub fn set_difficulty(&mut self, difficulty: Option<Difficulty>) {
        self.difficulty = difficulty;
    }

    pub fn set_amount(&mut self, amount: u32) {
        self.amount = amount;
    }

    #[must_use]
    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// One-line description, e.g. `10 · Computers · Hard`.
    #[must_use]
    pub fn summary_label(&self) -> String {
        let difficulty = self.difficulty.map_or("Any", Difficulty::label);
        format!(
            "{} · {} · {}",
            self.amount,
            category_name(self.category),
            difficulty
        )
    }

    /// # Errors
    ///
    /// Returns `GameConfigError::InvalidQuestionCount` when the amount is out of range.
    pub fn build(&self) -> Result<GameConfig, GameConfigError> {
        GameConfig::new(self.category, self.difficulty, self.amount)
    }
}
