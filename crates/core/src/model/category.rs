use serde::{Deserialize, Serialize};
use std::fmt;

/// Open Trivia DB category identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryId(u32);

impl CategoryId {
    /// Creates a new `CategoryId`
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying u32 value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CategoryId({})", self.0)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CategoryId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A selectable question category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: &'static str,
}

const fn category(id: u32, name: &'static str) -> Category {
    Category {
        id: CategoryId(id),
        name,
    }
}

/// Categories served by Open Trivia DB, in display order.
pub const CATEGORIES: [Category; 24] = [
    category(9, "General Knowledge"),
    category(10, "Books"),
    category(11, "Film"),
    category(12, "Music"),
    category(13, "Musicals & Theatres"),
    category(14, "Television"),
    category(15, "Video Games"),
    category(16, "Board Games"),
    category(17, "Science & Nature"),
    category(18, "Computers"),
    category(19, "Mathematics"),
    category(20, "Mythology"),
    category(21, "Sports"),
    category(22, "Geography"),
    category(23, "History"),
    category(24, "Politics"),
    category(25, "Art"),
    category(26, "Celebrities"),
    category(27, "Animals"),
    category(28, "Vehicles"),
    category(29, "Comics"),
    category(30, "Gadgets"),
    category(31, "Anime & Manga"),
    category(32, "Cartoon & Animations"),
];

/// Display name for an optional category selection.
#[must_use]
pub fn category_name(id: Option<CategoryId>) -> &'static str {
    let Some(id) = id else {
        return "Any Category";
    };
    CATEGORIES
        .iter()
        .find(|category| category.id == id)
        .map_or("Unknown", |category| category.name)
}
