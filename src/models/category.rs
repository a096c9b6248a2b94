//! Meal categories of a day board

use serde::{Deserialize, Serialize};

/// Meal-time bucket a day entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Breakfast,
    Lunch,
    Snack,
    Dinner,
    #[default]
    Extra,
}

impl Category {
    /// All categories in board order
    pub const ALL: [Category; 5] = [
        Category::Breakfast,
        Category::Lunch,
        Category::Snack,
        Category::Dinner,
        Category::Extra,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Breakfast => "breakfast",
            Category::Lunch => "lunch",
            Category::Snack => "snack",
            Category::Dinner => "dinner",
            Category::Extra => "extra",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Breakfast => "Breakfast",
            Category::Lunch => "Lunch",
            Category::Snack => "Snack",
            Category::Dinner => "Dinner",
            Category::Extra => "Extra",
        }
    }

    /// Strict parse of a category id
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Some(Category::Breakfast),
            "lunch" => Some(Category::Lunch),
            "snack" => Some(Category::Snack),
            "dinner" => Some(Category::Dinner),
            "extra" => Some(Category::Extra),
            _ => None,
        }
    }

    /// Lenient parse: anything unknown lands in `extra`
    pub fn from_str_or_extra(s: &str) -> Self {
        Self::from_str(s).unwrap_or(Category::Extra)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
