use serde::{Deserialize, Serialize};

/// A question category: the numeric id the API filters by and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
}

/// Categories the app ships with, so a quiz can start before `/categories` is fetched.
const BUILTIN_CATEGORIES: &[(u32, &str)] = &[
    (9, "General Knowledge"),
    (11, "Entertainment: Film"),
    (17, "Science & Nature"),
    (18, "Science: Computers"),
    (19, "Science: Mathematics"),
    (21, "Sports"),
    (22, "Geography"),
    (23, "History"),
];

impl Category {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Returns the built-in category list.
    pub fn builtin() -> Vec<Category> {
        BUILTIN_CATEGORIES
            .iter()
            .map(|(id, name)| Category::new(*id, *name))
            .collect()
    }

    /// Looks up a built-in category by id.
    pub fn find_builtin(id: u32) -> Option<Category> {
        BUILTIN_CATEGORIES
            .iter()
            .find(|(builtin_id, _)| *builtin_id == id)
            .map(|(id, name)| Category::new(*id, *name))
    }

    /// The default category used when none is selected.
    pub fn general_knowledge() -> Category {
        Category::new(9, "General Knowledge")
    }

    /// Icon slug stored alongside quiz results.
    pub fn icon(&self) -> &'static str {
        match self.id {
            9 => "lightbulb",
            10..=16 | 26 | 29 | 31 | 32 => "film",
            17 | 27 => "leaf",
            18 | 30 => "computer",
            19 => "calculator",
            20 => "scroll",
            21 => "trophy",
            22 => "globe",
            23 => "landmark",
            24 => "ballot",
            25 => "palette",
            28 => "car",
            _ => "question",
        }
    }
}
