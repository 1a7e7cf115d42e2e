use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A website category. Each category is stored in its own partition.
///
/// The set is closed: every read path enumerates [`Category::ALL`] and every
/// write path targets exactly one of its members. Adding a category means
/// adding a variant here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Games,
    Tools,
    Education,
    Business,
}

impl Category {
    /// All categories, in partition visit order.
    pub const ALL: &'static [Category] = &[
        Self::Games,
        Self::Tools,
        Self::Education,
        Self::Business,
    ];

    /// Partition name in the document store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Games => "games",
            Self::Tools => "tools",
            Self::Education => "education",
            Self::Business => "business",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError {
    invalid: String,
}

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid category '{}'. Valid values: {}",
            self.invalid,
            Category::ALL
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseCategoryError {}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "games" => Ok(Self::Games),
            "tools" => Ok(Self::Tools),
            "education" => Ok(Self::Education),
            "business" => Ok(Self::Business),
            _ => Err(ParseCategoryError {
                invalid: s.to_string(),
            }),
        }
    }
}

/// Category selector used by listings. `All` is the sentinel that keeps
/// every record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}
