//! Donation categories and the legacy-compatible text encoding of a point's
//! category set.
//!
//! Storage keeps categories in a single text column. Newer rows hold a JSON
//! array string (`["ropa","papel"]`); older rows hold one bare category name.
//! Everything outside the store boundary works on the decoded `Vec<String>`.
//! Writes always encode a JSON array, so a legacy row is rewritten in the
//! array form the next time it is saved.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The fixed category vocabulary accepted on create and edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ropa,
    Vidrio,
    Plastico,
    Papel,
    Organicos,
    Otros,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Ropa,
        Category::Vidrio,
        Category::Plastico,
        Category::Papel,
        Category::Organicos,
        Category::Otros,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ropa => "ropa",
            Category::Vidrio => "vidrio",
            Category::Plastico => "plastico",
            Category::Papel => "papel",
            Category::Organicos => "organicos",
            Category::Otros => "otros",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown donation category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Decoded form of the stored category column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryField {
    /// A pre-JSON row holding one raw category string
    LegacySingle(String),
    /// A JSON array of category strings
    TaggedSet(Vec<String>),
}

impl CategoryField {
    /// Interpret a stored value. Never fails: anything that is not a
    /// non-empty JSON array of strings is treated as a legacy value.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(tags) if !tags.is_empty() => CategoryField::TaggedSet(tags),
            _ => CategoryField::LegacySingle(raw.to_string()),
        }
    }

    pub fn into_tags(self) -> Vec<String> {
        match self {
            CategoryField::LegacySingle(tag) => vec![tag],
            CategoryField::TaggedSet(tags) => tags,
        }
    }
}

/// Encode an ordered category list as a JSON array string.
pub fn encode(categories: &[String]) -> String {
    serde_json::Value::from(categories.to_vec()).to_string()
}

/// Decode a stored category column into an ordered, non-empty list.
pub fn decode(raw: &str) -> Vec<String> {
    CategoryField::parse(raw).into_tags()
}
