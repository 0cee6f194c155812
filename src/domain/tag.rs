//! Tags used to classify functions and skills.

use serde::{Deserialize, Serialize};

/// Identifier of a tag
pub type TagId = i64;

/// Maximum length of a tag label
pub const TAG_LABEL_MAX: usize = 20;

/// Which kind of content a tag applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    /// Tags for functions of a library
    Library,

    /// Tags for skills of a topic
    Topic,
}

impl TagCategory {
    /// Two-letter code stored in the database
    pub fn code(self) -> &'static str {
        match self {
            TagCategory::Library => "LB",
            TagCategory::Topic => "TP",
        }
    }

    /// Parse a stored code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "LB" => Some(TagCategory::Library),
            "TP" => Some(TagCategory::Topic),
            _ => None,
        }
    }
}

impl std::fmt::Display for TagCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagCategory::Library => write!(f, "library"),
            TagCategory::Topic => write!(f, "topic"),
        }
    }
}

impl std::str::FromStr for TagCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "library" | "lb" => Ok(TagCategory::Library),
            "topic" | "tp" => Ok(TagCategory::Topic),
            _ => anyhow::bail!("Unknown tag category: {}", s),
        }
    }
}

/// A categorized label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub category: TagCategory,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_codes() {
        for category in [TagCategory::Library, TagCategory::Topic] {
            assert_eq!(TagCategory::from_code(category.code()), Some(category));
        }
        assert_eq!(TagCategory::from_code("XX"), None);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("library".parse::<TagCategory>().unwrap(), TagCategory::Library);
        assert_eq!("TP".parse::<TagCategory>().unwrap(), TagCategory::Topic);
        assert!("skill".parse::<TagCategory>().is_err());
    }
}
