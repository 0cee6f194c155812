//! Domain types for the lesspy catalogue.
//!
//! This module contains the core data structures:
//! - Account/UserProfile: who created or approved something
//! - Content: Library, Function, Topic, Skill
//! - Tag: categorized labels for functions and skills
//! - RequestLog: moderated requests and issues
//! - Text: static site copy

use serde::{Deserialize, Serialize};

pub mod account;
pub mod content;
pub mod request;
pub mod tag;
pub mod text;

// Re-export commonly used types
pub use account::{Account, AccountId, ProfileId, UserProfile};
pub use content::{
    ContentKind, ContentRef, EntityId, Function, FunctionChanges, Library, LibraryChanges,
    NewFunction, NewLibrary, NewSkill, NewTopic, Skill, SkillChanges, Topic, TopicChanges,
};
pub use request::{NewRequest, RequestFilter, RequestId, RequestLog, RequestType};
pub use tag::{Tag, TagCategory, TagId};
pub use text::Text;

/// One selectable option of a dynamic choice field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: i64,
    pub label: String,
}

impl Choice {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}
