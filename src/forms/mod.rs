//! Data-entry forms.
//!
//! Forms validate and normalize raw input into the `New*` shapes the store
//! accepts. Choice fields are filled from `Store::list_selectable` by the
//! caller before validation; a form never queries the database and never
//! writes anything. Every field error is collected before returning.

use std::collections::BTreeMap;

use serde::Deserialize;

pub mod content;
pub mod fields;
pub mod requests;

pub use content::{
    FunctionForm, LibraryForm, ProfileForm, SkillForm, TagForm, TextForm, TopicForm,
};
pub use fields::{CharField, ChoiceField, EnumField};
pub use requests::{FunctionRequestForm, LibraryRequestForm, SkillRequestForm, TopicRequestForm};

/// Raw submitted input, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, String>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// Set a field only when a value is present
    pub fn set_opt(&mut self, field: impl Into<String>, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.set(field, value);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

const REQUEST_TYPES: &[&str] = &["request", "issue"];
const TAG_CATEGORIES: &[&str] = &["library", "topic"];
