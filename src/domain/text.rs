//! Site copy (usage notes, help pages) addressed by a short name.

use serde::{Deserialize, Serialize};

pub const TEXT_NAME_MAX: usize = 10;
pub const TEXT_TITLE_MAX: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub content: String,
}
