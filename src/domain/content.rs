//! Catalogued knowledge items: libraries, their functions, topics and
//! the skills filed under each topic.
//!
//! Every item has a creator, a timestamp refreshed on each save and a
//! `visible` flag used for soft deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::ProfileId;
use super::tag::{TagCategory, TagId};

/// Row identifier of a content entity
pub type EntityId = i64;

pub const LIBRARY_NAME_MAX: usize = 20;
pub const FUNCTION_NAME_MAX: usize = 20;
pub const TOPIC_TITLE_MAX: usize = 40;
pub const SKILL_TITLE_MAX: usize = 40;
pub const DESCRIPTION_MAX: usize = 400;
pub const EXAMPLE_MAX: usize = 400;

/// The four kinds of content entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Library,
    Function,
    Topic,
    Skill,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Library,
        ContentKind::Function,
        ContentKind::Topic,
        ContentKind::Skill,
    ];

    /// Singular lowercase name, also used as the form field name
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Library => "library",
            ContentKind::Function => "function",
            ContentKind::Topic => "topic",
            ContentKind::Skill => "skill",
        }
    }

    /// Table holding entities of this kind
    pub fn table(self) -> &'static str {
        match self {
            ContentKind::Library => "libraries",
            ContentKind::Function => "functions",
            ContentKind::Topic => "topics",
            ContentKind::Skill => "skills",
        }
    }

    /// Column referencing an entity of this kind from child and log tables
    pub fn foreign_key(self) -> &'static str {
        match self {
            ContentKind::Library => "library_id",
            ContentKind::Function => "function_id",
            ContentKind::Topic => "topic_id",
            ContentKind::Skill => "skill_id",
        }
    }

    /// The unique, human-facing field (`name` or `title`)
    pub fn label_field(self) -> &'static str {
        match self {
            ContentKind::Library | ContentKind::Function => "name",
            ContentKind::Topic | ContentKind::Skill => "title",
        }
    }

    /// Maximum length of the label field
    pub fn label_max(self) -> usize {
        match self {
            ContentKind::Library => LIBRARY_NAME_MAX,
            ContentKind::Function => FUNCTION_NAME_MAX,
            ContentKind::Topic => TOPIC_TITLE_MAX,
            ContentKind::Skill => SKILL_TITLE_MAX,
        }
    }

    /// Owning kind; deleting the owner deletes this entity
    pub fn parent(self) -> Option<ContentKind> {
        match self {
            ContentKind::Function => Some(ContentKind::Library),
            ContentKind::Skill => Some(ContentKind::Topic),
            ContentKind::Library | ContentKind::Topic => None,
        }
    }

    pub fn child(self) -> Option<ContentKind> {
        match self {
            ContentKind::Library => Some(ContentKind::Function),
            ContentKind::Topic => Some(ContentKind::Skill),
            ContentKind::Function | ContentKind::Skill => None,
        }
    }

    /// Tag category accepted by this kind, if it can be tagged at all
    pub fn tag_category(self) -> Option<TagCategory> {
        match self {
            ContentKind::Function => Some(TagCategory::Library),
            ContentKind::Skill => Some(TagCategory::Topic),
            ContentKind::Library | ContentKind::Topic => None,
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "library" | "lib" => Ok(ContentKind::Library),
            "function" | "func" => Ok(ContentKind::Function),
            "topic" => Ok(ContentKind::Topic),
            "skill" => Ok(ContentKind::Skill),
            _ => anyhow::bail!("Unknown content kind: {}", s),
        }
    }
}

/// Reference to a single content entity of any kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentRef {
    pub kind: ContentKind,
    pub id: EntityId,
}

impl ContentRef {
    pub fn new(kind: ContentKind, id: EntityId) -> Self {
        Self { kind, id }
    }

    pub fn library(id: EntityId) -> Self {
        Self::new(ContentKind::Library, id)
    }

    pub fn function(id: EntityId) -> Self {
        Self::new(ContentKind::Function, id)
    }

    pub fn topic(id: EntityId) -> Self {
        Self::new(ContentKind::Topic, id)
    }

    pub fn skill(id: EntityId) -> Self {
        Self::new(ContentKind::Skill, id)
    }
}

impl std::fmt::Display for ContentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

/// A built-in type, module or third-party library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub id: EntityId,
    pub name: String,
    pub description: String,

    /// Cleared when the creator's account is deleted
    pub creator: Option<ProfileId>,

    /// Last save time
    pub timestamp: DateTime<Utc>,
    pub visible: bool,
}

/// A function or method of a library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub id: EntityId,
    pub library: EntityId,
    pub name: String,
    pub description: String,
    pub example: String,

    /// Free-form usage text
    pub instance: String,

    /// Library-category tag
    pub tag: Option<TagId>,
    pub creator: Option<ProfileId>,
    pub timestamp: DateTime<Utc>,
    pub visible: bool,
}

/// A general theme that groups coding skills
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub creator: Option<ProfileId>,
    pub timestamp: DateTime<Utc>,
    pub visible: bool,
}

/// A concrete coding skill under a topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: EntityId,
    pub topic: EntityId,
    pub title: String,

    /// The problem this skill solves
    pub background: String,
    pub solution: String,

    /// Topic-category tag
    pub tag: Option<TagId>,
    pub creator: Option<ProfileId>,
    pub timestamp: DateTime<Utc>,
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewLibrary {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewFunction {
    pub library: EntityId,
    pub name: String,
    pub description: String,
    pub example: String,
    pub instance: String,
    pub tag: Option<TagId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewTopic {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewSkill {
    pub topic: EntityId,
    pub title: String,
    pub background: String,
    pub solution: String,
    pub tag: Option<TagId>,
}

/// Partial update of a library; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LibraryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FunctionChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub example: Option<String>,
    pub instance: Option<String>,

    /// `Some(None)` clears the tag
    pub tag: Option<Option<TagId>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TopicChanges {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SkillChanges {
    pub title: Option<String>,
    pub background: Option<String>,
    pub solution: Option<String>,
    pub tag: Option<Option<TagId>>,
}

impl LibraryChanges {
    pub fn apply(self, library: &mut Library) {
        if let Some(name) = self.name {
            library.name = name;
        }
        if let Some(description) = self.description {
            library.description = description;
        }
    }
}

impl FunctionChanges {
    pub fn apply(self, function: &mut Function) {
        if let Some(name) = self.name {
            function.name = name;
        }
        if let Some(description) = self.description {
            function.description = description;
        }
        if let Some(example) = self.example {
            function.example = example;
        }
        if let Some(instance) = self.instance {
            function.instance = instance;
        }
        if let Some(tag) = self.tag {
            function.tag = tag;
        }
    }
}

impl TopicChanges {
    pub fn apply(self, topic: &mut Topic) {
        if let Some(title) = self.title {
            topic.title = title;
        }
        if let Some(description) = self.description {
            topic.description = description;
        }
    }
}

impl SkillChanges {
    pub fn apply(self, skill: &mut Skill) {
        if let Some(title) = self.title {
            skill.title = title;
        }
        if let Some(background) = self.background {
            skill.background = background;
        }
        if let Some(solution) = self.solution {
            skill.solution = solution;
        }
        if let Some(tag) = self.tag {
            skill.tag = tag;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_relationships() {
        assert_eq!(ContentKind::Function.parent(), Some(ContentKind::Library));
        assert_eq!(ContentKind::Library.child(), Some(ContentKind::Function));
        assert_eq!(ContentKind::Skill.parent(), Some(ContentKind::Topic));
        assert_eq!(ContentKind::Topic.parent(), None);

        for kind in ContentKind::ALL {
            if let Some(parent) = kind.parent() {
                assert_eq!(parent.child(), Some(kind));
            }
        }
    }

    #[test]
    fn test_tag_category_per_kind() {
        assert_eq!(ContentKind::Function.tag_category(), Some(TagCategory::Library));
        assert_eq!(ContentKind::Skill.tag_category(), Some(TagCategory::Topic));
        assert_eq!(ContentKind::Library.tag_category(), None);
    }

    #[test]
    fn test_kind_parse_and_display() {
        for kind in ContentKind::ALL {
            assert_eq!(kind.to_string().parse::<ContentKind>().unwrap(), kind);
        }
        assert!("module".parse::<ContentKind>().is_err());
        assert_eq!(ContentRef::skill(7).to_string(), "skill#7");
    }

    #[test]
    fn test_function_changes_clear_tag() {
        let mut function = Function {
            id: 1,
            library: 1,
            name: "join".to_string(),
            description: String::new(),
            example: String::new(),
            instance: String::new(),
            tag: Some(3),
            creator: None,
            timestamp: Utc::now(),
            visible: true,
        };

        FunctionChanges {
            tag: Some(None),
            ..Default::default()
        }
        .apply(&mut function);

        assert_eq!(function.tag, None);
        assert_eq!(function.name, "join");
    }
}
