//! Forms for creating content entities, tags, texts and profiles.

use super::fields::{CharField, ChoiceField, EnumField};
use super::{FormData, TAG_CATEGORIES};
use crate::domain::account::DISPLAY_NAME_MAX;
use crate::domain::content::{
    DESCRIPTION_MAX, EXAMPLE_MAX, FUNCTION_NAME_MAX, LIBRARY_NAME_MAX, SKILL_TITLE_MAX,
    TOPIC_TITLE_MAX,
};
use crate::domain::tag::TAG_LABEL_MAX;
use crate::domain::text::{TEXT_NAME_MAX, TEXT_TITLE_MAX};
use crate::domain::{Choice, NewFunction, NewLibrary, NewSkill, NewTopic, TagCategory};
use crate::validation::FieldErrors;

/// Cleaned tag input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInput {
    pub category: TagCategory,
    pub label: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TagForm;

impl TagForm {
    const CLASSES: EnumField = EnumField::new("classes", TAG_CATEGORIES);
    const TAG: CharField = CharField::new("tag").max_length(TAG_LABEL_MAX);

    pub fn validate(&self, data: &FormData) -> Result<TagInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let category = Self::CLASSES.clean::<TagCategory>(data, &mut errors);
        let label = Self::TAG.clean(data, &mut errors);

        match (category, label) {
            (Some(category), Some(label)) => errors.into_result(TagInput { category, label }),
            _ => Err(errors),
        }
    }
}

/// Name and description of a library (built-in function or module)
#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryForm;

impl LibraryForm {
    const NAME: CharField = CharField::new("name").max_length(LIBRARY_NAME_MAX);
    const DESCRIPTION: CharField = CharField::new("description").max_length(DESCRIPTION_MAX);

    pub fn validate(&self, data: &FormData) -> Result<NewLibrary, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = Self::NAME.clean(data, &mut errors);
        let description = Self::DESCRIPTION.clean(data, &mut errors);

        match (name, description) {
            (Some(name), Some(description)) => {
                errors.into_result(NewLibrary { name, description })
            }
            _ => Err(errors),
        }
    }
}

/// A function or method of a library.
///
/// `libraries` and `tags` come from `Selectable::Libraries` and
/// `Selectable::Tags(TagCategory::Library)`.
#[derive(Debug, Clone)]
pub struct FunctionForm {
    library: ChoiceField,
    tag: ChoiceField,
}

impl FunctionForm {
    const NAME: CharField = CharField::new("name").max_length(FUNCTION_NAME_MAX);
    const DESCRIPTION: CharField = CharField::new("description").max_length(DESCRIPTION_MAX);
    const EXAMPLE: CharField = CharField::new("example").max_length(EXAMPLE_MAX).optional();
    const INSTANCE: CharField = CharField::new("instance");

    pub fn new(libraries: Vec<Choice>, tags: Vec<Choice>) -> Self {
        Self {
            library: ChoiceField::new("library", libraries),
            tag: ChoiceField::new("tag", tags).optional(),
        }
    }

    pub fn validate(&self, data: &FormData) -> Result<NewFunction, FieldErrors> {
        let mut errors = FieldErrors::new();
        let library = self.library.clean_required(data, &mut errors);
        let name = Self::NAME.clean(data, &mut errors);
        let description = Self::DESCRIPTION.clean(data, &mut errors);
        let example = Self::EXAMPLE.clean(data, &mut errors);
        let instance = Self::INSTANCE.clean(data, &mut errors);
        let tag = self.tag.clean(data, &mut errors);

        match (library, name, description, example, instance, tag) {
            (
                Some(library),
                Some(name),
                Some(description),
                Some(example),
                Some(instance),
                Some(tag),
            ) => errors.into_result(NewFunction {
                    library,
                    name,
                    description,
                    example,
                    instance,
                    tag,
                }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TopicForm;

impl TopicForm {
    const TITLE: CharField = CharField::new("title").max_length(TOPIC_TITLE_MAX);
    const DESCRIPTION: CharField = CharField::new("description").max_length(DESCRIPTION_MAX);

    pub fn validate(&self, data: &FormData) -> Result<NewTopic, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = Self::TITLE.clean(data, &mut errors);
        let description = Self::DESCRIPTION.clean(data, &mut errors);

        match (title, description) {
            (Some(title), Some(description)) => errors.into_result(NewTopic { title, description }),
            _ => Err(errors),
        }
    }
}

/// A coding skill under a topic; `tags` are topic-category tags
#[derive(Debug, Clone)]
pub struct SkillForm {
    topic: ChoiceField,
    tag: ChoiceField,
}

impl SkillForm {
    const TITLE: CharField = CharField::new("title").max_length(SKILL_TITLE_MAX);
    const BACKGROUND: CharField = CharField::new("background").max_length(DESCRIPTION_MAX);
    const SOLUTION: CharField = CharField::new("solution");

    pub fn new(topics: Vec<Choice>, tags: Vec<Choice>) -> Self {
        Self {
            topic: ChoiceField::new("topic", topics),
            tag: ChoiceField::new("tag", tags).optional(),
        }
    }

    pub fn validate(&self, data: &FormData) -> Result<NewSkill, FieldErrors> {
        let mut errors = FieldErrors::new();
        let topic = self.topic.clean_required(data, &mut errors);
        let title = Self::TITLE.clean(data, &mut errors);
        let background = Self::BACKGROUND.clean(data, &mut errors);
        let solution = Self::SOLUTION.clean(data, &mut errors);
        let tag = self.tag.clean(data, &mut errors);

        match (topic, title, background, solution, tag) {
            (Some(topic), Some(title), Some(background), Some(solution), Some(tag)) => errors
                .into_result(NewSkill {
                    topic,
                    title,
                    background,
                    solution,
                    tag,
                }),
            _ => Err(errors),
        }
    }
}

/// Cleaned site text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub name: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextForm;

impl TextForm {
    const NAME: CharField = CharField::new("name").max_length(TEXT_NAME_MAX);
    const TITLE: CharField = CharField::new("title").max_length(TEXT_TITLE_MAX);
    const CONTENT: CharField = CharField::new("content").optional();

    pub fn validate(&self, data: &FormData) -> Result<TextInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = Self::NAME.clean(data, &mut errors);
        let title = Self::TITLE.clean(data, &mut errors);
        let content = Self::CONTENT.clean(data, &mut errors);

        match (name, title, content) {
            (Some(name), Some(title), Some(content)) => {
                errors.into_result(TextInput { name, title, content })
            }
            _ => Err(errors),
        }
    }
}

/// Display name of a new profile; may be blank
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileForm;

impl ProfileForm {
    const DISPLAY_NAME: CharField = CharField::new("display_name")
        .max_length(DISPLAY_NAME_MAX)
        .optional();

    pub fn validate(&self, data: &FormData) -> Result<String, FieldErrors> {
        let mut errors = FieldErrors::new();
        match Self::DISPLAY_NAME.clean(data, &mut errors) {
            Some(name) => errors.into_result(name),
            None => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_form_collects_all_errors() {
        let data = FormData::from_pairs([("description", "d".repeat(401))]);
        let errors = LibraryForm.validate(&data).unwrap_err();

        assert!(errors.contains("name"));
        assert!(errors.contains("description"));
    }

    #[test]
    fn test_function_form_valid() {
        let form = FunctionForm::new(vec![Choice::new(1, "os")], vec![Choice::new(5, "path")]);
        let data = FormData::from_pairs([
            ("library", "1"),
            ("name", "os.path.join"),
            ("description", "join path components"),
            ("instance", "os.path.join('a', 'b')"),
            ("tag", "5"),
        ]);

        let new = form.validate(&data).unwrap();
        assert_eq!(new.library, 1);
        assert_eq!(new.tag, Some(5));
        assert_eq!(new.example, "");
    }

    #[test]
    fn test_function_form_rejects_unoffered_tag() {
        // Only library-category tags are offered, so a topic tag id is invalid
        let form = FunctionForm::new(vec![Choice::new(1, "os")], vec![Choice::new(5, "path")]);
        let data = FormData::from_pairs([
            ("library", "1"),
            ("name", "join"),
            ("description", "d"),
            ("instance", "i"),
            ("tag", "6"),
        ]);

        let errors = form.validate(&data).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["tag"]);
    }

    #[test]
    fn test_skill_form_requires_topic() {
        let form = SkillForm::new(vec![], vec![]);
        let data = FormData::from_pairs([
            ("title", "swap variables"),
            ("background", "swap two values"),
            ("solution", "a, b = b, a"),
        ]);

        let errors = form.validate(&data).unwrap_err();
        assert!(errors.contains("topic"));
    }

    #[test]
    fn test_tag_form() {
        let data = FormData::from_pairs([("classes", "topic"), ("tag", "parsing")]);
        let input = TagForm.validate(&data).unwrap();
        assert_eq!(input.category, TagCategory::Topic);

        let data = FormData::from_pairs([("classes", "skill"), ("tag", "")]);
        let errors = TagForm.validate(&data).unwrap_err();
        assert!(errors.contains("classes"));
        assert!(errors.contains("tag"));
    }

    #[test]
    fn test_profile_form_bound() {
        let data = FormData::from_pairs([("display_name", "much too long")]);
        assert!(ProfileForm.validate(&data).is_err());
        assert_eq!(ProfileForm.validate(&FormData::new()).unwrap(), "");
    }
}
