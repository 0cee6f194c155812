//! Forms for filing requests and issues against content.
//!
//! The function and skill forms are two-level: the caller first offers the
//! libraries (or topics), then the functions (or skills) of the one picked.
//! A submission whose child does not belong to the chosen parent fails on
//! the child field.

use super::fields::{CharField, ChoiceField, EnumField};
use super::{FormData, REQUEST_TYPES};
use crate::domain::{Choice, ContentRef, NewRequest, RequestType};
use crate::validation::FieldErrors;

/// Subject bound on library and function requests
const SHORT_SUBJECT_MAX: usize = 20;

/// Subject bound on topic and skill requests
const LONG_SUBJECT_MAX: usize = 40;

const REQUEST_TYPE: EnumField = EnumField::new("request_type", REQUEST_TYPES);
const SOLUTION: CharField = CharField::new("solution");
const NOTE: CharField = CharField::new("note").optional();

/// Shared tail of every request form
fn clean_body(
    data: &FormData,
    subject_max: usize,
    errors: &mut FieldErrors,
) -> Option<Body> {
    let request_type = REQUEST_TYPE.clean::<RequestType>(data, errors);
    let subject = CharField::new("subject")
        .max_length(subject_max)
        .clean(data, errors);
    let solution = SOLUTION.clean(data, errors);
    let note = NOTE.clean(data, errors);

    Some((request_type?, subject?, solution?, note?))
}

type Body = (RequestType, String, String, String);

fn build(
    target: Option<ContentRef>,
    body: Option<Body>,
    errors: FieldErrors,
) -> Result<NewRequest, FieldErrors> {
    match (target, body) {
        (Some(target), Some((request_type, subject, solution, note))) => {
            errors.into_result(NewRequest {
                target,
                request_type,
                subject,
                solution,
                note,
            })
        }
        _ => Err(errors),
    }
}

#[derive(Debug, Clone)]
pub struct LibraryRequestForm {
    library: ChoiceField,
}

impl LibraryRequestForm {
    pub fn new(libraries: Vec<Choice>) -> Self {
        Self {
            library: ChoiceField::new("library", libraries),
        }
    }

    pub fn validate(&self, data: &FormData) -> Result<NewRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let library = self.library.clean_required(data, &mut errors);
        let body = clean_body(data, SHORT_SUBJECT_MAX, &mut errors);
        build(library.map(ContentRef::library), body, errors)
    }
}

/// `functions` are the functions of the pre-selected library
#[derive(Debug, Clone)]
pub struct FunctionRequestForm {
    library: ChoiceField,
    function: ChoiceField,
}

impl FunctionRequestForm {
    pub fn new(libraries: Vec<Choice>, functions: Vec<Choice>) -> Self {
        Self {
            library: ChoiceField::new("library", libraries),
            function: ChoiceField::new("function", functions),
        }
    }

    pub fn validate(&self, data: &FormData) -> Result<NewRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let library = self.library.clean_required(data, &mut errors);
        let function = self.function.clean_required(data, &mut errors);
        let body = clean_body(data, SHORT_SUBJECT_MAX, &mut errors);
        build(library.and(function).map(ContentRef::function), body, errors)
    }
}

#[derive(Debug, Clone)]
pub struct TopicRequestForm {
    topic: ChoiceField,
}

impl TopicRequestForm {
    pub fn new(topics: Vec<Choice>) -> Self {
        Self {
            topic: ChoiceField::new("topic", topics),
        }
    }

    pub fn validate(&self, data: &FormData) -> Result<NewRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let topic = self.topic.clean_required(data, &mut errors);
        let body = clean_body(data, LONG_SUBJECT_MAX, &mut errors);
        build(topic.map(ContentRef::topic), body, errors)
    }
}

/// `skills` are the skills of the pre-selected topic
#[derive(Debug, Clone)]
pub struct SkillRequestForm {
    topic: ChoiceField,
    skill: ChoiceField,
}

impl SkillRequestForm {
    pub fn new(topics: Vec<Choice>, skills: Vec<Choice>) -> Self {
        Self {
            topic: ChoiceField::new("topic", topics),
            skill: ChoiceField::new("skill", skills),
        }
    }

    pub fn validate(&self, data: &FormData) -> Result<NewRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let topic = self.topic.clean_required(data, &mut errors);
        let skill = self.skill.clean_required(data, &mut errors);
        let body = clean_body(data, LONG_SUBJECT_MAX, &mut errors);
        build(topic.and(skill).map(ContentRef::skill), body, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(subject: &str) -> Vec<(&'static str, String)> {
        vec![
            ("request_type", "issue".to_string()),
            ("subject", subject.to_string()),
            ("solution", "check the docs".to_string()),
        ]
    }

    #[test]
    fn test_library_request_valid() {
        let form = LibraryRequestForm::new(vec![Choice::new(3, "os")]);
        let mut pairs = body("bug");
        pairs.push(("library", "3".to_string()));

        let new = form.validate(&FormData::from_pairs(pairs)).unwrap();
        assert_eq!(new.target, ContentRef::library(3));
        assert_eq!(new.request_type, RequestType::Issue);
        assert_eq!(new.note, "");
    }

    #[test]
    fn test_short_subject_bound_on_function_requests() {
        let form =
            FunctionRequestForm::new(vec![Choice::new(1, "os")], vec![Choice::new(2, "join")]);
        let mut pairs = body(&"s".repeat(21));
        pairs.push(("library", "1".to_string()));
        pairs.push(("function", "2".to_string()));

        let errors = form.validate(&FormData::from_pairs(pairs)).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["subject"]);
    }

    #[test]
    fn test_long_subject_bound_on_topic_requests() {
        let form = TopicRequestForm::new(vec![Choice::new(1, "formatting")]);
        let mut pairs = body(&"s".repeat(40));
        pairs.push(("topic", "1".to_string()));
        assert!(form.validate(&FormData::from_pairs(pairs)).is_ok());
    }

    #[test]
    fn test_skill_outside_selected_topic() {
        // Skills offered are those of the pre-selected topic only
        let form = SkillRequestForm::new(
            vec![Choice::new(1, "formatting"), Choice::new(2, "sorting")],
            vec![Choice::new(10, "f-strings")],
        );
        let mut pairs = body("typo");
        pairs.push(("topic", "1".to_string()));
        pairs.push(("skill", "11".to_string()));

        let errors = form.validate(&FormData::from_pairs(pairs)).unwrap_err();
        assert!(errors.contains("skill"));
        assert!(!errors.contains("topic"));
    }

    #[test]
    fn test_bad_request_type() {
        let form = TopicRequestForm::new(vec![Choice::new(1, "formatting")]);
        let data = FormData::from_pairs([
            ("topic", "1"),
            ("request_type", "complaint"),
            ("subject", "x"),
            ("solution", "y"),
        ]);

        let errors = form.validate(&data).unwrap_err();
        assert!(errors.contains("request_type"));
    }
}
