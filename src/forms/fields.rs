//! Field definitions used by the forms.
//!
//! A field reads its raw value from `FormData`, records problems into a
//! shared `FieldErrors`, and returns the cleaned value when there are none.

use std::str::FromStr;

use super::FormData;
use crate::domain::Choice;
use crate::validation::FieldErrors;

/// Free-text field, trimmed before validation
#[derive(Debug, Clone, Copy)]
pub struct CharField {
    pub name: &'static str,
    pub max_length: Option<usize>,
    pub required: bool,
}

impl CharField {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            max_length: None,
            required: true,
        }
    }

    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Cleaned value; empty string when optional and missing
    pub fn clean(&self, data: &FormData, errors: &mut FieldErrors) -> Option<String> {
        let value = data.get(self.name).map(str::trim).unwrap_or_default();
        let before = errors.get(self.name).len();

        if self.required {
            errors.require(self.name, value);
        }
        if let Some(max) = self.max_length {
            errors.max_length(self.name, value, max);
        }

        (errors.get(self.name).len() == before).then(|| value.to_string())
    }
}

/// Field whose value must be the id of one of a list of choices
#[derive(Debug, Clone)]
pub struct ChoiceField {
    pub name: &'static str,
    pub choices: Vec<Choice>,
    pub required: bool,
}

impl ChoiceField {
    pub fn new(name: &'static str, choices: Vec<Choice>) -> Self {
        Self {
            name,
            choices,
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// `Some(Some(id))` for a valid pick, `Some(None)` for an allowed blank
    pub fn clean(&self, data: &FormData, errors: &mut FieldErrors) -> Option<Option<i64>> {
        let raw = data.get(self.name).map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            if self.required {
                errors.add(self.name, "This field is required.");
                return None;
            }
            return Some(None);
        }

        match raw.parse::<i64>() {
            Ok(id) if self.choices.iter().any(|c| c.id == id) => Some(Some(id)),
            _ => {
                errors.add(
                    self.name,
                    format!("Select a valid choice. {raw} is not one of the available choices."),
                );
                None
            }
        }
    }

    /// Cleaned value of a required field
    pub fn clean_required(&self, data: &FormData, errors: &mut FieldErrors) -> Option<i64> {
        self.clean(data, errors).flatten()
    }
}

/// Field restricted to a fixed set parsed through `FromStr`
#[derive(Debug, Clone, Copy)]
pub struct EnumField {
    pub name: &'static str,
    pub allowed: &'static [&'static str],
}

impl EnumField {
    pub const fn new(name: &'static str, allowed: &'static [&'static str]) -> Self {
        Self { name, allowed }
    }

    pub fn clean<T: FromStr>(&self, data: &FormData, errors: &mut FieldErrors) -> Option<T> {
        let raw = data.get(self.name).map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            errors.add(self.name, "This field is required.");
            return None;
        }

        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                errors.add(
                    self.name,
                    format!(
                        "Select a valid choice. {raw} is not one of: {}.",
                        self.allowed.join(", ")
                    ),
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_field_trims_and_bounds() {
        let field = CharField::new("name").max_length(3);
        let mut errors = FieldErrors::new();

        let data = FormData::from_pairs([("name", "  os  ")]);
        assert_eq!(field.clean(&data, &mut errors), Some("os".to_string()));

        let data = FormData::from_pairs([("name", "pathlib")]);
        assert_eq!(field.clean(&data, &mut errors), None);
        assert!(errors.contains("name"));
    }

    #[test]
    fn test_optional_char_field() {
        let field = CharField::new("note").optional();
        let mut errors = FieldErrors::new();
        assert_eq!(
            field.clean(&FormData::default(), &mut errors),
            Some(String::new())
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_choice_field() {
        let field = ChoiceField::new("library", vec![Choice::new(1, "os"), Choice::new(2, "re")]);
        let mut errors = FieldErrors::new();

        let data = FormData::from_pairs([("library", "2")]);
        assert_eq!(field.clean_required(&data, &mut errors), Some(2));

        let data = FormData::from_pairs([("library", "9")]);
        assert_eq!(field.clean_required(&data, &mut errors), None);

        let data = FormData::from_pairs([("library", "os")]);
        assert_eq!(field.clean_required(&data, &mut errors), None);
        assert_eq!(errors.get("library").len(), 2);
    }

    #[test]
    fn test_optional_choice_blank() {
        let field = ChoiceField::new("tag", vec![]).optional();
        let mut errors = FieldErrors::new();
        assert_eq!(field.clean(&FormData::default(), &mut errors), Some(None));
        assert!(errors.is_empty());
    }
}
