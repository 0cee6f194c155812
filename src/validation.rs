//! Field-scoped validation errors shared by the forms and the store.

use std::collections::BTreeMap;

use serde::Serialize;

/// Validation failures keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors holding a single message for one field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record a message against a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for a field
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Field names with at least one error, sorted
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(value)` when no errors were recorded
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    /// Require a non-blank value
    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "This field is required.");
        }
    }

    /// Bound the length of a value, counted in characters
    pub fn max_length(&mut self, field: &str, value: &str, max: usize) {
        let len = value.chars().count();
        if len > max {
            self.add(
                field,
                format!("Ensure this value has at most {max} characters (it has {len})."),
            );
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_and_length() {
        let mut errors = FieldErrors::new();
        errors.require("name", "   ");
        errors.max_length("description", &"x".repeat(5), 4);
        errors.max_length("note", "ok", 4);

        assert!(errors.contains("name"));
        assert!(errors.contains("description"));
        assert!(!errors.contains("note"));
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["description", "name"]);
    }

    #[test]
    fn test_length_counts_chars() {
        let mut errors = FieldErrors::new();
        // 4 chars, 12 bytes
        errors.max_length("name", "名前名前", 4);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_display_and_into_result() {
        let mut errors = FieldErrors::single("name", "taken");
        errors.add("tag", "wrong category");

        assert_eq!(errors.to_string(), "name: taken; tag: wrong category");
        assert!(errors.clone().into_result(()).is_err());
        assert!(FieldErrors::new().into_result(1).is_ok());
    }
}
