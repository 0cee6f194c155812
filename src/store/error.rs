use thiserror::Error;

use crate::domain::{ProfileId, RequestId};
use crate::validation::FieldErrors;

/// Errors returned by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input violates a field constraint; nothing was written
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("Request {id} is already confirmed by {approver:?}")]
    AlreadyConfirmed {
        id: RequestId,
        approver: Option<ProfileId>,
    },

    /// Foreign-key or other constraint failure the store could not attribute to a field
    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn not_found(kind: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    /// Field errors, when this is a validation failure
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::Integrity(message.clone().unwrap_or_else(|| err.to_string()))
            }
            _ => Self::Sqlite(err),
        }
    }
}
