//! Boundary errors
//!
//! Raised while mapping wire records onto canonical types.

use thiserror::Error;

/// A wire record could not become a canonical value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// No alias of a required field carried a value
    #[error("{entity} record is missing {field}")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// Form input failed validation before submission
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl RecordError {
    pub fn missing(entity: &'static str, field: &'static str) -> Self {
        Self::MissingField { entity, field }
    }
}

impl From<validator::ValidationErrors> for RecordError {
    fn from(e: validator::ValidationErrors) -> Self {
        RecordError::Validation(e.to_string())
    }
}

/// Result type for boundary mapping
pub type RecordResult<T> = Result<T, RecordError>;
