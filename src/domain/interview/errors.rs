//! Error types for the interview domain.

use thiserror::Error;

/// Raised when collaborator output cannot be turned into the requested shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Schema validation failed: {0}")]
    Schema(String),
}

impl ExtractionError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    pub fn schema(reason: impl Into<String>) -> Self {
        Self::Schema(reason.into())
    }
}
