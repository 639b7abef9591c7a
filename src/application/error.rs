//! Application-level errors.
//!
//! `InterviewError` is the only error a caller of the interview service ever
//! sees. `EvaluationError` stays inside a turn: evaluators and the behavior
//! analyzer absorb it.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, ValidationError};
use crate::domain::interview::ExtractionError;
use crate::ports::{AIError, SessionStoreError};

/// Caller-facing interview errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterviewError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Session {0} is already completed")]
    SessionCompleted(SessionId),

    #[error("Utterance cannot be empty")]
    EmptyUtterance,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] SessionStoreError),
}

impl InterviewError {
    /// Maps a domain error raised while mutating `session_id`.
    pub fn from_domain(session_id: SessionId, err: DomainError) -> Self {
        match err.code {
            ErrorCode::SessionCompleted => Self::SessionCompleted(session_id),
            ErrorCode::SessionNotFound => Self::SessionNotFound(session_id),
            ErrorCode::EmptyUtterance => Self::EmptyUtterance,
            _ => Self::Validation(ValidationError::invalid_format("session", err.message)),
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::SessionNotFound(_) => ErrorCode::SessionNotFound,
            Self::SessionCompleted(_) => ErrorCode::SessionCompleted,
            Self::EmptyUtterance => ErrorCode::EmptyUtterance,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::Storage(_) => ErrorCode::StorageError,
        }
    }
}

/// Failure of one extraction or analysis call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// The collaborator failed, after retries.
    #[error("collaborator unavailable: {0}")]
    Collaborator(#[from] AIError),

    /// The collaborator answered but not in the requested shape.
    #[error("malformed extraction: {0}")]
    Malformed(#[from] ExtractionError),
}

impl EvaluationError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}
