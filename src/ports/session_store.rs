//! Session Store Port - Interface for persisting interview sessions.
//!
//! Plain key/value semantics: the engine only ever saves a whole session
//! and loads one back by id.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::interview::InterviewSession;

/// Errors that can occur during session storage operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Failed to serialize session: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize session: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisting and loading sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Saves the full session state, replacing any earlier version.
    async fn save(&self, session: &InterviewSession) -> Result<(), SessionStoreError>;

    /// Loads a session by id.
    ///
    /// Returns `Ok(None)` when nothing has been stored under the id.
    async fn load(&self, id: SessionId) -> Result<Option<InterviewSession>, SessionStoreError>;
}
