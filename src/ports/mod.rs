//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the interview engine and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Text-generation collaborator
//! - `SessionStore` - Key/value persistence of sessions
//! - `CompetencyTracker` - External store receiving final competency scores

mod ai_provider;
mod competency_tracker;
mod session_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, RequestPurpose, TokenUsage,
};
pub use competency_tracker::{CompetencySubmission, CompetencyTracker};
pub use session_store::{SessionStore, SessionStoreError};
