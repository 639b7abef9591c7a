//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the interview domain.

mod errors;
mod ids;
mod percentage;
mod score;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{SessionId, UserId};
pub use percentage::Percentage;
pub use score::Score;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
