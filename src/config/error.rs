//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Request timeout ({request_secs}s) is shorter than the worst-case turn ({turn_secs}s)")]
    RequestTimeoutBelowTurnBudget { request_secs: u64, turn_secs: u64 },

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddr(String),

    #[error("Collaborator timeout must be greater than zero")]
    InvalidCollaboratorTimeout,

    #[error("Temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("Repetition limit must be greater than zero")]
    InvalidRepetitionLimit,

    #[error("History capacity ({capacity}) must be at least the repetition limit ({limit})")]
    HistoryTooShort { capacity: usize, limit: usize },

    #[error("Competency endpoint must be an http(s) URL")]
    InvalidCompetencyEndpoint,
}
