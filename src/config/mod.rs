//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `INTERVIEW` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use interview_orchestrator::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod competency;
mod error;
mod interview;
mod server;
mod storage;

pub use ai::AiConfig;
pub use competency::CompetencyConfig;
pub use error::{ConfigError, ValidationError};
pub use interview::InterviewConfig;
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;

use serde::Deserialize;
use std::time::Duration;

/// Root application configuration
///
/// Every section has defaults except the collaborator API key, which
/// [`AppConfig::validate()`] requires.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Text-generation collaborator
    #[serde(default)]
    pub ai: AiConfig,

    /// Engine tuning
    #[serde(default)]
    pub interview: InterviewConfig,

    /// Session persistence
    #[serde(default)]
    pub storage: StorageConfig,

    /// Competency tracker
    #[serde(default)]
    pub competency: CompetencyConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `INTERVIEW` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `INTERVIEW__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `INTERVIEW__AI__API_KEY=...` -> `ai.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("INTERVIEW")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.interview.validate()?;
        self.competency.validate()?;
        self.validate_turn_budget()
    }

    /// Longest a single turn can take: the concurrent extraction fan-out,
    /// then the reply, each bounded by one collaborator call.
    pub fn worst_case_turn(&self) -> Duration {
        self.ai.worst_case_call().saturating_mul(2)
    }

    fn validate_turn_budget(&self) -> Result<(), ValidationError> {
        let turn = self.worst_case_turn();
        if self.server.request_timeout() < turn {
            return Err(ValidationError::RequestTimeoutBelowTurnBudget {
                request_secs: self.server.request_timeout_secs,
                turn_secs: turn.as_secs_f64().ceil() as u64,
            });
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("INTERVIEW__AI__API_KEY", "sk-test-xxx");
    }

    fn clear_env() {
        for key in [
            "INTERVIEW__AI__API_KEY",
            "INTERVIEW__SERVER__PORT",
            "INTERVIEW__SERVER__ENVIRONMENT",
            "INTERVIEW__INTERVIEW__REPETITION_LIMIT",
            "INTERVIEW__STORAGE__DATA_DIR",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert!(config.ai.has_api_key());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_without_key_fail_validation() {
        let config = AppConfig::default();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("AI__API_KEY"))
        );
    }

    #[test]
    fn test_request_timeout_must_cover_a_whole_turn() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let mut config = AppConfig::load().unwrap();
        clear_env();

        assert!(config.validate().is_ok());
        assert_eq!(config.worst_case_turn(), Duration::from_millis(181_500));

        config.server.request_timeout_secs = 60;
        assert_eq!(
            config.validate(),
            Err(ValidationError::RequestTimeoutBelowTurnBudget {
                request_secs: 60,
                turn_secs: 182,
            })
        );

        config.ai.timeout_secs = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert!(config.storage.data_dir().is_none());
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("INTERVIEW__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("INTERVIEW__SERVER__PORT", "3000");
        env::set_var("INTERVIEW__INTERVIEW__REPETITION_LIMIT", "2");
        env::set_var("INTERVIEW__STORAGE__DATA_DIR", "/tmp/interviews");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.interview.repetition_limit, 2);
        assert!(config.storage.data_dir().is_some());
    }
}
