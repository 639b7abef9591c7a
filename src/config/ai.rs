//! Text-generation collaborator configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Collaborator (OpenAI-compatible API) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key, never logged
    pub api_key: Option<Secret<String>>,

    /// Base URL of the chat completions API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Default model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries after the first attempt for retryable failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Backoff base; attempt n waits base × 2^n
    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_ms: u64,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    /// Longest a single collaborator call can take: every attempt timing out
    /// plus the backoff between them.
    pub fn worst_case_call(&self) -> Duration {
        let attempts = self.max_retries.saturating_add(1);
        let backoff: Duration = (0..self.max_retries)
            .map(|n| {
                self.retry_base_delay()
                    .saturating_mul(2u32.saturating_pow(n))
            })
            .sum();
        self.timeout().saturating_mul(attempts) + backoff
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Validate collaborator configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("AI__API_KEY"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidCollaboratorTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            retry_base_delay_ms: default_retry_base_delay(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    2
}

fn default_retry_base_delay() -> u64 {
    250
}
