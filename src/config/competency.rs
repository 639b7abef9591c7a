//! Competency tracker configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// External competency tracking store
#[derive(Debug, Clone, Deserialize)]
pub struct CompetencyConfig {
    /// Submission URL; submissions are kept in memory when unset
    pub endpoint: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl CompetencyConfig {
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.endpoint() {
            Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                Err(ValidationError::InvalidCompetencyEndpoint)
            }
            _ => Ok(()),
        }
    }
}

impl Default for CompetencyConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}
