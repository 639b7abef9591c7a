//! HTTP competency tracker.
//!
//! Sends each submission as a JSON body to a configured endpoint.
//!
//! # Example
//!
//! ```ignore
//! let tracker = HttpCompetencyTracker::new(
//!     HttpTrackerConfig::new("https://tracker.internal/api/competencies"),
//! )?;
//! tracker.submit(CompetencySubmission::from_session(&session)).await?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{CompetencySubmission, CompetencyTracker};

/// Configuration for the HTTP tracker.
#[derive(Debug, Clone)]
pub struct HttpTrackerConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl HttpTrackerConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Competency tracker backed by an HTTP endpoint.
pub struct HttpCompetencyTracker {
    config: HttpTrackerConfig,
    client: Client,
}

impl HttpCompetencyTracker {
    pub fn new(config: HttpTrackerConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self { config, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl CompetencyTracker for HttpCompetencyTracker {
    async fn submit(&self, submission: CompetencySubmission) -> Result<(), DomainError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&submission)
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Competency submission failed: {}", e),
                )
                .with_detail("session_id", submission.session_id.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Competency tracker returned {}: {}", status, body),
            )
            .with_detail("session_id", submission.session_id.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_and_builder() {
        let config = HttpTrackerConfig::new("http://localhost:9000/scores");
        assert_eq!(config.timeout, Duration::from_secs(10));

        let config = config.with_timeout(Duration::from_secs(2));
        assert_eq!(config.timeout, Duration::from_secs(2));

        let tracker = HttpCompetencyTracker::new(config).unwrap();
        assert_eq!(tracker.endpoint(), "http://localhost:9000/scores");
    }
}
