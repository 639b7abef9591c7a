//! Collaborator - timeout and bounded retry around the AI provider.
//!
//! Every call to the text-generation collaborator in the engine goes through
//! here. Each attempt gets its own timeout; retryable failures back off
//! exponentially (`base × 2^attempt`) up to `max_retries` extra attempts.
//!
//! Two success conditions exist:
//! - [`Collaborator::converse`]: any non-empty text after cleanup
//! - [`Collaborator::extract_object`]: a JSON object the extractor can find

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::time::{sleep, timeout};

use crate::domain::interview::ResponseExtractor;
use crate::ports::{AIError, AIProvider, CompletionRequest, ProviderInfo};

use super::error::EvaluationError;

/// Timeout and retry policy.
#[derive(Debug, Clone)]
pub struct CollaboratorConfig {
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Extra attempts after the first one.
    pub max_retries: u32,
    pub retry_base_delay: Duration,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 2,
            retry_base_delay: Duration::from_millis(250),
        }
    }
}

impl CollaboratorConfig {
    /// Delay before retry number `attempt` (0-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Resilient wrapper around an [`AIProvider`].
#[derive(Clone)]
pub struct Collaborator {
    provider: Arc<dyn AIProvider>,
    config: CollaboratorConfig,
    extractor: ResponseExtractor,
}

impl Collaborator {
    pub fn new(provider: Arc<dyn AIProvider>, config: CollaboratorConfig) -> Self {
        Self {
            provider,
            config,
            extractor: ResponseExtractor::new(),
        }
    }

    pub fn config(&self) -> &CollaboratorConfig {
        &self.config
    }

    pub fn provider_info(&self) -> ProviderInfo {
        self.provider.provider_info()
    }

    /// Raw completion text, with timeout and retries applied.
    pub async fn complete(&self, request: CompletionRequest) -> Result<String, AIError> {
        let purpose = request.metadata.purpose;
        let session_id = request.metadata.session_id;
        let timeout_ms = self.config.timeout.as_millis() as u64;
        let mut attempt = 0;

        loop {
            let result = match timeout(self.config.timeout, self.provider.complete(request.clone()))
                .await
            {
                Ok(result) => result.map(|response| response.content),
                Err(_) => Err(AIError::timeout(timeout_ms)),
            };

            match result {
                Ok(content) => return Ok(content),
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.config.backoff(attempt);
                    tracing::warn!(
                        session_id = %session_id,
                        purpose = %purpose,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Collaborator call failed, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Conversational reply. Succeeds on any non-empty text.
    pub async fn converse(&self, request: CompletionRequest) -> Result<String, AIError> {
        let content = self.complete(request).await?;
        self.extractor
            .conversational_text(&content)
            .ok_or(AIError::EmptyResponse)
    }

    /// Structured extraction. Succeeds only on a JSON object.
    pub async fn extract_object(
        &self,
        request: CompletionRequest,
    ) -> Result<Map<String, Value>, EvaluationError> {
        let content = self.complete(request).await?;
        Ok(self.extractor.extract_object(&content)?)
    }
}
