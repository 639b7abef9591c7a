//! Mock AI Provider for testing.
//!
//! Stands in for the text-generation collaborator so engine tests run
//! without a real API.
//!
//! # Features
//!
//! - Scripted responses consumed in order
//! - Per-purpose routes, so concurrent extraction calls get stable answers
//! - A configurable default (e.g. always failing)
//! - Simulated delays for timeout testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_fixed_route(RequestPurpose::Reply, MockResponse::text("What do you do?"))
//!     .with_fixed_route(
//!         RequestPurpose::Extraction(ModuleKind::Competency),
//!         MockResponse::text(r#"{"competencies": {"teamwork": 4}}"#),
//!     )
//!     .with_default(MockResponse::Error(MockError::Unavailable { message: "down".into() }));
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    RequestPurpose, TokenUsage,
};

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success {
        content: String,
        usage: TokenUsage,
        finish_reason: FinishReason,
    },
    Error(MockError),
}

impl MockResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Success {
            content: content.into(),
            usage: TokenUsage::new(10, 20),
            finish_reason: FinishReason::Stop,
        }
    }

    pub fn error(error: MockError) -> Self {
        Self::Error(error)
    }
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_ms: u64 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_ms } => AIError::timeout(timeout_ms),
        }
    }
}

#[derive(Debug, Default)]
struct Script {
    queue: VecDeque<MockResponse>,
    routed: HashMap<RequestPurpose, VecDeque<MockResponse>>,
    fixed: HashMap<RequestPurpose, MockResponse>,
}

/// Mock AI provider for testing.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    script: Arc<Mutex<Script>>,
    default_response: MockResponse,
    info: ProviderInfo,
    delay: Duration,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(Script::default())),
            default_response: MockResponse::text("Mock response"),
            info: ProviderInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider whose every call fails with the given error.
    pub fn failing(error: MockError) -> Self {
        Self::new().with_default(MockResponse::Error(error))
    }

    /// Queues a successful response for any purpose.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        lock(&self.script).queue.push_back(MockResponse::text(content));
        self
    }

    /// Queues an error for any purpose.
    pub fn with_error(self, error: MockError) -> Self {
        lock(&self.script).queue.push_back(MockResponse::Error(error));
        self
    }

    /// Queues a response that only requests with `purpose` consume.
    pub fn with_routed(self, purpose: RequestPurpose, response: MockResponse) -> Self {
        lock(&self.script)
            .routed
            .entry(purpose)
            .or_default()
            .push_back(response);
        self
    }

    /// Answers every request with `purpose` the same way once its routed queue is empty.
    pub fn with_fixed_route(self, purpose: RequestPurpose, response: MockResponse) -> Self {
        lock(&self.script).fixed.insert(purpose, response);
        self
    }

    /// Response used when nothing else matches.
    pub fn with_default(mut self, response: MockResponse) -> Self {
        self.default_response = response;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.info = info;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Number of calls made with the given purpose.
    pub fn calls_for(&self, purpose: RequestPurpose) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| c.metadata.purpose == purpose)
            .count()
    }

    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        lock(&self.calls).clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    /// Resolution order: routed queue, fixed route, shared queue, default.
    fn next_response(&self, purpose: RequestPurpose) -> MockResponse {
        let mut script = lock(&self.script);

        if let Some(response) = script.routed.get_mut(&purpose).and_then(VecDeque::pop_front) {
            return response;
        }
        if let Some(response) = script.fixed.get(&purpose) {
            return response.clone();
        }
        script
            .queue
            .pop_front()
            .unwrap_or_else(|| self.default_response.clone())
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let purpose = request.metadata.purpose;
        let model = request.model.clone().unwrap_or_else(|| self.info.model.clone());
        lock(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response(purpose) {
            MockResponse::Success {
                content,
                usage,
                finish_reason,
            } => Ok(CompletionResponse {
                content,
                usage,
                model,
                finish_reason,
            }),
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}
