//! In-memory competency tracker.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::ports::{CompetencySubmission, CompetencyTracker};

/// Keeps every submission in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCompetencyTracker {
    submissions: Arc<RwLock<Vec<CompetencySubmission>>>,
    fail: bool,
}

impl InMemoryCompetencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker that rejects every submission.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn submissions(&self) -> Vec<CompetencySubmission> {
        self.submissions.read().await.clone()
    }

    pub async fn submissions_for(&self, session_id: SessionId) -> Vec<CompetencySubmission> {
        self.submissions
            .read()
            .await
            .iter()
            .filter(|s| s.session_id == session_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CompetencyTracker for InMemoryCompetencyTracker {
    async fn submit(&self, submission: CompetencySubmission) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                "Competency tracker unavailable",
            ));
        }
        self.submissions.write().await.push(submission);
        Ok(())
    }
}
