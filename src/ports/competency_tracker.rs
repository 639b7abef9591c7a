//! Competency Tracker Port - External store receiving final competency scores.
//!
//! Submission is fire-and-forget from the engine's point of view: callers log
//! failures and move on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, SessionId, Timestamp, UserId};
use crate::domain::interview::{CompetencyScores, InterviewSession};

/// Bulk submission of a completed session's competency scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetencySubmission {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub scores: CompetencyScores,
    pub submitted_at: Timestamp,
}

impl CompetencySubmission {
    pub fn from_session(session: &InterviewSession) -> Self {
        Self {
            session_id: session.id,
            user_id: session.user_id.clone(),
            scores: session.competency_scores.clone(),
            submitted_at: Timestamp::now(),
        }
    }
}

/// Port for submitting competency scores to an external tracker.
#[async_trait]
pub trait CompetencyTracker: Send + Sync {
    async fn submit(&self, submission: CompetencySubmission) -> Result<(), DomainError>;
}
