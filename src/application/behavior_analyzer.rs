//! Behavior analyzer.
//!
//! Runs on every utterance next to the module evaluators. When the
//! collaborator fails or answers in the wrong shape, the local keyword
//! heuristic stands in, so every utterance gets an analysis.

use serde_json::Value;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::interview::{
    BehaviorAnalysis, BehaviorEntry, BehaviorRollup, ExtractionError, InterviewSession,
};
use crate::ports::{CompletionRequest, MessageRole, RequestMetadata, RequestPurpose};

use super::collaborator::Collaborator;
use super::error::EvaluationError;
use super::evaluators::ExtractionParams;
use super::prompts;

/// Where an analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    Collaborator,
    Heuristic,
}

pub struct BehaviorAnalyzer {
    collaborator: Collaborator,
    params: ExtractionParams,
}

impl BehaviorAnalyzer {
    pub fn new(collaborator: Collaborator, params: ExtractionParams) -> Self {
        Self {
            collaborator,
            params,
        }
    }

    /// Analyzes one utterance. Never fails.
    pub async fn analyze(&self, session_id: SessionId, utterance: &str) -> (BehaviorEntry, AnalysisSource) {
        let (analysis, source) = match self.request_analysis(session_id, utterance).await {
            Ok(analysis) => (analysis, AnalysisSource::Collaborator),
            Err(err) => {
                tracing::warn!(
                    session_id = %session_id,
                    error = %err,
                    "Behavior analysis failed, using heuristic"
                );
                (BehaviorAnalysis::heuristic(utterance), AnalysisSource::Heuristic)
            }
        };

        let entry = BehaviorEntry {
            message: utterance.to_string(),
            analysis,
            timestamp: Timestamp::now(),
        };
        (entry, source)
    }

    async fn request_analysis(
        &self,
        session_id: SessionId,
        utterance: &str,
    ) -> Result<BehaviorAnalysis, EvaluationError> {
        let request = CompletionRequest::new(RequestMetadata::new(session_id, RequestPurpose::Behavior))
            .with_system_prompt(prompts::BEHAVIOR_ANALYSIS)
            .with_message(MessageRole::User, utterance)
            .with_temperature(self.params.temperature)
            .with_max_tokens(self.params.max_tokens);

        let raw = self.collaborator.extract_object(request).await?;
        let analysis = serde_json::from_value(Value::Object(raw))
            .map_err(|e| ExtractionError::schema(e.to_string()))?;
        Ok(analysis)
    }

    /// Whole-conversation rollup. Falls back to local aggregation.
    ///
    /// The session's risk flags are always part of the red flags.
    pub async fn rollup(&self, session: &InterviewSession) -> BehaviorRollup {
        if session.behavior_log.is_empty() {
            return BehaviorRollup::aggregate(&session.behavior_log, &session.risk_flags);
        }

        match self.request_rollup(session).await {
            Ok(mut rollup) => {
                for flag in &session.risk_flags {
                    if !rollup
                        .red_flags
                        .iter()
                        .any(|existing| existing.eq_ignore_ascii_case(flag))
                    {
                        rollup.red_flags.push(flag.clone());
                    }
                }
                rollup
            }
            Err(err) => {
                tracing::warn!(
                    session_id = %session.id,
                    error = %err,
                    "Behavior rollup failed, aggregating locally"
                );
                BehaviorRollup::aggregate(&session.behavior_log, &session.risk_flags)
            }
        }
    }

    async fn request_rollup(&self, session: &InterviewSession) -> Result<BehaviorRollup, EvaluationError> {
        let digest: Vec<String> = session
            .behavior_log
            .iter()
            .map(|entry| {
                format!(
                    "- sentiment={:?}, motivation={:?}, markers=[{}], concerns=[{}]: \"{}\"",
                    entry.analysis.sentiment,
                    entry.analysis.motivation_level,
                    entry.analysis.behavioral_markers.join(", "),
                    entry.analysis.concerns.join(", "),
                    entry.message
                )
            })
            .collect();

        let request =
            CompletionRequest::new(RequestMetadata::new(session.id, RequestPurpose::BehaviorRollup))
                .with_system_prompt(prompts::BEHAVIOR_ROLLUP)
                .with_message(MessageRole::User, digest.join("\n"))
                .with_temperature(self.params.temperature)
                .with_max_tokens(self.params.max_tokens);

        let raw = self.collaborator.extract_object(request).await?;
        let rollup = serde_json::from_value(Value::Object(raw))
            .map_err(|e| ExtractionError::schema(e.to_string()))?;
        Ok(rollup)
    }
}
