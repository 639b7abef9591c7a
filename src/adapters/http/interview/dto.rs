//! HTTP DTOs for interview endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::application::{InterviewError, InterviewReport, TurnReply};
use crate::domain::foundation::{Timestamp, ValidationError};
use crate::domain::interview::{
    AssessmentModule, BehaviorRollup, CandidateProfile, ChatMessage, ChatRole, CompetencyScores,
    Difficulty, InterviewPhase, InterviewSession, InterviewSettings, InterviewStyle, ModuleKind,
    ModuleStatus, PeerObservation, PersonalityProfile, PersonalityType, ProfessionalProfile,
    SessionStatus, TurnKind,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a new interview.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInterviewRequest {
    pub user_id: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub style: InterviewStyle,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

impl CreateInterviewRequest {
    pub fn settings(&self) -> InterviewSettings {
        let settings = InterviewSettings::new(self.difficulty, self.style)
            .with_focus_areas(self.focus_areas.iter().cloned());
        match self.duration_minutes {
            Some(minutes) => settings.with_duration(minutes),
            None => settings,
        }
    }
}

/// One candidate utterance.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitMessageRequest {
    pub text: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Reply produced by one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    pub reply: String,
    pub turn_kind: TurnKind,
    pub phase: InterviewPhase,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<ModuleKind>,
}

impl From<TurnReply> for TurnResponse {
    fn from(reply: TurnReply) -> Self {
        Self {
            reply: reply.text,
            turn_kind: reply.kind,
            phase: reply.phase,
            status: reply.status,
            focus: reply.focus,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleResponse {
    pub kind: ModuleKind,
    pub name: String,
    pub status: ModuleStatus,
    pub progress: u8,
    pub questions_asked: u32,
    pub target_questions: u32,
}

impl From<&AssessmentModule> for ModuleResponse {
    fn from(module: &AssessmentModule) -> Self {
        Self {
            kind: module.kind,
            name: module.name.clone(),
            status: module.status,
            progress: module.progress.value(),
            questions_asked: module.questions_asked,
            target_questions: module.target_questions,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: String,
}

impl From<&ChatMessage> for MessageResponse {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
            timestamp: rfc3339(&message.timestamp),
        }
    }
}

/// Read-only session snapshot with every accumulated output.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub user_id: String,
    pub status: SessionStatus,
    pub phase: InterviewPhase,
    pub settings: InterviewSettings,
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    pub user_message_count: u32,
    pub modules: Vec<ModuleResponse>,
    pub messages: Vec<MessageResponse>,
    pub professional_profile: Option<ProfessionalProfile>,
    pub personality_profile: Option<PersonalityProfile>,
    pub competency_scores: CompetencyScores,
    pub peer_observation: Option<PeerObservation>,
    pub candidate_profile: Option<CandidateProfile>,
    pub risk_flags: Vec<String>,
    pub extraction_anomalies: BTreeMap<ModuleKind, u32>,
}

impl From<&InterviewSession> for SessionResponse {
    fn from(session: &InterviewSession) -> Self {
        Self {
            id: session.id.to_string(),
            user_id: session.user_id.to_string(),
            status: session.status,
            phase: session.phase,
            settings: session.settings.clone(),
            started_at: rfc3339(&session.started_at),
            ended_at: session.ended_at.as_ref().map(rfc3339),
            user_message_count: session.user_message_count,
            modules: session.modules.iter().map(Into::into).collect(),
            messages: session.messages.iter().map(Into::into).collect(),
            professional_profile: session.professional_profile.clone(),
            personality_profile: session.personality_profile.clone(),
            competency_scores: session.competency_scores.clone(),
            peer_observation: session.peer_observation.clone(),
            candidate_profile: session.candidate_profile.clone(),
            risk_flags: session.risk_flags.clone(),
            extraction_anomalies: session.extraction_anomalies.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub session: SessionResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personality_type: Option<PersonalityType>,
    pub behavior: BehaviorRollup,
    pub summary: String,
    pub summary_generated: bool,
}

impl From<InterviewReport> for ReportResponse {
    fn from(report: InterviewReport) -> Self {
        Self {
            session: (&report.session).into(),
            personality_type: report.personality_type,
            behavior: report.behavior,
            summary: report.summary,
            summary_generated: report.summary_generated,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }
}

impl From<&InterviewError> for ErrorResponse {
    fn from(error: &InterviewError) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

impl From<&ValidationError> for ErrorResponse {
    fn from(error: &ValidationError) -> Self {
        Self::bad_request(error.to_string())
    }
}

fn rfc3339(timestamp: &Timestamp) -> String {
    timestamp.as_datetime().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{SessionId, UserId};

    #[test]
    fn create_request_defaults_settings() {
        let req: CreateInterviewRequest =
            serde_json::from_str(r#"{"user_id": "candidate-1"}"#).unwrap();

        let settings = req.settings();
        assert_eq!(settings, InterviewSettings::default());
    }

    #[test]
    fn create_request_reads_all_fields() {
        let json = r#"{
            "user_id": "candidate-1",
            "difficulty": "senior",
            "style": "quick",
            "duration_minutes": 20,
            "focus_areas": ["databases"]
        }"#;
        let req: CreateInterviewRequest = serde_json::from_str(json).unwrap();

        let settings = req.settings();
        assert_eq!(settings.difficulty, Difficulty::Senior);
        assert_eq!(settings.style, InterviewStyle::Quick);
        assert_eq!(settings.duration_minutes, 20);
        assert_eq!(settings.focus_areas, vec!["databases"]);
    }

    #[test]
    fn session_response_lists_every_module() {
        let session = InterviewSession::new(
            UserId::new("candidate-1").unwrap(),
            InterviewSettings::default(),
            6,
        );

        let response = SessionResponse::from(&session);

        assert_eq!(response.id, session.id.to_string());
        assert_eq!(response.modules.len(), 5);
        assert!(response.ended_at.is_none());
    }

    #[test]
    fn error_response_uses_stable_code() {
        let error = InterviewError::SessionNotFound(SessionId::new());
        let response = ErrorResponse::from(&error);
        assert_eq!(response.code, "SESSION_NOT_FOUND");
    }
}
