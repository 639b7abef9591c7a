//! InterviewSession aggregate.
//!
//! The session is the only persisted state. It owns the message log, the
//! five module records and every accumulated module output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{
    DomainError, ErrorCode, SessionId, StateMachine, Timestamp, UserId,
};

use super::behavior::BehaviorEntry;
use super::module::{AssessmentModule, ModuleKind};
use super::phase::InterviewPhase;
use super::profiles::{
    merge_scores, CandidateFacts, CandidateProfile, CompetencyEvidence, CompetencyScores,
    PeerEvidence, PeerObservation, PersonalityProfile, ProfessionalEvidence, ProfessionalProfile,
    TraitEvidence,
};
use super::scheduler::FocusHistory;
use super::settings::InterviewSettings;

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Setup,
    InProgress,
    Completed,
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!(
            (self, target),
            (Setup, InProgress) | (Setup, Completed) | (InProgress, Completed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        match self {
            Setup => vec![InProgress, Completed],
            InProgress => vec![Completed],
            Completed => vec![],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry in the append-only message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }
}

/// A partial update produced by one module evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleUpdate {
    Professional(ProfessionalEvidence),
    Personality(TraitEvidence),
    Competency(CompetencyEvidence),
    PeerObservation(PeerEvidence),
    Profile(CandidateFacts),
}

impl ModuleUpdate {
    pub fn kind(&self) -> ModuleKind {
        match self {
            Self::Professional(_) => ModuleKind::Professional,
            Self::Personality(_) => ModuleKind::Personality,
            Self::Competency(_) => ModuleKind::Competency,
            Self::PeerObservation(_) => ModuleKind::PeerObservation,
            Self::Profile(_) => ModuleKind::Profile,
        }
    }
}

/// The aggregate root of one interview run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: SessionId,
    pub user_id: UserId,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    pub status: SessionStatus,
    pub phase: InterviewPhase,
    pub settings: InterviewSettings,
    pub modules: Vec<AssessmentModule>,
    pub messages: Vec<ChatMessage>,
    pub user_message_count: u32,
    pub focus_history: FocusHistory,

    pub professional_profile: Option<ProfessionalProfile>,
    pub personality_profile: Option<PersonalityProfile>,
    #[serde(default)]
    pub competency_scores: CompetencyScores,
    pub peer_observation: Option<PeerObservation>,
    pub candidate_profile: Option<CandidateProfile>,

    #[serde(default)]
    pub behavior_log: Vec<BehaviorEntry>,
    #[serde(default)]
    pub risk_flags: Vec<String>,
    #[serde(default)]
    pub extraction_anomalies: BTreeMap<ModuleKind, u32>,
}

impl InterviewSession {
    /// Creates a session in `Setup` with the fixed set of five modules.
    pub fn new(user_id: UserId, settings: InterviewSettings, history_capacity: usize) -> Self {
        let modules = AssessmentModule::full_set(&settings);
        Self {
            id: SessionId::new(),
            user_id,
            started_at: Timestamp::now(),
            ended_at: None,
            status: SessionStatus::Setup,
            phase: InterviewPhase::Intro,
            settings,
            modules,
            messages: Vec::new(),
            user_message_count: 0,
            focus_history: FocusHistory::with_capacity(history_capacity),
            professional_profile: None,
            personality_profile: None,
            competency_scores: CompetencyScores::new(),
            peer_observation: None,
            candidate_profile: None,
            behavior_log: Vec::new(),
            risk_flags: Vec::new(),
            extraction_anomalies: BTreeMap::new(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// Fails when the session no longer accepts mutation.
    pub fn ensure_active(&self) -> Result<(), DomainError> {
        if self.is_completed() {
            return Err(DomainError::new(
                ErrorCode::SessionCompleted,
                format!("Session {} is already completed", self.id),
            ));
        }
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────
    // Messages
    // ───────────────────────────────────────────────────────────────

    /// Appends a user utterance and moves the session out of `Setup`.
    pub fn record_user_message(&mut self, text: impl Into<String>) -> Result<u32, DomainError> {
        self.ensure_active()?;

        if self.status == SessionStatus::Setup {
            self.transition(SessionStatus::InProgress)?;
        }

        self.messages.push(ChatMessage::user(text));
        self.user_message_count += 1;
        Ok(self.user_message_count)
    }

    pub fn record_assistant_message(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(text));
    }

    /// The opening assistant message, if one was sent before any user turn.
    pub fn welcome_message(&self) -> Option<&ChatMessage> {
        self.messages
            .first()
            .filter(|m| m.role == ChatRole::Assistant)
    }

    /// The last `n` messages, oldest first.
    pub fn recent_messages(&self, n: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    // ───────────────────────────────────────────────────────────────
    // Modules and phase
    // ───────────────────────────────────────────────────────────────

    pub fn module(&self, kind: ModuleKind) -> Option<&AssessmentModule> {
        self.modules.iter().find(|m| m.kind == kind)
    }

    pub fn completed_module_count(&self) -> usize {
        self.modules.iter().filter(|m| m.is_completed()).count()
    }

    /// Records one explicit question for the focus module.
    pub fn record_focus(&mut self, kind: ModuleKind) {
        if let Some(module) = self.modules.iter_mut().find(|m| m.kind == kind) {
            module.record_question();
        }
        self.focus_history.push(kind);
    }

    /// Phase derived purely from history.
    pub fn derived_phase(&self) -> InterviewPhase {
        InterviewPhase::derive(
            self.user_message_count,
            self.completed_module_count(),
            self.modules.len(),
        )
    }

    /// Moves the stored phase forward to the derived phase.
    pub fn refresh_phase(&mut self) -> InterviewPhase {
        self.phase = self.phase.advance_to(self.derived_phase());
        self.phase
    }

    // ───────────────────────────────────────────────────────────────
    // Module outputs
    // ───────────────────────────────────────────────────────────────

    /// Merges one evaluator result into the accumulated outputs.
    pub fn apply_update(&mut self, update: &ModuleUpdate) {
        match update {
            ModuleUpdate::Professional(evidence) => self
                .professional_profile
                .get_or_insert_with(Default::default)
                .merge(evidence),
            ModuleUpdate::Personality(evidence) => self
                .personality_profile
                .get_or_insert_with(Default::default)
                .merge(evidence),
            ModuleUpdate::Competency(evidence) => {
                merge_scores(&mut self.competency_scores, &evidence.scores)
            }
            ModuleUpdate::PeerObservation(evidence) => self
                .peer_observation
                .get_or_insert_with(Default::default)
                .merge(evidence),
            ModuleUpdate::Profile(facts) => self
                .candidate_profile
                .get_or_insert_with(Default::default)
                .merge(facts),
        }
    }

    /// Records a failed extraction and returns the anomaly count for the kind.
    ///
    /// Accumulated state is never reset. The first failure for a kind with no
    /// output yet seeds an empty placeholder record.
    pub fn record_extraction_failure(&mut self, kind: ModuleKind) -> u32 {
        let count = self.extraction_anomalies.entry(kind).or_insert(0);
        *count += 1;
        let count = *count;

        match kind {
            ModuleKind::Professional => {
                self.professional_profile
                    .get_or_insert_with(|| ProfessionalProfile {
                        placeholder: true,
                        ..Default::default()
                    });
            }
            ModuleKind::Personality => {
                self.personality_profile
                    .get_or_insert_with(|| PersonalityProfile {
                        placeholder: true,
                        ..Default::default()
                    });
            }
            ModuleKind::PeerObservation => {
                self.peer_observation.get_or_insert_with(|| PeerObservation {
                    placeholder: true,
                    ..Default::default()
                });
            }
            ModuleKind::Profile => {
                self.candidate_profile
                    .get_or_insert_with(|| CandidateProfile {
                        placeholder: true,
                        ..Default::default()
                    });
            }
            ModuleKind::Competency => {}
        }

        count
    }

    /// Appends a behavior entry and folds its concerns into the risk flags.
    pub fn record_behavior(&mut self, entry: BehaviorEntry) {
        for concern in &entry.analysis.concerns {
            let concern = concern.trim();
            if concern.is_empty() {
                continue;
            }
            if !self
                .risk_flags
                .iter()
                .any(|flag| flag.eq_ignore_ascii_case(concern))
            {
                self.risk_flags.push(concern.to_string());
            }
        }
        self.behavior_log.push(entry);
    }

    // ───────────────────────────────────────────────────────────────
    // Lifecycle
    // ───────────────────────────────────────────────────────────────

    /// Marks the session completed. Completing twice is a no-op.
    pub fn complete(&mut self) -> Result<(), DomainError> {
        if self.is_completed() {
            return Ok(());
        }
        self.transition(SessionStatus::Completed)?;
        self.ended_at = Some(Timestamp::now());
        Ok(())
    }

    fn transition(&mut self, target: SessionStatus) -> Result<(), DomainError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.to_string()))?;
        Ok(())
    }
}
