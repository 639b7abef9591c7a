//! Assessment modules: the five tracks that run inside one session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Percentage, StateMachine};

use super::settings::InterviewSettings;

/// The five assessment tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Professional,
    Personality,
    Competency,
    PeerObservation,
    Profile,
}

impl ModuleKind {
    /// Every kind, in declaration order.
    pub const ALL: [ModuleKind; 5] = [
        ModuleKind::Professional,
        ModuleKind::Personality,
        ModuleKind::Competency,
        ModuleKind::PeerObservation,
        ModuleKind::Profile,
    ];

    /// Scheduling priority (1 = highest).
    pub fn priority(&self) -> u8 {
        match self {
            Self::Profile => 1,
            Self::Professional => 2,
            Self::Competency => 3,
            Self::Personality => 4,
            Self::PeerObservation => 5,
        }
    }

    /// Display name for the module.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Professional => "Professional Knowledge",
            Self::Personality => "Personality Typing",
            Self::Competency => "Competency Assessment",
            Self::PeerObservation => "Peer Observation",
            Self::Profile => "Candidate Profile",
        }
    }

    /// Stable snake_case identifier, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Personality => "personality",
            Self::Competency => "competency",
            Self::PeerObservation => "peer_observation",
            Self::Profile => "profile",
        }
    }

    /// What a question from this module should explore.
    pub fn question_focus(&self) -> &'static str {
        match self {
            Self::Professional => {
                "a technical or domain question that tests practical knowledge of their field"
            }
            Self::Personality => {
                "how they prefer to work, recharge, make decisions and plan their time"
            }
            Self::Competency => {
                "a concrete past situation involving teamwork, deadlines, ownership or learning"
            }
            Self::PeerObservation => {
                "how colleagues would describe them and how they behave inside a team"
            }
            Self::Profile => "their background: current role, experience, key skills and goals",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Module lifecycle. Moves forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl StateMachine for ModuleStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ModuleStatus::*;
        matches!(
            (self, target),
            (Pending, InProgress) | (Pending, Completed) | (InProgress, Completed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ModuleStatus::*;
        match self {
            Pending => vec![InProgress, Completed],
            InProgress => vec![Completed],
            Completed => vec![],
        }
    }
}

/// One assessment track inside a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentModule {
    pub kind: ModuleKind,
    pub name: String,
    pub status: ModuleStatus,
    pub progress: Percentage,
    pub questions_asked: u32,
    pub target_questions: u32,
    pub priority: u8,
}

impl AssessmentModule {
    /// Creates a pending module with its target derived from the settings.
    pub fn new(kind: ModuleKind, settings: &InterviewSettings) -> Self {
        Self {
            kind,
            name: kind.display_name().to_string(),
            status: ModuleStatus::Pending,
            progress: Percentage::ZERO,
            questions_asked: 0,
            target_questions: settings.target_questions(kind),
            priority: kind.priority(),
        }
    }

    /// Creates the fixed set of five modules, ordered by priority.
    pub fn full_set(settings: &InterviewSettings) -> Vec<Self> {
        let mut modules: Vec<Self> = ModuleKind::ALL
            .iter()
            .map(|kind| Self::new(*kind, settings))
            .collect();
        modules.sort_by_key(|m| m.priority);
        modules
    }

    pub fn is_completed(&self) -> bool {
        self.status == ModuleStatus::Completed
    }

    /// Records one explicit question for this module.
    ///
    /// Progress is recomputed and status moves forward. A completed module
    /// is left untouched, so `questions_asked` never passes the target.
    pub fn record_question(&mut self) {
        if self.is_completed() {
            return;
        }

        self.questions_asked += 1;
        self.progress = Percentage::from_ratio(self.questions_asked, self.target_questions);

        let next = if self.questions_asked >= self.target_questions {
            ModuleStatus::Completed
        } else {
            ModuleStatus::InProgress
        };

        if let Ok(status) = self.status.transition_to(next) {
            self.status = status;
        }
    }
}
