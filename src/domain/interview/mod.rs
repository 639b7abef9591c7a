//! Interview domain.
//!
//! Pure state and rules for one interview session: settings, modules,
//! phases, scheduling, accumulated profiles and behavior signals. Nothing
//! here performs I/O.

mod behavior;
mod errors;
mod extractor;
pub mod fallback;
mod module;
mod phase;
mod profiles;
mod question_cache;
mod scheduler;
mod session;
mod settings;
mod turn;

pub use behavior::{
    BehaviorAnalysis, BehaviorEntry, BehaviorRollup, MotivationLevel, Sentiment,
    CONCERN_DISMISSIVE, CONCERN_HOSTILE, CONCERN_SHORT_REPLY,
};
pub use errors::ExtractionError;
pub use extractor::ResponseExtractor;
pub use module::{AssessmentModule, ModuleKind, ModuleStatus};
pub use phase::InterviewPhase;
pub use profiles::{
    merge_scores, CandidateFacts, CandidateProfile, Competency, CompetencyEvidence,
    CompetencyScores, Criterion, PeerDimension, PeerEvidence, PeerObservation, PersonalityAxis,
    PersonalityProfile, PersonalityType, ProfessionalEvidence, ProfessionalProfile,
    RunningAverage, TraitEvidence, GENERAL_SKILL,
};
pub use question_cache::{QuestionCache, QuestionKey};
pub use scheduler::{FocusHistory, ModuleScheduler};
pub use session::{ChatMessage, ChatRole, InterviewSession, ModuleUpdate, SessionStatus};
pub use settings::{Difficulty, InterviewSettings, InterviewStyle};
pub use turn::{TurnKind, RAPPORT_TURNS};
