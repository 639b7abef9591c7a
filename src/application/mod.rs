//! Application layer - turn orchestration and the Caller API.
//!
//! Coordinates the pure interview domain with the ports: every collaborator
//! call goes through [`Collaborator`], every turn through [`InterviewEngine`],
//! and every caller request through [`InterviewService`].

mod behavior_analyzer;
mod collaborator;
mod engine;
mod error;
pub mod evaluators;
pub mod prompts;
mod registry;
mod report;
mod service;

pub use behavior_analyzer::{AnalysisSource, BehaviorAnalyzer};
pub use collaborator::{Collaborator, CollaboratorConfig};
pub use engine::{EngineConfig, InterviewEngine, TurnReply};
pub use error::{EvaluationError, InterviewError};
pub use evaluators::{ExtractionInput, ExtractionParams, ModuleEvaluator};
pub use registry::{SessionEntry, SessionHandle, SessionRegistry};
pub use report::{InterviewReport, ReportBuilder};
pub use service::InterviewService;
