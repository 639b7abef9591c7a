//! Module evaluators.
//!
//! One evaluator per [`ModuleKind`]. Every user utterance goes to all five;
//! each asks the collaborator for its own JSON contract and turns the answer
//! into a [`ModuleUpdate`]. Evaluators never touch the session: applying the
//! update, or recording the failure, is the engine's job.

mod competency;
mod peer_observation;
mod personality;
mod professional;
mod profile_builder;

pub use competency::CompetencyEvaluator;
pub use peer_observation::PeerObservationEvaluator;
pub use personality::PersonalityEvaluator;
pub use professional::ProfessionalEvaluator;
pub use profile_builder::ProfileBuilderEvaluator;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::foundation::{Score, SessionId};
use crate::domain::interview::{
    ChatRole, ExtractionError, InterviewPhase, InterviewSession, ModuleKind, ModuleUpdate,
};
use crate::ports::{CompletionRequest, MessageRole, RequestMetadata, RequestPurpose};

use super::collaborator::Collaborator;
use super::error::EvaluationError;
use super::prompts;

/// What an evaluator sees of the current turn.
#[derive(Debug, Clone)]
pub struct ExtractionInput {
    pub session_id: SessionId,
    pub utterance: String,
    /// The assistant message the utterance answers, if any.
    pub last_question: Option<String>,
    pub phase: InterviewPhase,
}

impl ExtractionInput {
    /// Builds the input from a session whose log already ends with `utterance`.
    pub fn from_session(session: &InterviewSession, utterance: impl Into<String>) -> Self {
        let last_question = session
            .messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::Assistant)
            .map(|m| m.content.clone());

        Self {
            session_id: session.id,
            utterance: utterance.into(),
            last_question,
            phase: session.phase,
        }
    }
}

/// Generation parameters for extraction calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ExtractionParams {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 600,
        }
    }
}

/// Derives a partial update for one module from one utterance.
#[async_trait]
pub trait ModuleEvaluator: Send + Sync {
    fn kind(&self) -> ModuleKind;

    async fn extract(&self, input: &ExtractionInput) -> Result<ModuleUpdate, EvaluationError>;
}

/// The five evaluators, in module-kind order.
pub fn standard_evaluators(
    collaborator: Collaborator,
    params: ExtractionParams,
) -> Vec<Arc<dyn ModuleEvaluator>> {
    vec![
        Arc::new(ProfessionalEvaluator::new(collaborator.clone(), params)),
        Arc::new(PersonalityEvaluator::new(collaborator.clone(), params)),
        Arc::new(CompetencyEvaluator::new(collaborator.clone(), params)),
        Arc::new(PeerObservationEvaluator::new(collaborator.clone(), params)),
        Arc::new(ProfileBuilderEvaluator::new(collaborator, params)),
    ]
}

/// Sends the extraction prompt for `kind` and returns the JSON object.
async fn request_object(
    collaborator: &Collaborator,
    params: ExtractionParams,
    kind: ModuleKind,
    input: &ExtractionInput,
) -> Result<Map<String, Value>, EvaluationError> {
    let request = CompletionRequest::new(RequestMetadata::new(
        input.session_id,
        RequestPurpose::Extraction(kind),
    ))
    .with_system_prompt(prompts::extraction_prompt(kind))
    .with_message(
        MessageRole::User,
        prompts::extraction_input(&input.utterance, input.last_question.as_deref(), input.phase),
    )
    .with_temperature(params.temperature)
    .with_max_tokens(params.max_tokens);

    collaborator.extract_object(request).await
}

// ----- Lenient field readers -----

/// A number, or a string holding one.
fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Non-blank strings from an array. Anything else yields an empty list.
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// A non-blank string field.
fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A required JSON object field.
fn object<'a>(
    map: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a Map<String, Value>, ExtractionError> {
    match map.get(field) {
        Some(Value::Object(inner)) => Ok(inner),
        Some(_) => Err(ExtractionError::schema(format!("'{}' must be an object", field))),
        None => Err(ExtractionError::missing(field)),
    }
}

/// Reads `{id: 1-5}` pairs, skipping unknown ids and non-numeric values.
fn score_map<K: Ord>(
    raw: &Map<String, Value>,
    parse: impl Fn(&str) -> Option<K>,
) -> BTreeMap<K, Score> {
    raw.iter()
        .filter_map(|(id, value)| Some((parse(id)?, Score::from_f64(number(value)?))))
        .collect()
}

#[cfg(test)]
mod test_support {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockResponse};
    use crate::application::collaborator::CollaboratorConfig;
    use std::time::Duration;

    pub fn collaborator_answering(kind: ModuleKind, content: &str) -> Collaborator {
        let provider = MockAIProvider::new().with_fixed_route(
            RequestPurpose::Extraction(kind),
            MockResponse::text(content),
        );
        collaborator(provider)
    }

    pub fn collaborator(provider: MockAIProvider) -> Collaborator {
        Collaborator::new(
            Arc::new(provider),
            CollaboratorConfig {
                timeout: Duration::from_millis(200),
                max_retries: 0,
                retry_base_delay: Duration::from_millis(1),
            },
        )
    }

    pub fn input(utterance: &str) -> ExtractionInput {
        ExtractionInput {
            session_id: SessionId::new(),
            utterance: utterance.to_string(),
            last_question: Some("Tell me about your work.".to_string()),
            phase: InterviewPhase::Questioning,
        }
    }
}
