//! Personality-typing evaluator.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::interview::{
    ExtractionError, ModuleKind, ModuleUpdate, PersonalityAxis, TraitEvidence,
};

use super::{number, request_object, ExtractionInput, ExtractionParams, ModuleEvaluator};
use crate::application::collaborator::Collaborator;
use crate::application::error::EvaluationError;

/// Reads trait pressure on the four axes from language cues.
pub struct PersonalityEvaluator {
    collaborator: Collaborator,
    params: ExtractionParams,
}

impl PersonalityEvaluator {
    pub fn new(collaborator: Collaborator, params: ExtractionParams) -> Self {
        Self {
            collaborator,
            params,
        }
    }
}

#[async_trait]
impl ModuleEvaluator for PersonalityEvaluator {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Personality
    }

    async fn extract(&self, input: &ExtractionInput) -> Result<ModuleUpdate, EvaluationError> {
        let raw = request_object(&self.collaborator, self.params, self.kind(), input).await?;

        let pressure: BTreeMap<PersonalityAxis, f64> = PersonalityAxis::ALL
            .into_iter()
            .filter_map(|axis| Some((axis, number(raw.get(axis.as_str())?)?)))
            .collect();

        if pressure.is_empty() {
            return Err(ExtractionError::schema("no personality axis in response").into());
        }

        Ok(ModuleUpdate::Personality(TraitEvidence(pressure)))
    }
}
