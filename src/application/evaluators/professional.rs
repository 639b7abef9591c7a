//! Professional-knowledge evaluator.

use async_trait::async_trait;

use crate::domain::interview::{
    Criterion, ExtractionError, ModuleKind, ModuleUpdate, ProfessionalEvidence,
};

use super::{number, request_object, string_list, text, ExtractionInput, ExtractionParams, ModuleEvaluator};
use crate::application::collaborator::Collaborator;
use crate::application::error::EvaluationError;

/// Scores an answer 0–100 against the evaluation criteria.
pub struct ProfessionalEvaluator {
    collaborator: Collaborator,
    params: ExtractionParams,
}

impl ProfessionalEvaluator {
    pub fn new(collaborator: Collaborator, params: ExtractionParams) -> Self {
        Self {
            collaborator,
            params,
        }
    }
}

#[async_trait]
impl ModuleEvaluator for ProfessionalEvaluator {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Professional
    }

    async fn extract(&self, input: &ExtractionInput) -> Result<ModuleUpdate, EvaluationError> {
        let raw = request_object(&self.collaborator, self.params, self.kind(), input).await?;

        let score = raw
            .get("score")
            .and_then(number)
            .ok_or_else(|| ExtractionError::missing("score"))?;

        let criteria = match raw.get("criteria").and_then(|v| v.as_object()) {
            Some(values) => Criterion::ALL
                .into_iter()
                .filter_map(|c| Some((c, number(values.get(c.as_str())?)?)))
                .collect(),
            None => Default::default(),
        };

        Ok(ModuleUpdate::Professional(ProfessionalEvidence {
            score,
            skills: string_list(raw.get("skills")),
            criteria,
            feedback: text(raw.get("feedback")),
        }))
    }
}
