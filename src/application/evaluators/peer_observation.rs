//! Peer-observation evaluator.

use async_trait::async_trait;

use crate::domain::interview::{ModuleKind, ModuleUpdate, PeerDimension, PeerEvidence};

use super::{
    object, request_object, score_map, text, ExtractionInput, ExtractionParams, ModuleEvaluator,
};
use crate::application::collaborator::Collaborator;
use crate::application::error::EvaluationError;

/// Scores the peer dimensions and captures one colleague-style observation.
pub struct PeerObservationEvaluator {
    collaborator: Collaborator,
    params: ExtractionParams,
}

impl PeerObservationEvaluator {
    pub fn new(collaborator: Collaborator, params: ExtractionParams) -> Self {
        Self {
            collaborator,
            params,
        }
    }
}

#[async_trait]
impl ModuleEvaluator for PeerObservationEvaluator {
    fn kind(&self) -> ModuleKind {
        ModuleKind::PeerObservation
    }

    async fn extract(&self, input: &ExtractionInput) -> Result<ModuleUpdate, EvaluationError> {
        let raw = request_object(&self.collaborator, self.params, self.kind(), input).await?;
        let scores = score_map(object(&raw, "scores")?, PeerDimension::parse);

        Ok(ModuleUpdate::PeerObservation(PeerEvidence {
            scores,
            observation: text(raw.get("observation")),
        }))
    }
}
