//! Competency evaluator.

use async_trait::async_trait;

use crate::domain::interview::{Competency, CompetencyEvidence, ModuleKind, ModuleUpdate};

use super::{object, request_object, score_map, ExtractionInput, ExtractionParams, ModuleEvaluator};
use crate::application::collaborator::Collaborator;
use crate::application::error::EvaluationError;

/// Maps cues in an answer onto the competency taxonomy.
pub struct CompetencyEvaluator {
    collaborator: Collaborator,
    params: ExtractionParams,
}

impl CompetencyEvaluator {
    pub fn new(collaborator: Collaborator, params: ExtractionParams) -> Self {
        Self {
            collaborator,
            params,
        }
    }
}

#[async_trait]
impl ModuleEvaluator for CompetencyEvaluator {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Competency
    }

    async fn extract(&self, input: &ExtractionInput) -> Result<ModuleUpdate, EvaluationError> {
        let raw = request_object(&self.collaborator, self.params, self.kind(), input).await?;
        let scores = score_map(object(&raw, "competencies")?, Competency::parse);

        Ok(ModuleUpdate::Competency(CompetencyEvidence { scores }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{collaborator_answering, input};
    use super::*;
    use crate::domain::foundation::Score;

    async fn run(content: &str) -> Result<ModuleUpdate, EvaluationError> {
        let evaluator = CompetencyEvaluator::new(
            collaborator_answering(ModuleKind::Competency, content),
            ExtractionParams::default(),
        );
        evaluator.extract(&input("We shipped before the deadline as a team.")).await
    }

    #[tokio::test]
    async fn clamps_scores_and_skips_unknown_ids() {
        let update = run(
            r#"{"competencies": {"teamwork": 7, "Time Management": 4, "charisma": 5, "leadership": "n/a"}}"#,
        )
        .await
        .unwrap();

        let ModuleUpdate::Competency(evidence) = update else {
            panic!("wrong update kind");
        };
        assert_eq!(evidence.scores.len(), 2);
        assert_eq!(evidence.scores[&Competency::Teamwork], Score::MAX);
        assert_eq!(evidence.scores[&Competency::TimeManagement].value(), 4);
    }

    #[tokio::test]
    async fn missing_competencies_is_malformed() {
        let err = run(r#"{"teamwork": 4}"#).await.unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn empty_map_is_valid_no_evidence() {
        let ModuleUpdate::Competency(evidence) = run(r#"{"competencies": {}}"#).await.unwrap()
        else {
            panic!("wrong update kind");
        };
        assert!(evidence.scores.is_empty());
    }
}
