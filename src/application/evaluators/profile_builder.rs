//! Profile-builder evaluator.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::interview::{CandidateFacts, ExtractionError, ModuleKind, ModuleUpdate};

use super::{request_object, ExtractionInput, ExtractionParams, ModuleEvaluator};
use crate::application::collaborator::Collaborator;
use crate::application::error::EvaluationError;

/// Extracts biographical and skill facts the candidate states.
pub struct ProfileBuilderEvaluator {
    collaborator: Collaborator,
    params: ExtractionParams,
}

impl ProfileBuilderEvaluator {
    pub fn new(collaborator: Collaborator, params: ExtractionParams) -> Self {
        Self {
            collaborator,
            params,
        }
    }
}

#[async_trait]
impl ModuleEvaluator for ProfileBuilderEvaluator {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Profile
    }

    async fn extract(&self, input: &ExtractionInput) -> Result<ModuleUpdate, EvaluationError> {
        let mut raw = request_object(&self.collaborator, self.params, self.kind(), input).await?;

        // Nulls mean "not stated", same as an absent key.
        raw.retain(|_, value| !value.is_null());

        let facts: CandidateFacts = serde_json::from_value(Value::Object(raw))
            .map_err(|e| ExtractionError::schema(e.to_string()))?;

        Ok(ModuleUpdate::Profile(facts))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{collaborator_answering, input};
    use super::*;

    async fn run(content: &str) -> Result<ModuleUpdate, EvaluationError> {
        let evaluator = ProfileBuilderEvaluator::new(
            collaborator_answering(ModuleKind::Profile, content),
            ExtractionParams::default(),
        );
        evaluator.extract(&input("I'm Dana, a backend engineer for six years.")).await
    }

    #[tokio::test]
    async fn parses_facts_and_treats_null_as_absent() {
        let update = run(
            r#"{"name": "Dana", "position": "Backend Engineer", "years_of_experience": 6,
                "skills": ["Rust", "Postgres"], "goals": null, "hobby": "chess"}"#,
        )
        .await
        .unwrap();

        let ModuleUpdate::Profile(facts) = update else {
            panic!("wrong update kind");
        };
        assert_eq!(facts.name.as_deref(), Some("Dana"));
        assert_eq!(facts.years_of_experience, Some(6.0));
        assert_eq!(facts.skills, vec!["Rust", "Postgres"]);
        assert!(facts.goals.is_empty());
    }

    #[tokio::test]
    async fn empty_object_is_valid() {
        let ModuleUpdate::Profile(facts) = run("{}").await.unwrap() else {
            panic!("wrong update kind");
        };
        assert_eq!(facts, CandidateFacts::default());
    }

    #[tokio::test]
    async fn wrong_field_type_is_malformed() {
        let err = run(r#"{"skills": "Rust"}"#).await.unwrap_err();
        assert!(err.is_malformed());
    }
}
