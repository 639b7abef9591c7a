//! Interview report.
//!
//! Read-only view for the presentation layer: the session snapshot, the
//! resolved personality type, the behavior rollup and a natural-language
//! summary. The summary comes from the collaborator; when it fails, a plain
//! summary is composed from the same facts.

use serde::Serialize;

use crate::domain::interview::{BehaviorRollup, InterviewSession, PersonalityType};
use crate::ports::{CompletionRequest, MessageRole, RequestMetadata, RequestPurpose};

use super::behavior_analyzer::BehaviorAnalyzer;
use super::collaborator::Collaborator;
use super::prompts;

#[derive(Debug, Clone, Serialize)]
pub struct InterviewReport {
    pub session: InterviewSession,
    /// Only present once at least one personality observation exists.
    pub personality_type: Option<PersonalityType>,
    pub behavior: BehaviorRollup,
    pub summary: String,
    pub summary_generated: bool,
}

/// Builds reports for completed or in-progress sessions.
pub struct ReportBuilder {
    collaborator: Collaborator,
    max_tokens: u32,
}

impl ReportBuilder {
    pub fn new(collaborator: Collaborator, max_tokens: u32) -> Self {
        Self {
            collaborator,
            max_tokens,
        }
    }

    pub async fn build(
        &self,
        session: &InterviewSession,
        behavior: &BehaviorAnalyzer,
    ) -> InterviewReport {
        let personality_type = session
            .personality_profile
            .as_ref()
            .filter(|p| p.observations > 0)
            .map(|p| p.resolve());
        let rollup = behavior.rollup(session).await;

        let facts = report_facts(session, personality_type.as_ref(), &rollup);
        let request = CompletionRequest::new(RequestMetadata::new(session.id, RequestPurpose::Summary))
            .with_system_prompt(prompts::REPORT_SUMMARY)
            .with_message(MessageRole::User, facts.join("\n"))
            .with_temperature(0.3)
            .with_max_tokens(self.max_tokens);

        let (summary, summary_generated) = match self.collaborator.converse(request).await {
            Ok(summary) => (summary, true),
            Err(err) => {
                tracing::warn!(
                    session_id = %session.id,
                    error = %err,
                    "Summary generation failed, composing locally"
                );
                (facts.join(" "), false)
            }
        };

        InterviewReport {
            session: session.clone(),
            personality_type,
            behavior: rollup,
            summary,
            summary_generated,
        }
    }
}

/// One sentence per known fact, in report order.
fn report_facts(
    session: &InterviewSession,
    personality_type: Option<&PersonalityType>,
    rollup: &BehaviorRollup,
) -> Vec<String> {
    let mut facts = Vec::new();

    if let Some(profile) = session.candidate_profile.as_ref().filter(|p| !p.placeholder) {
        let who = profile.name.as_deref().unwrap_or("The candidate");
        match (&profile.position, profile.years_of_experience) {
            (Some(position), Some(years)) => facts.push(format!(
                "{} works as {} with {} years of experience.",
                who, position, years
            )),
            (Some(position), None) => facts.push(format!("{} works as {}.", who, position)),
            (None, Some(years)) => {
                facts.push(format!("{} has {} years of experience.", who, years))
            }
            (None, None) => {}
        }
        if !profile.skills.is_empty() {
            facts.push(format!("Stated skills: {}.", profile.skills.join(", ")));
        }
        if !profile.goals.is_empty() {
            facts.push(format!("Goals: {}.", profile.goals.join(", ")));
        }
    }

    if let Some(professional) = session
        .professional_profile
        .as_ref()
        .filter(|p| p.answers_evaluated() > 0)
    {
        facts.push(format!(
            "Professional answers averaged {:.0} out of 100 over {} answers.",
            professional.overall.mean,
            professional.answers_evaluated()
        ));
    }

    if !session.competency_scores.is_empty() {
        let scores: Vec<String> = session
            .competency_scores
            .iter()
            .map(|(competency, score)| format!("{} {}/5", competency.as_str(), score.value()))
            .collect();
        facts.push(format!("Competencies: {}.", scores.join(", ")));
    }

    if let Some(peer) = session.peer_observation.as_ref() {
        if let Some(observation) = peer.observations.last() {
            facts.push(format!("Peers would likely say: {}", observation));
        }
    }

    if let Some(personality) = personality_type {
        facts.push(format!(
            "Personality type {} ({}% confidence).",
            personality.code,
            personality.confidence.value()
        ));
    }

    if !rollup.red_flags.is_empty() {
        facts.push(format!("Concerns: {}.", rollup.red_flags.join(", ")));
    }
    if !rollup.recommendation.is_empty() {
        facts.push(rollup.recommendation.clone());
    }

    if facts.is_empty() {
        facts.push("The interview did not produce enough information for a summary.".to_string());
    }
    facts
}
