//! Interview engine - the per-turn orchestration loop.
//!
//! One call to [`InterviewEngine::process_turn`] handles one user utterance:
//!
//! 1. Append the utterance to the message log
//! 2. Fan out to the behavior analyzer and all five evaluators concurrently
//!    and apply whatever succeeded
//! 3. Recompute the phase
//! 4. Reply: rapport during the first turns, otherwise ask the scheduler for
//!    a focus module and produce "acknowledgment + one question", or close
//!    the session when no module is left
//!
//! Collaborator failures never reach the caller. Failed extractions are
//! counted on the session; failed replies fall back to canned text.
//!
//! The engine is stateless across sessions; callers serialize turns per
//! session and own the question cache.

use std::sync::Arc;
use std::time::Duration;

use futures::future::{join, join_all};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::interview::{
    fallback, ChatRole, InterviewPhase, InterviewSession, ModuleKind, ModuleScheduler, QuestionCache,
    SessionStatus, TurnKind,
};
use crate::ports::{CompletionRequest, MessageRole, RequestMetadata, RequestPurpose};

use super::behavior_analyzer::BehaviorAnalyzer;
use super::collaborator::Collaborator;
use super::evaluators::{standard_evaluators, ExtractionInput, ExtractionParams, ModuleEvaluator};
use super::prompts;

/// Engine tuning.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub reply_temperature: f32,
    pub reply_max_tokens: u32,
    pub extraction: ExtractionParams,
    /// Messages of history sent with each reply request.
    pub context_messages: usize,
    pub question_cache_ttl: Duration,
    pub repetition_limit: usize,
    pub history_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reply_temperature: 0.7,
            reply_max_tokens: 300,
            extraction: ExtractionParams::default(),
            context_messages: 8,
            question_cache_ttl: Duration::from_secs(120),
            repetition_limit: 3,
            history_capacity: 6,
        }
    }
}

/// What a turn produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReply {
    pub text: String,
    pub kind: TurnKind,
    pub phase: InterviewPhase,
    pub status: SessionStatus,
    /// Module that owns the question, for question-bearing turns.
    pub focus: Option<ModuleKind>,
}

pub struct InterviewEngine {
    collaborator: Collaborator,
    evaluators: Vec<Arc<dyn ModuleEvaluator>>,
    behavior: BehaviorAnalyzer,
    scheduler: ModuleScheduler,
    config: EngineConfig,
}

impl InterviewEngine {
    pub fn new(collaborator: Collaborator, config: EngineConfig) -> Self {
        let evaluators = standard_evaluators(collaborator.clone(), config.extraction);
        Self::with_evaluators(collaborator, evaluators, config)
    }

    /// Builds an engine with a custom evaluator set.
    pub fn with_evaluators(
        collaborator: Collaborator,
        evaluators: Vec<Arc<dyn ModuleEvaluator>>,
        config: EngineConfig,
    ) -> Self {
        Self {
            behavior: BehaviorAnalyzer::new(collaborator.clone(), config.extraction),
            scheduler: ModuleScheduler::new(config.repetition_limit),
            collaborator,
            evaluators,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn behavior_analyzer(&self) -> &BehaviorAnalyzer {
        &self.behavior
    }

    /// A fresh question cache with the configured TTL.
    pub fn new_cache(&self) -> QuestionCache {
        QuestionCache::new(self.config.question_cache_ttl)
    }

    /// Produces the opening message.
    ///
    /// Only the very first turn of a session generates and records a
    /// welcome. Later calls return the recorded welcome without mutating.
    pub async fn open(&self, session: &mut InterviewSession) -> Result<TurnReply, DomainError> {
        if let Some(welcome) = session.welcome_message() {
            return Ok(self.reply(session, welcome.content.clone(), TurnKind::Welcome, None));
        }
        session.ensure_active()?;

        if !session.messages.is_empty() {
            // The conversation started without a welcome; nothing to open.
            let text = session
                .messages
                .iter()
                .rev()
                .find(|m| m.role == ChatRole::Assistant)
                .map(|m| m.content.clone())
                .unwrap_or_else(|| fallback::WELCOME.to_string());
            return Ok(self.reply(session, text, TurnKind::Welcome, None));
        }

        let request = self
            .reply_request(session, RequestPurpose::Reply)
            .with_system_prompt(prompts::welcome_prompt(&session.settings))
            .with_message(MessageRole::User, "(The candidate has just joined.)");
        let text = self
            .converse_or(session, request, TurnKind::Welcome, || fallback::WELCOME.to_string())
            .await;

        session.record_assistant_message(text.clone());
        Ok(self.reply(session, text, TurnKind::Welcome, None))
    }

    /// Handles one user utterance.
    ///
    /// A question-bearing turn always advances the focus module's
    /// `questions_asked`, even when every collaborator call fails and the
    /// canned question is sent; only the extracted outputs stay untouched.
    pub async fn process_turn(
        &self,
        session: &mut InterviewSession,
        cache: &mut QuestionCache,
        utterance: &str,
    ) -> Result<TurnReply, DomainError> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Err(DomainError::new(
                ErrorCode::EmptyUtterance,
                "Utterance cannot be empty",
            ));
        }

        let user_count = session.record_user_message(utterance)?;
        self.fan_out(session, utterance).await;
        let phase = session.refresh_phase();

        if TurnKind::is_rapport_turn(user_count) {
            let request = self
                .context_request(session)
                .with_system_prompt(prompts::rapport_prompt(session));
            let text = self
                .converse_or(session, request, TurnKind::Rapport, || {
                    fallback::rapport(user_count).to_string()
                })
                .await;
            return Ok(self.finish(session, text, TurnKind::Rapport, None));
        }

        let Some(focus) = self.scheduler.schedule(session) else {
            session.complete()?;
            let request = self
                .context_request(session)
                .with_system_prompt(prompts::closing_prompt(session));
            let text = self
                .converse_or(session, request, TurnKind::Closing, || {
                    fallback::CLOSING.to_string()
                })
                .await;
            return Ok(self.finish(session, text, TurnKind::Closing, None));
        };

        let questions_asked = session
            .module(focus)
            .map(|m| m.questions_asked)
            .unwrap_or_default();
        let key = (focus, questions_asked, phase);

        let text = match cache.get(&key) {
            Some(cached) => {
                tracing::debug!(
                    session_id = %session.id,
                    module = %focus,
                    questions_asked,
                    "Question cache hit"
                );
                cached
            }
            None => {
                let request = self
                    .context_request(session)
                    .with_system_prompt(prompts::question_prompt(session, focus));
                match self.collaborator.converse(request).await {
                    Ok(text) => {
                        cache.insert(key, text.clone());
                        text
                    }
                    Err(err) => {
                        tracing::warn!(
                            session_id = %session.id,
                            module = %focus,
                            error = %err,
                            "Question generation failed, using canned question"
                        );
                        fallback::reaction_plus_question(
                            focus,
                            questions_asked.saturating_sub(1),
                            user_count,
                        )
                    }
                }
            }
        };

        Ok(self.finish(session, text, TurnKind::ReactionPlusQuestion, Some(focus)))
    }

    /// Runs behavior analysis and every evaluator concurrently, then applies
    /// the results. A failing evaluator never blocks the others.
    async fn fan_out(&self, session: &mut InterviewSession, utterance: &str) {
        let input = ExtractionInput::from_session(session, utterance);

        let extractions = join_all(self.evaluators.iter().map(|evaluator| {
            let input = &input;
            async move { (evaluator.kind(), evaluator.extract(input).await) }
        }));
        let ((behavior, _source), results) =
            join(self.behavior.analyze(session.id, utterance), extractions).await;

        session.record_behavior(behavior);

        for (kind, result) in results {
            match result {
                Ok(update) => session.apply_update(&update),
                Err(err) => {
                    let anomalies = session.record_extraction_failure(kind);
                    tracing::warn!(
                        session_id = %session.id,
                        module = %kind,
                        anomalies,
                        malformed = err.is_malformed(),
                        error = %err,
                        "Extraction failed, keeping previous module state"
                    );
                }
            }
        }
    }

    /// Calls the collaborator for display text, falling back on failure.
    async fn converse_or(
        &self,
        session: &InterviewSession,
        request: CompletionRequest,
        kind: TurnKind,
        fallback: impl FnOnce() -> String,
    ) -> String {
        match self.collaborator.converse(request).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(
                    session_id = %session.id,
                    turn_kind = ?kind,
                    error = %err,
                    "Reply generation failed, using canned text"
                );
                fallback()
            }
        }
    }

    fn reply_request(&self, session: &InterviewSession, purpose: RequestPurpose) -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(session.id, purpose))
            .with_temperature(self.config.reply_temperature)
            .with_max_tokens(self.config.reply_max_tokens)
    }

    /// Reply request carrying the last messages as context.
    fn context_request(&self, session: &InterviewSession) -> CompletionRequest {
        self.reply_request(session, RequestPurpose::Reply)
            .with_messages(prompts::context_messages(
                session.recent_messages(self.config.context_messages),
            ))
    }

    fn finish(
        &self,
        session: &mut InterviewSession,
        text: String,
        kind: TurnKind,
        focus: Option<ModuleKind>,
    ) -> TurnReply {
        session.record_assistant_message(text.clone());
        tracing::info!(
            session_id = %session.id,
            turn_kind = ?kind,
            phase = ?session.phase,
            focus = ?focus,
            user_messages = session.user_message_count,
            "Turn processed"
        );
        self.reply(session, text, kind, focus)
    }

    fn reply(
        &self,
        session: &InterviewSession,
        text: String,
        kind: TurnKind,
        focus: Option<ModuleKind>,
    ) -> TurnReply {
        TurnReply {
            text,
            kind,
            phase: session.phase,
            status: session.status,
            focus,
        }
    }
}
