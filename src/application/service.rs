//! InterviewService - the Caller API.
//!
//! Every operation addresses a session by id through the [`SessionRegistry`].
//! Mutations run under the session's own lock and are saved to the
//! [`SessionStore`] before the call returns. Completing a session hands its
//! competency scores to the [`CompetencyTracker`] in a detached task.

use std::sync::Arc;

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::interview::{InterviewSession, InterviewSettings};
use crate::ports::{CompetencySubmission, CompetencyTracker, SessionStore};

use super::collaborator::Collaborator;
use super::engine::{EngineConfig, InterviewEngine, TurnReply};
use super::error::InterviewError;
use super::registry::{SessionHandle, SessionRegistry};
use super::report::{InterviewReport, ReportBuilder};

const SUMMARY_MAX_TOKENS: u32 = 400;

pub struct InterviewService {
    engine: InterviewEngine,
    reports: ReportBuilder,
    registry: SessionRegistry,
    store: Arc<dyn SessionStore>,
    tracker: Arc<dyn CompetencyTracker>,
}

impl InterviewService {
    pub fn new(
        collaborator: Collaborator,
        store: Arc<dyn SessionStore>,
        tracker: Arc<dyn CompetencyTracker>,
        config: EngineConfig,
    ) -> Self {
        Self::with_engine(
            InterviewEngine::new(collaborator.clone(), config),
            ReportBuilder::new(collaborator, SUMMARY_MAX_TOKENS),
            store,
            tracker,
        )
    }

    pub fn with_engine(
        engine: InterviewEngine,
        reports: ReportBuilder,
        store: Arc<dyn SessionStore>,
        tracker: Arc<dyn CompetencyTracker>,
    ) -> Self {
        Self {
            registry: SessionRegistry::new(engine.config().question_cache_ttl),
            engine,
            reports,
            store,
            tracker,
        }
    }

    /// Creates, stores and registers a new session.
    pub async fn create_session(
        &self,
        user_id: UserId,
        settings: InterviewSettings,
    ) -> Result<InterviewSession, InterviewError> {
        let settings = settings.normalized()?;
        let session =
            InterviewSession::new(user_id, settings, self.engine.config().history_capacity);

        self.store.save(&session).await?;
        self.registry.insert(session.clone()).await;

        tracing::info!(
            session_id = %session.id,
            user_id = %session.user_id.as_str(),
            difficulty = ?session.settings.difficulty,
            style = ?session.settings.style,
            "Interview session created"
        );
        Ok(session)
    }

    /// Sends the welcome message, once.
    pub async fn open_session(&self, id: SessionId) -> Result<TurnReply, InterviewError> {
        let handle = self.lookup(id).await?;
        let mut entry = handle.lock().await;

        let before = entry.session.messages.len();
        let reply = self
            .engine
            .open(&mut entry.session)
            .await
            .map_err(|e| InterviewError::from_domain(id, e))?;

        if entry.session.messages.len() != before {
            self.store.save(&entry.session).await?;
        }
        Ok(reply)
    }

    /// Processes one user utterance and returns the reply.
    ///
    /// The turn runs on a working copy. The registry entry and the store only
    /// see it once the reply exists and has been saved, so a caller dropped
    /// mid-turn leaves both at the previous state.
    pub async fn submit_utterance(
        &self,
        id: SessionId,
        text: &str,
    ) -> Result<TurnReply, InterviewError> {
        let handle = self.lookup(id).await?;
        let mut entry = handle.lock().await;
        let entry = &mut *entry;

        let mut working = entry.session.clone();
        let reply = self
            .engine
            .process_turn(&mut working, &mut entry.cache, text)
            .await
            .map_err(|e| InterviewError::from_domain(id, e))?;

        self.store.save(&working).await?;
        entry.session = working;

        if entry.session.is_completed() {
            self.submit_competencies(&entry.session);
        }
        Ok(reply)
    }

    /// Ends the session early. Completing twice returns the same snapshot.
    pub async fn complete_session(&self, id: SessionId) -> Result<InterviewSession, InterviewError> {
        let handle = self.lookup(id).await?;
        let mut entry = handle.lock().await;

        if entry.session.is_completed() {
            return Ok(entry.session.clone());
        }

        entry
            .session
            .complete()
            .map_err(|e| InterviewError::from_domain(id, e))?;
        self.store.save(&entry.session).await?;

        tracing::info!(
            session_id = %id,
            user_messages = entry.session.user_message_count,
            completed_modules = entry.session.completed_module_count(),
            "Interview session completed"
        );
        self.submit_competencies(&entry.session);
        Ok(entry.session.clone())
    }

    /// Snapshot of the session, or `None` for an unknown id.
    pub async fn get_session(&self, id: SessionId) -> Result<Option<InterviewSession>, InterviewError> {
        match self.registry.get_or_load(&id, self.store.as_ref()).await? {
            Some(handle) => Ok(Some(handle.lock().await.session.clone())),
            None => Ok(None),
        }
    }

    /// Builds the report for a session.
    pub async fn report(&self, id: SessionId) -> Result<InterviewReport, InterviewError> {
        let handle = self.lookup(id).await?;
        // Report generation talks to the collaborator; don't hold the lock.
        let session = handle.lock().await.session.clone();
        Ok(self
            .reports
            .build(&session, self.engine.behavior_analyzer())
            .await)
    }

    async fn lookup(&self, id: SessionId) -> Result<SessionHandle, InterviewError> {
        self.registry
            .get_or_load(&id, self.store.as_ref())
            .await?
            .ok_or(InterviewError::SessionNotFound(id))
    }

    fn submit_competencies(&self, session: &InterviewSession) {
        let submission = CompetencySubmission::from_session(session);
        let tracker = Arc::clone(&self.tracker);

        tokio::spawn(async move {
            let session_id = submission.session_id;
            let scores = submission.scores.len();
            match tracker.submit(submission).await {
                Ok(()) => tracing::info!(
                    session_id = %session_id,
                    scores,
                    "Competency scores submitted"
                ),
                Err(err) => tracing::warn!(
                    session_id = %session_id,
                    error = %err,
                    "Competency submission failed"
                ),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError, MockResponse};
    use crate::adapters::competency::InMemoryCompetencyTracker;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::application::collaborator::CollaboratorConfig;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::interview::{ChatRole, Difficulty, InterviewStyle, SessionStatus};
    use crate::ports::RequestPurpose;
    use std::time::Duration;

    struct Fixture {
        service: InterviewService,
        store: InMemorySessionStore,
        tracker: InMemoryCompetencyTracker,
    }

    fn fixture(provider: MockAIProvider) -> Fixture {
        let store = InMemorySessionStore::new();
        let tracker = InMemoryCompetencyTracker::new();
        let collaborator = Collaborator::new(
            Arc::new(provider),
            CollaboratorConfig {
                timeout: Duration::from_millis(200),
                max_retries: 0,
                retry_base_delay: Duration::from_millis(1),
            },
        );
        let service = InterviewService::new(
            collaborator,
            Arc::new(store.clone()),
            Arc::new(tracker.clone()),
            EngineConfig::default(),
        );
        Fixture {
            service,
            store,
            tracker,
        }
    }

    fn user() -> UserId {
        UserId::new("candidate-1").unwrap()
    }

    fn quick() -> InterviewSettings {
        InterviewSettings::new(Difficulty::Middle, InterviewStyle::Quick)
    }

    /// Waits for the detached submission task.
    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    mod lifecycle {
        use super::*;

        #[tokio::test]
        async fn create_saves_and_registers() {
            let f = fixture(MockAIProvider::new());

            let session = f.service.create_session(user(), quick()).await.unwrap();

            assert_eq!(session.status, SessionStatus::Setup);
            assert_eq!(f.store.session_count().await, 1);
            assert_eq!(f.service.get_session(session.id).await.unwrap(), Some(session));
        }

        #[tokio::test]
        async fn create_rejects_invalid_duration() {
            let f = fixture(MockAIProvider::new());

            let err = f
                .service
                .create_session(user(), quick().with_duration(2))
                .await
                .unwrap_err();

            assert_eq!(err.code(), ErrorCode::ValidationFailed);
            assert_eq!(f.store.session_count().await, 0);
        }

        #[tokio::test]
        async fn unknown_session_is_not_found() {
            let f = fixture(MockAIProvider::new());
            let id = SessionId::new();

            assert_eq!(
                f.service.submit_utterance(id, "hello").await.unwrap_err(),
                InterviewError::SessionNotFound(id)
            );
            assert_eq!(f.service.get_session(id).await.unwrap(), None);
        }

        #[tokio::test]
        async fn open_is_idempotent() {
            let provider = MockAIProvider::new().with_default(MockResponse::text("Welcome!"));
            let f = fixture(provider.clone());
            let session = f.service.create_session(user(), quick()).await.unwrap();

            let first = f.service.open_session(session.id).await.unwrap();
            let second = f.service.open_session(session.id).await.unwrap();

            assert_eq!(first, second);
            assert_eq!(provider.call_count(), 1);
            let stored = f.store.load(session.id).await.unwrap().unwrap();
            assert_eq!(stored.messages.len(), 1);
        }

        #[tokio::test]
        async fn complete_submits_competencies_once() {
            let f = fixture(MockAIProvider::new());
            let session = f.service.create_session(user(), quick()).await.unwrap();

            let first = f.service.complete_session(session.id).await.unwrap();
            let second = f.service.complete_session(session.id).await.unwrap();
            settle().await;

            assert_eq!(first.status, SessionStatus::Completed);
            assert_eq!(first.ended_at, second.ended_at);
            assert_eq!(f.tracker.submissions_for(session.id).await.len(), 1);
        }

        #[tokio::test]
        async fn completed_session_rejects_utterances() {
            let f = fixture(MockAIProvider::new());
            let session = f.service.create_session(user(), quick()).await.unwrap();
            f.service.complete_session(session.id).await.unwrap();

            let err = f
                .service
                .submit_utterance(session.id, "still there?")
                .await
                .unwrap_err();
            assert_eq!(err, InterviewError::SessionCompleted(session.id));
        }
    }

    mod turns {
        use super::*;

        #[tokio::test]
        async fn every_turn_is_persisted() {
            let f = fixture(MockAIProvider::new().with_default(MockResponse::text("Nice!")));
            let session = f.service.create_session(user(), quick()).await.unwrap();

            f.service.submit_utterance(session.id, "Hi there").await.unwrap();

            let stored = f.store.load(session.id).await.unwrap().unwrap();
            assert_eq!(stored.user_message_count, 1);
            assert_eq!(stored.messages.len(), 2);
        }

        #[tokio::test]
        async fn empty_utterance_is_rejected() {
            let f = fixture(MockAIProvider::new());
            let session = f.service.create_session(user(), quick()).await.unwrap();

            let err = f.service.submit_utterance(session.id, "  \n").await.unwrap_err();
            assert_eq!(err, InterviewError::EmptyUtterance);
        }

        #[tokio::test]
        async fn rehydrates_from_store_in_a_new_service() {
            let f = fixture(MockAIProvider::new().with_default(MockResponse::text("Sure.")));
            let session = f.service.create_session(user(), quick()).await.unwrap();
            f.service.submit_utterance(session.id, "Hello").await.unwrap();

            let collaborator = Collaborator::new(
                Arc::new(MockAIProvider::new().with_default(MockResponse::text("Again."))),
                CollaboratorConfig::default(),
            );
            let restarted = InterviewService::new(
                collaborator,
                Arc::new(f.store.clone()),
                Arc::new(InMemoryCompetencyTracker::new()),
                EngineConfig::default(),
            );

            let reply = restarted
                .submit_utterance(session.id, "Still me")
                .await
                .unwrap();
            assert_eq!(reply.text, "Again.");
            let snapshot = restarted.get_session(session.id).await.unwrap().unwrap();
            assert_eq!(snapshot.user_message_count, 2);
        }

        #[tokio::test]
        async fn dropped_turn_leaves_registry_and_store_in_step() {
            let provider = MockAIProvider::new()
                .with_default(MockResponse::text("Nice!"))
                .with_delay(Duration::from_millis(80));
            let f = fixture(provider);
            let session = f.service.create_session(user(), quick()).await.unwrap();

            let cut_short = tokio::time::timeout(
                Duration::from_millis(20),
                f.service.submit_utterance(session.id, "hello there"),
            )
            .await;
            assert!(cut_short.is_err());

            let live = f.service.get_session(session.id).await.unwrap().unwrap();
            let stored = f.store.load(session.id).await.unwrap().unwrap();
            assert_eq!(live, stored);
            assert!(live.messages.is_empty());
            assert_eq!(live.user_message_count, 0);

            // The same utterance can simply be sent again.
            f.service.submit_utterance(session.id, "hello there").await.unwrap();
            let stored = f.store.load(session.id).await.unwrap().unwrap();
            assert_eq!(stored.user_message_count, 1);
            assert_eq!(stored.messages.len(), 2);
        }

        #[tokio::test]
        async fn concurrent_turns_on_one_session_are_serialized() {
            let provider = MockAIProvider::new()
                .with_default(MockResponse::text("Got it."))
                .with_delay(Duration::from_millis(10));
            let f = fixture(provider);
            let session = f.service.create_session(user(), quick()).await.unwrap();

            let (first, second) = tokio::join!(
                f.service.submit_utterance(session.id, "First answer"),
                f.service.submit_utterance(session.id, "Second answer"),
            );
            first.unwrap();
            second.unwrap();

            let snapshot = f.service.get_session(session.id).await.unwrap().unwrap();
            assert_eq!(snapshot.user_message_count, 2);
            assert_eq!(snapshot.messages.len(), 4);
            for (i, message) in snapshot.messages.iter().enumerate() {
                let expected = if i % 2 == 0 {
                    ChatRole::User
                } else {
                    ChatRole::Assistant
                };
                assert_eq!(message.role, expected);
            }
        }

        #[tokio::test]
        async fn tracker_failure_is_not_surfaced() {
            let store = InMemorySessionStore::new();
            let collaborator = Collaborator::new(
                Arc::new(MockAIProvider::failing(MockError::AuthenticationFailed)),
                CollaboratorConfig::default(),
            );
            let service = InterviewService::new(
                collaborator,
                Arc::new(store),
                Arc::new(InMemoryCompetencyTracker::failing()),
                EngineConfig::default(),
            );
            let session = service.create_session(user(), quick()).await.unwrap();

            let completed = service.complete_session(session.id).await.unwrap();
            settle().await;

            assert!(completed.is_completed());
        }
    }

    mod reporting {
        use super::*;

        #[tokio::test]
        async fn report_uses_generated_summary() {
            let provider = MockAIProvider::new()
                .with_default(MockResponse::text("Thanks!"))
                .with_fixed_route(
                    RequestPurpose::Summary,
                    MockResponse::text("A thoughtful candidate."),
                );
            let f = fixture(provider);
            let session = f.service.create_session(user(), quick()).await.unwrap();
            f.service.submit_utterance(session.id, "Hello!").await.unwrap();

            let report = f.service.report(session.id).await.unwrap();

            assert_eq!(report.summary, "A thoughtful candidate.");
            assert_eq!(report.session.user_message_count, 1);
        }
    }
}
