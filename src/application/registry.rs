//! Session registry.
//!
//! Live sessions keyed by id. Each entry sits behind its own async mutex so
//! turns on one session run strictly one at a time while other sessions
//! proceed independently.
//!
//! ```text
//! registry (RwLock)
//! ├── session-123 → Mutex { session, question cache }
//! └── session-456 → Mutex { session, question cache }
//! ```
//!
//! The registry is a cache in front of the [`SessionStore`]: a miss falls
//! back to `load` and rehydrates the entry with an empty question cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};

use crate::domain::foundation::SessionId;
use crate::domain::interview::{InterviewSession, QuestionCache};
use crate::ports::{SessionStore, SessionStoreError};

/// One live session plus its per-session question cache.
#[derive(Debug)]
pub struct SessionEntry {
    pub session: InterviewSession,
    pub cache: QuestionCache,
}

/// Shared handle to a registry entry.
pub type SessionHandle = Arc<Mutex<SessionEntry>>;

pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    cache_ttl: Duration,
}

impl SessionRegistry {
    pub fn new(cache_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            cache_ttl,
        }
    }

    /// Registers a session, replacing any entry with the same id.
    pub async fn insert(&self, session: InterviewSession) -> SessionHandle {
        let id = session.id;
        let handle = self.entry(session);
        self.sessions.write().await.insert(id, handle.clone());
        handle
    }

    /// Live entry for `id`, without touching the store.
    pub async fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Live entry for `id`, rehydrating from `store` on a miss.
    pub async fn get_or_load(
        &self,
        id: &SessionId,
        store: &dyn SessionStore,
    ) -> Result<Option<SessionHandle>, SessionStoreError> {
        if let Some(handle) = self.get(id).await {
            return Ok(Some(handle));
        }

        let Some(session) = store.load(*id).await? else {
            return Ok(None);
        };

        tracing::debug!(session_id = %id, "Rehydrating session from store");

        // Another task may have rehydrated the same id meanwhile; keep theirs.
        let mut sessions = self.sessions.write().await;
        let handle = sessions
            .entry(*id)
            .or_insert_with(|| self.entry(session))
            .clone();
        Ok(Some(handle))
    }

    pub async fn remove(&self, id: &SessionId) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    fn entry(&self, session: InterviewSession) -> SessionHandle {
        Arc::new(Mutex::new(SessionEntry {
            session,
            cache: QuestionCache::new(self.cache_ttl),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::foundation::UserId;
    use crate::domain::interview::InterviewSettings;

    fn session() -> InterviewSession {
        InterviewSession::new(UserId::new("u").unwrap(), InterviewSettings::default(), 6)
    }

    fn registry() -> SessionRegistry {
        SessionRegistry::new(Duration::from_secs(60))
    }

    #[tokio::test]
    async fn insert_then_get_returns_same_handle() {
        let registry = registry();
        let session = session();
        let id = session.id;

        let inserted = registry.insert(session).await;
        let found = registry.get(&id).await.unwrap();

        assert!(Arc::ptr_eq(&inserted, &found));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn miss_rehydrates_from_store() {
        let registry = registry();
        let store = InMemorySessionStore::new();
        let mut session = session();
        session.record_user_message("hello").unwrap();
        store.save(&session).await.unwrap();

        let handle = registry.get_or_load(&session.id, &store).await.unwrap().unwrap();

        let entry = handle.lock().await;
        assert_eq!(entry.session, session);
        assert!(entry.cache.is_empty());
        drop(entry);
        assert!(registry.get(&session.id).await.is_some());
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        let registry = registry();
        let store = InMemorySessionStore::new();

        let found = registry.get_or_load(&SessionId::new(), &store).await.unwrap();
        assert!(found.is_none());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn remove_forgets_entry() {
        let registry = registry();
        let session = session();
        let id = session.id;
        registry.insert(session).await;

        assert!(registry.remove(&id).await);
        assert!(!registry.remove(&id).await);
        assert!(registry.get(&id).await.is_none());
    }
}
