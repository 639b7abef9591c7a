//! Short-lived cache of generated questions.
//!
//! Keyed by scheduling state so a retried turn that lands on the same
//! state reuses the earlier question instead of generating a new one.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::module::ModuleKind;
use super::phase::InterviewPhase;

/// (focus module, questions asked after scheduling, phase)
pub type QuestionKey = (ModuleKind, u32, InterviewPhase);

#[derive(Debug, Clone)]
struct CachedQuestion {
    text: String,
    stored_at: Instant,
}

/// Per-session question cache with a fixed TTL. Never persisted.
#[derive(Debug, Clone)]
pub struct QuestionCache {
    ttl: Duration,
    entries: HashMap<QuestionKey, CachedQuestion>,
}

impl QuestionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, key: &QuestionKey) -> Option<String> {
        self.get_at(key, Instant::now())
    }

    /// Looks up a key as of `now`, evicting it if expired.
    pub fn get_at(&mut self, key: &QuestionKey, now: Instant) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) => now.saturating_duration_since(entry.stored_at) >= self.ttl,
            None => return None,
        };

        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.text.clone())
    }

    pub fn insert(&mut self, key: QuestionKey, text: impl Into<String>) {
        self.insert_at(key, text, Instant::now());
    }

    pub fn insert_at(&mut self, key: QuestionKey, text: impl Into<String>, now: Instant) {
        self.entries.insert(
            key,
            CachedQuestion {
                text: text.into(),
                stored_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: QuestionKey = (ModuleKind::Professional, 1, InterviewPhase::Questioning);

    #[test]
    fn returns_fresh_entry() {
        let mut cache = QuestionCache::new(Duration::from_secs(60));
        let now = Instant::now();
        cache.insert_at(KEY, "How do you test async code?", now);

        assert_eq!(
            cache.get_at(&KEY, now + Duration::from_secs(10)).as_deref(),
            Some("How do you test async code?")
        );
    }

    #[test]
    fn expired_entry_is_evicted() {
        let mut cache = QuestionCache::new(Duration::from_secs(60));
        let now = Instant::now();
        cache.insert_at(KEY, "stale", now);

        assert!(cache.get_at(&KEY, now + Duration::from_secs(61)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn keys_distinguish_phase_and_progress() {
        let mut cache = QuestionCache::new(Duration::from_secs(60));
        cache.insert(KEY, "first");

        assert!(cache
            .get(&(ModuleKind::Professional, 2, InterviewPhase::Questioning))
            .is_none());
        assert!(cache
            .get(&(ModuleKind::Professional, 1, InterviewPhase::DeepDive))
            .is_none());
        assert_eq!(cache.len(), 1);
    }
}
