//! Module scheduling: which module owns the next explicit question.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::module::{AssessmentModule, ModuleKind};
use super::session::InterviewSession;

/// Bounded history of the focus module of every question-bearing turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusHistory {
    capacity: usize,
    entries: VecDeque<ModuleKind>,
}

impl FocusHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, kind: ModuleKind) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(kind);
    }

    /// Returns the kind that filled each of the last `n` slots, if there is one.
    pub fn streak(&self, n: usize) -> Option<ModuleKind> {
        if n == 0 || self.entries.len() < n {
            return None;
        }
        let mut recent = self.entries.iter().rev().take(n);
        let first = *recent.next()?;
        recent.all(|k| *k == first).then_some(first)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleKind> {
        self.entries.iter()
    }
}

impl Default for FocusHistory {
    fn default() -> Self {
        Self::with_capacity(6)
    }
}

/// Picks the focus module by priority and progress, with an anti-repetition guard.
#[derive(Debug, Clone, Copy)]
pub struct ModuleScheduler {
    repetition_limit: usize,
}

impl ModuleScheduler {
    pub fn new(repetition_limit: usize) -> Self {
        Self { repetition_limit }
    }

    /// Chooses the next focus module without mutating anything.
    ///
    /// Returns `None` once every module is completed.
    pub fn select(&self, session: &InterviewSession) -> Option<ModuleKind> {
        let mut candidates: Vec<&AssessmentModule> =
            session.modules.iter().filter(|m| !m.is_completed()).collect();
        if candidates.is_empty() {
            return None;
        }

        candidates.sort_by_key(|m| (m.priority, m.progress));
        let best = candidates[0].kind;

        match session.focus_history.streak(self.repetition_limit) {
            Some(repeated) if repeated == best => candidates
                .iter()
                .map(|m| m.kind)
                .find(|kind| *kind != repeated)
                .or(Some(best)),
            _ => Some(best),
        }
    }

    /// Selects the focus module and records the question against it.
    pub fn schedule(&self, session: &mut InterviewSession) -> Option<ModuleKind> {
        let kind = self.select(session)?;
        session.record_focus(kind);
        Some(kind)
    }
}

impl Default for ModuleScheduler {
    fn default() -> Self {
        Self::new(3)
    }
}
