//! Conversational phases of an interview.
//!
//! Phases flavor the tone of generated questions. They never gate control
//! flow: scheduling and completion are decided independently.

use serde::{Deserialize, Serialize};

/// The coarse conversational stage of a session.
///
/// Phases only move forward: `Intro` → `Questioning` → `DeepDive` → `Completion`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum InterviewPhase {
    /// Opening turns; warm and informal.
    #[default]
    Intro,

    /// Broad questioning while fewer than half the modules are done.
    Questioning,

    /// Probing follow-ups once most ground is covered.
    DeepDive,

    /// Wrapping up.
    Completion,
}

impl InterviewPhase {
    /// Derives the phase from conversation history alone.
    ///
    /// `user_messages <= 2` is always `Intro`; after that the share of
    /// completed modules decides.
    pub fn derive(user_messages: u32, completed_modules: usize, total_modules: usize) -> Self {
        if user_messages <= 2 {
            return Self::Intro;
        }

        let ratio = if total_modules == 0 {
            0.0
        } else {
            completed_modules as f64 / total_modules as f64
        };

        if ratio < 0.5 {
            Self::Questioning
        } else if ratio < 0.9 {
            Self::DeepDive
        } else {
            Self::Completion
        }
    }

    /// Returns the later of two phases.
    pub fn advance_to(self, derived: Self) -> Self {
        self.max(derived)
    }

    /// Tone guidance injected into question prompts.
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Intro => "Keep the tone light and welcoming. Avoid anything that feels like a test.",
            Self::Questioning => "Ask clear, open questions that invite concrete examples.",
            Self::DeepDive => "Probe deeper into earlier answers. Ask for specifics and trade-offs.",
            Self::Completion => "Keep questions brief. The interview is nearly over.",
        }
    }

    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Intro => "Introduction",
            Self::Questioning => "Questioning",
            Self::DeepDive => "Deep Dive",
            Self::Completion => "Completion",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod derive {
        use super::*;

        #[test]
        fn first_two_messages_are_intro() {
            assert_eq!(InterviewPhase::derive(0, 0, 5), InterviewPhase::Intro);
            assert_eq!(InterviewPhase::derive(2, 5, 5), InterviewPhase::Intro);
        }

        #[test]
        fn ratio_below_half_is_questioning() {
            assert_eq!(InterviewPhase::derive(3, 0, 5), InterviewPhase::Questioning);
            assert_eq!(InterviewPhase::derive(9, 2, 5), InterviewPhase::Questioning);
        }

        #[test]
        fn ratio_between_half_and_ninety_percent_is_deep_dive() {
            assert_eq!(InterviewPhase::derive(9, 3, 5), InterviewPhase::DeepDive);
            assert_eq!(InterviewPhase::derive(9, 4, 5), InterviewPhase::DeepDive);
        }

        #[test]
        fn all_completed_is_completion() {
            assert_eq!(InterviewPhase::derive(12, 5, 5), InterviewPhase::Completion);
        }

        #[test]
        fn zero_modules_counts_as_no_progress() {
            assert_eq!(InterviewPhase::derive(5, 0, 0), InterviewPhase::Questioning);
        }
    }

    mod ordering {
        use super::*;

        #[test]
        fn advance_never_moves_backward() {
            assert_eq!(
                InterviewPhase::DeepDive.advance_to(InterviewPhase::Questioning),
                InterviewPhase::DeepDive
            );
            assert_eq!(
                InterviewPhase::Intro.advance_to(InterviewPhase::Questioning),
                InterviewPhase::Questioning
            );
        }

        #[test]
        fn replaying_history_reaches_the_same_phase() {
            // (user messages, completed modules) after each turn of a quick run
            let history = [(1, 0), (2, 0), (3, 0), (6, 1), (8, 3), (11, 4), (13, 5)];

            let stepwise = history.iter().fold(InterviewPhase::Intro, |phase, &(m, c)| {
                phase.advance_to(InterviewPhase::derive(m, c, 5))
            });
            let (m, c) = history[history.len() - 1];

            assert_eq!(stepwise, InterviewPhase::derive(m, c, 5));
            assert_eq!(stepwise, InterviewPhase::Completion);
        }

        #[test]
        fn serializes_to_snake_case() {
            let json = serde_json::to_string(&InterviewPhase::DeepDive).unwrap();
            assert_eq!(json, "\"deep_dive\"");
        }

        #[test]
        fn all_phases_have_directives() {
            for phase in [
                InterviewPhase::Intro,
                InterviewPhase::Questioning,
                InterviewPhase::DeepDive,
                InterviewPhase::Completion,
            ] {
                assert!(!phase.directive().is_empty());
                assert!(!phase.label().is_empty());
            }
        }
    }
}
