//! Turn kinds: what sort of reply a turn produces.

use serde::{Deserialize, Serialize};

use super::module::ModuleKind;

/// Number of opening user turns kept free of assessment questions.
pub const RAPPORT_TURNS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    /// Opening message before the candidate has said anything.
    Welcome,
    /// Friendly, off-topic reply during the first user turns.
    Rapport,
    /// Short reaction to the last answer plus one new question.
    ReactionPlusQuestion,
    /// Closing message once every module is complete.
    Closing,
}

impl TurnKind {
    /// Whether a user turn falls inside the rapport window.
    pub fn is_rapport_turn(user_message_count: u32) -> bool {
        (1..=RAPPORT_TURNS).contains(&user_message_count)
    }

    /// Classifies a turn from the user message count and the scheduler result.
    pub fn classify(user_message_count: u32, focus: Option<ModuleKind>) -> Self {
        if user_message_count == 0 {
            Self::Welcome
        } else if Self::is_rapport_turn(user_message_count) {
            Self::Rapport
        } else if focus.is_some() {
            Self::ReactionPlusQuestion
        } else {
            Self::Closing
        }
    }

    /// Whether this turn poses an explicit assessment question.
    pub fn asks_question(&self) -> bool {
        matches!(self, Self::ReactionPlusQuestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_messages_is_welcome() {
        assert_eq!(TurnKind::classify(0, None), TurnKind::Welcome);
    }

    #[test]
    fn first_three_turns_are_rapport_even_with_focus() {
        for count in 1..=3 {
            assert_eq!(
                TurnKind::classify(count, Some(ModuleKind::Profile)),
                TurnKind::Rapport
            );
        }
    }

    #[test]
    fn later_turns_depend_on_scheduler() {
        assert_eq!(
            TurnKind::classify(4, Some(ModuleKind::Professional)),
            TurnKind::ReactionPlusQuestion
        );
        assert_eq!(TurnKind::classify(14, None), TurnKind::Closing);
    }

    #[test]
    fn only_reaction_plus_question_asks() {
        assert!(TurnKind::ReactionPlusQuestion.asks_question());
        assert!(!TurnKind::Rapport.asks_question());
        assert!(!TurnKind::Closing.asks_question());
    }
}
