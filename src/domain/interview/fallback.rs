//! Canned texts used when the collaborator cannot produce a reply.

use super::module::ModuleKind;

pub const WELCOME: &str = "Hello, and thanks for joining! I'll be your interviewer today. \
We'll keep this conversational: there are no trick questions, and you can answer in your own \
words. To start, how has your day been so far?";

pub const CLOSING: &str = "That covers everything I wanted to ask. Thank you for taking the \
time to talk with me today; your answers gave a clear picture of your experience and the way \
you work. We'll be in touch with next steps soon.";

const RAPPORT: [&str; 3] = [
    "Thanks for sharing that! Before we dive in, what do you enjoy doing outside of work?",
    "That sounds great. What has been the highlight of your week so far?",
    "Nice, I appreciate you telling me. Is there anything you're looking forward to lately?",
];

const ACKNOWLEDGMENTS: [&str; 4] = [
    "Thank you, that's helpful.",
    "Got it, thanks for explaining.",
    "I appreciate the detail.",
    "Thanks, that gives me a good picture.",
];

const PROFESSIONAL: [&str; 4] = [
    "Could you walk me through a technical problem you solved recently and how you approached it?",
    "Which tools or technologies do you rely on most in your work, and why?",
    "How do you make sure the quality of your work holds up over time?",
    "Tell me about a technical decision you would make differently today.",
];

const PERSONALITY: [&str; 3] = [
    "After a demanding week, how do you prefer to recharge?",
    "When you face a big decision, do you lean more on data or on how it affects people?",
    "Do you prefer to plan your work in detail or keep your options open?",
];

const COMPETENCY: [&str; 4] = [
    "Tell me about a time you had to deliver under a tight deadline. What did you do?",
    "Describe a situation where you had to work closely with a difficult teammate.",
    "What is something you taught yourself recently, and how did you go about it?",
    "Tell me about a time you took ownership of a problem nobody else picked up.",
];

const PEER_OBSERVATION: [&str; 3] = [
    "How do you think your colleagues would describe you?",
    "What role do you usually end up playing within a team?",
    "What feedback have you received from peers that stuck with you?",
];

const PROFILE: [&str; 3] = [
    "Could you tell me a little about your current role and how long you've been doing it?",
    "What are the skills you're most proud of?",
    "Where would you like your career to go over the next few years?",
];

/// A generic question for the module, rotated by how many it has asked.
pub fn question(kind: ModuleKind, questions_asked: u32) -> &'static str {
    let pool: &[&str] = match kind {
        ModuleKind::Professional => &PROFESSIONAL,
        ModuleKind::Personality => &PERSONALITY,
        ModuleKind::Competency => &COMPETENCY,
        ModuleKind::PeerObservation => &PEER_OBSERVATION,
        ModuleKind::Profile => &PROFILE,
    };
    pool[questions_asked as usize % pool.len()]
}

/// Short acknowledgment of the previous answer.
pub fn acknowledgment(user_message_count: u32) -> &'static str {
    ACKNOWLEDGMENTS[user_message_count as usize % ACKNOWLEDGMENTS.len()]
}

/// Friendly reply for the rapport window.
pub fn rapport(user_message_count: u32) -> &'static str {
    let index = user_message_count.saturating_sub(1) as usize % RAPPORT.len();
    RAPPORT[index]
}

/// "<acknowledgment> <question>" built entirely from canned text.
pub fn reaction_plus_question(kind: ModuleKind, questions_asked: u32, user_message_count: u32) -> String {
    format!(
        "{} {}",
        acknowledgment(user_message_count),
        question(kind, questions_asked)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn questions_rotate_and_wrap() {
        let first = question(ModuleKind::Personality, 0);
        let second = question(ModuleKind::Personality, 1);

        assert_ne!(first, second);
        assert_eq!(question(ModuleKind::Personality, 3), first);
    }

    #[test]
    fn every_module_has_questions() {
        for kind in ModuleKind::ALL {
            assert!(question(kind, 0).ends_with('?') || question(kind, 0).ends_with('.'));
        }
    }

    #[test]
    fn reaction_plus_question_combines_both_parts() {
        let reply = reaction_plus_question(ModuleKind::Profile, 0, 4);
        assert!(reply.starts_with(acknowledgment(4)));
        assert!(reply.ends_with(question(ModuleKind::Profile, 0)));
    }

    #[test]
    fn rapport_replies_differ_across_window() {
        assert_ne!(rapport(1), rapport(2));
        assert_ne!(rapport(2), rapport(3));
    }
}
