//! Prompt construction for every collaborator call.
//!
//! Extraction prompts carry the exact JSON contract each evaluator parses;
//! conversational prompts carry the turn kind, phase and focus module.

use crate::domain::interview::{
    ChatMessage, ChatRole, InterviewPhase, InterviewSession, InterviewSettings, ModuleKind,
    TurnKind,
};
use crate::ports::Message;

/// Converts the tail of the message log into collaborator messages.
pub fn context_messages(messages: &[ChatMessage]) -> Vec<Message> {
    messages
        .iter()
        .map(|m| match m.role {
            ChatRole::User => Message::user(m.content.clone()),
            ChatRole::Assistant => Message::assistant(m.content.clone()),
        })
        .collect()
}

fn settings_line(settings: &InterviewSettings) -> String {
    let mut line = format!(
        "Candidate level: {}. Planned duration: about {} minutes.",
        settings.difficulty.label(),
        settings.duration_minutes
    );
    if !settings.focus_areas.is_empty() {
        line.push_str(&format!(" Topics to favor: {}.", settings.focus_areas.join(", ")));
    }
    line
}

/// System prompt for the opening message.
pub fn welcome_prompt(settings: &InterviewSettings) -> String {
    format!(
        "{}\n\n{}\n\nWrite a short, warm welcome. Introduce yourself as the interviewer, \
         explain that the conversation is informal, and end with one light, personal \
         question. Do not ask anything about skills or experience yet.",
        INTERVIEWER_PERSONA,
        settings_line(settings)
    )
}

/// System prompt for a rapport-window reply.
pub fn rapport_prompt(session: &InterviewSession) -> String {
    format!(
        "{}\n\n{}\n\nThis is turn {} of the warm-up. React naturally to what the candidate \
         said and keep the small talk going with one friendly, off-topic question. Do not \
         ask any assessment question.",
        INTERVIEWER_PERSONA,
        settings_line(&session.settings),
        session.user_message_count
    )
}

/// System prompt for a reaction plus one question owned by `focus`.
pub fn question_prompt(session: &InterviewSession, focus: ModuleKind) -> String {
    let module_line = session
        .module(focus)
        .map(|m| {
            format!(
                "Focus module: {} (question {} of {}).",
                m.name, m.questions_asked, m.target_questions
            )
        })
        .unwrap_or_else(|| format!("Focus module: {}.", focus.display_name()));

    format!(
        "{}\n\n{}\nPhase: {}. {}\n{}\nWhat to explore: {}\n\n\
         Reply with exactly two parts in one short paragraph: a brief, genuine \
         acknowledgment of the candidate's last answer, then exactly one new question \
         for the focus module. Never ask more than one question.",
        INTERVIEWER_PERSONA,
        settings_line(&session.settings),
        session.phase.label(),
        session.phase.directive(),
        module_line,
        focus.question_focus()
    )
}

/// System prompt for the closing message.
pub fn closing_prompt(session: &InterviewSession) -> String {
    let covered: Vec<&str> = session.modules.iter().map(|m| m.name.as_str()).collect();
    format!(
        "{}\n\nThe interview is over. Thank the candidate warmly and briefly summarize what \
         was covered: {}. Do not ask any further questions and do not share any evaluation.",
        INTERVIEWER_PERSONA,
        covered.join(", ")
    )
}

/// System prompt for the reply of a given turn kind.
pub fn reply_prompt(session: &InterviewSession, kind: TurnKind, focus: Option<ModuleKind>) -> String {
    match (kind, focus) {
        (TurnKind::Welcome, _) => welcome_prompt(&session.settings),
        (TurnKind::Rapport, _) => rapport_prompt(session),
        (TurnKind::ReactionPlusQuestion, Some(focus)) => question_prompt(session, focus),
        (TurnKind::ReactionPlusQuestion, None) | (TurnKind::Closing, _) => closing_prompt(session),
    }
}

/// System prompt for one module's extraction.
pub fn extraction_prompt(kind: ModuleKind) -> &'static str {
    match kind {
        ModuleKind::Professional => PROFESSIONAL_EXTRACTION,
        ModuleKind::Personality => PERSONALITY_EXTRACTION,
        ModuleKind::Competency => COMPETENCY_EXTRACTION,
        ModuleKind::PeerObservation => PEER_OBSERVATION_EXTRACTION,
        ModuleKind::Profile => PROFILE_EXTRACTION,
    }
}

/// User message for an extraction: the utterance plus the question it answers.
pub fn extraction_input(utterance: &str, last_question: Option<&str>, phase: InterviewPhase) -> String {
    match last_question {
        Some(question) => format!(
            "Interview phase: {}\nInterviewer asked: {}\nCandidate answered: {}",
            phase.label(),
            question,
            utterance
        ),
        None => format!(
            "Interview phase: {}\nCandidate said: {}",
            phase.label(),
            utterance
        ),
    }
}

pub const BEHAVIOR_ANALYSIS: &str = r#"You analyze the behavior of a job candidate from a single interview answer.

Return ONLY a JSON object:
{
  "sentiment": "positive" | "neutral" | "negative",
  "confidence": 0-100,
  "behavioral_markers": ["..."],
  "emotional_state": "...",
  "motivation_level": "low" | "medium" | "high",
  "communication_style": "...",
  "concerns": ["..."],
  "strengths": ["..."]
}

List a concern only for behavior a hiring manager should notice (hostility, dismissiveness, evasiveness)."#;

pub const BEHAVIOR_ROLLUP: &str = r#"You summarize a candidate's behavior across a whole interview.
You receive one line per analyzed answer.

Return ONLY a JSON object:
{
  "overall_sentiment": "positive" | "neutral" | "negative",
  "patterns": ["..."],
  "red_flags": ["..."],
  "recommendation": "one sentence leaning hire or no-hire",
  "feedback": "two or three sentences of feedback"
}"#;

pub const REPORT_SUMMARY: &str = "You write the summary section of an interview report for a \
hiring manager. Using only the facts provided, write one neutral paragraph of four to six \
sentences covering background, professional strengths, working style and any concerns. Do \
not invent facts and do not use lists or headings.";

const INTERVIEWER_PERSONA: &str = "You are a friendly, professional HR interviewer having a \
natural conversation with a job candidate. Speak in plain sentences, never use lists or \
headings, and keep every reply under 80 words.";

const PROFESSIONAL_EXTRACTION: &str = r#"You evaluate the professional and technical content of a candidate's answer.

Return ONLY a JSON object:
{
  "score": 0-100,
  "skills": ["skill tags the answer demonstrates"],
  "criteria": {
    "technical_correctness": 0-100,
    "completeness": 0-100,
    "clarity": 0-100,
    "practical_grounding": 0-100
  },
  "feedback": "one sentence"
}

If the answer has no professional content, score it on what is there and return an empty skills list."#;

const PERSONALITY_EXTRACTION: &str = r#"You infer personality tendencies from the language of a candidate's answer.

Return ONLY a JSON object with a value from -1.0 to 1.0 for each axis:
{
  "extraversion_introversion": positive = extraversion, negative = introversion,
  "sensing_intuition": positive = sensing, negative = intuition,
  "thinking_feeling": positive = thinking, negative = feeling,
  "judging_perceiving": positive = judging, negative = perceiving
}

Use 0 when the answer gives no signal for an axis."#;

const COMPETENCY_EXTRACTION: &str = r#"You map a candidate's answer onto a competency taxonomy.

Return ONLY a JSON object:
{
  "competencies": { "<id>": 1-5 }
}

Valid ids: teamwork, communication, problem_solving, time_management, self_development,
leadership, adaptability, responsibility. Include only competencies the answer gives evidence for."#;

const PEER_OBSERVATION_EXTRACTION: &str = r#"You estimate how the candidate's peers would experience working with them, based on their answer.

Return ONLY a JSON object:
{
  "scores": { "<dimension>": 1-5 },
  "observation": "one sentence a colleague might say"
}

Valid dimensions: teamwork, communication, leadership, adaptability, collaboration.
Include only dimensions the answer gives evidence for."#;

const PROFILE_EXTRACTION: &str = r#"You extract biographical facts a candidate states about themselves.

Return ONLY a JSON object; omit or set to null anything not stated:
{
  "name": "...",
  "position": "...",
  "years_of_experience": number,
  "skills": ["..."],
  "achievements": ["..."],
  "goals": ["..."],
  "personal_qualities": ["..."]
}"#;
