//! Behavioral signals derived from each utterance.
//!
//! The collaborator normally produces these; when it cannot, a keyword
//! heuristic stands in so every turn still carries some signal.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{Percentage, Timestamp};

pub const CONCERN_HOSTILE: &str = "hostile language";
pub const CONCERN_DISMISSIVE: &str = "dismissive attitude";
pub const CONCERN_SHORT_REPLY: &str = "very short reply";

/// Replies with fewer words than this are flagged as very short.
const SHORT_REPLY_WORDS: usize = 4;

const HOSTILE_WORDS: [&str; 9] = [
    "hate", "stupid", "idiot", "idiots", "dumb", "moron", "shut", "damn", "pathetic",
];

const HOSTILE_PHRASES: [&str; 3] = ["shut up", "screw you", "get lost"];

const DISMISSIVE_PHRASES: [&str; 9] = [
    "whatever",
    "don't care",
    "dont care",
    "who cares",
    "doesn't matter",
    "does not matter",
    "not interested",
    "waste of time",
    "pointless",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MotivationLevel {
    Low,
    #[default]
    Medium,
    High,
}

/// Per-utterance behavior analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorAnalysis {
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default = "default_confidence", deserialize_with = "lenient_percentage")]
    pub confidence: Percentage,
    #[serde(default)]
    pub behavioral_markers: Vec<String>,
    #[serde(default)]
    pub emotional_state: String,
    #[serde(default)]
    pub motivation_level: MotivationLevel,
    #[serde(default)]
    pub communication_style: String,
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
}

fn default_confidence() -> Percentage {
    Percentage::new(50)
}

/// Accepts integers or floats and clamps into 0–100.
fn lenient_percentage<'de, D>(deserializer: D) -> Result<Percentage, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if raw.is_nan() {
        return Ok(Percentage::ZERO);
    }
    Ok(Percentage::new(raw.clamp(0.0, 100.0).round() as u8))
}

impl BehaviorAnalysis {
    /// Local fallback used when the collaborator is unavailable.
    pub fn heuristic(text: &str) -> Self {
        let tokens = tokenize(text);
        let normalized = format!(" {} ", tokens.join(" "));
        let contains_phrase = |phrase: &str| {
            let phrase_tokens = tokenize(phrase).join(" ");
            normalized.contains(&format!(" {} ", phrase_tokens))
        };

        let hostile = tokens.iter().any(|t| HOSTILE_WORDS.contains(&t.as_str()))
            || HOSTILE_PHRASES.iter().any(|p| contains_phrase(p));
        let dismissive = DISMISSIVE_PHRASES.iter().any(|p| contains_phrase(p));
        let short = tokens.len() < SHORT_REPLY_WORDS;

        let mut analysis = Self {
            sentiment: Sentiment::Neutral,
            confidence: default_confidence(),
            behavioral_markers: Vec::new(),
            emotional_state: "calm".to_string(),
            motivation_level: MotivationLevel::Medium,
            communication_style: "conversational".to_string(),
            concerns: Vec::new(),
            strengths: Vec::new(),
        };

        if hostile {
            analysis.sentiment = Sentiment::Negative;
            analysis.emotional_state = "agitated".to_string();
            analysis.behavioral_markers.push("hostility".to_string());
            analysis.concerns.push(CONCERN_HOSTILE.to_string());
        }
        if dismissive {
            analysis.motivation_level = MotivationLevel::Low;
            analysis.behavioral_markers.push("disengagement".to_string());
            analysis.concerns.push(CONCERN_DISMISSIVE.to_string());
        }
        if short {
            analysis.communication_style = "terse".to_string();
            analysis.concerns.push(CONCERN_SHORT_REPLY.to_string());
        }

        analysis
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// One analyzed utterance in the session's behavior log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorEntry {
    pub message: String,
    pub analysis: BehaviorAnalysis,
    pub timestamp: Timestamp,
}

/// Whole-conversation behavior summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorRollup {
    #[serde(default)]
    pub overall_sentiment: Sentiment,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub feedback: String,
}

impl BehaviorRollup {
    /// Aggregates the behavior log locally.
    ///
    /// Majority sentiment wins (ties go to neutral) and patterns are the most
    /// frequent markers. The recommendation depends on the red-flag count and
    /// is empty when nothing was analyzed.
    pub fn aggregate(log: &[BehaviorEntry], risk_flags: &[String]) -> Self {
        let mut sentiments: BTreeMap<Sentiment, usize> = BTreeMap::new();
        let mut markers: BTreeMap<&str, usize> = BTreeMap::new();
        let mut strengths: Vec<&str> = Vec::new();

        for entry in log {
            *sentiments.entry(entry.analysis.sentiment).or_default() += 1;
            for marker in &entry.analysis.behavioral_markers {
                *markers.entry(marker.as_str()).or_default() += 1;
            }
            for strength in &entry.analysis.strengths {
                if !strengths.contains(&strength.as_str()) {
                    strengths.push(strength.as_str());
                }
            }
        }

        let top = sentiments.values().copied().max().unwrap_or(0);
        let leaders: Vec<Sentiment> = sentiments
            .iter()
            .filter(|(_, count)| **count == top)
            .map(|(s, _)| *s)
            .collect();
        let overall_sentiment = match leaders.as_slice() {
            [single] => *single,
            _ => Sentiment::Neutral,
        };

        let mut ranked: Vec<(&str, usize)> = markers.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        let patterns: Vec<String> = ranked
            .into_iter()
            .take(5)
            .map(|(marker, count)| format!("{} ({}x)", marker, count))
            .collect();

        // No analyzed answers means no basis for leaning either way.
        let recommendation = if log.is_empty() {
            String::new()
        } else {
            match risk_flags.len() {
                0 => "Lean hire: no behavioral red flags observed.",
                1 | 2 => "Proceed with caution: review the flagged behavior before deciding.",
                _ => "Lean no-hire: repeated behavioral red flags.",
            }
            .to_string()
        };

        let feedback = if log.is_empty() {
            "No answers were analyzed.".to_string()
        } else if strengths.is_empty() {
            format!("Analyzed {} answers.", log.len())
        } else {
            format!(
                "Analyzed {} answers. Observed strengths: {}.",
                log.len(),
                strengths.join(", ")
            )
        };

        Self {
            overall_sentiment,
            patterns,
            red_flags: risk_flags.to_vec(),
            recommendation,
            feedback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod heuristic {
        use super::*;

        #[test]
        fn hostile_language_is_negative() {
            let analysis = BehaviorAnalysis::heuristic("This is a stupid question and I hate it");

            assert_eq!(analysis.sentiment, Sentiment::Negative);
            assert!(analysis.concerns.contains(&CONCERN_HOSTILE.to_string()));
        }

        #[test]
        fn whatever_is_dismissive_not_hostile() {
            let analysis = BehaviorAnalysis::heuristic("whatever, I guess it works somehow");

            assert_eq!(analysis.sentiment, Sentiment::Neutral);
            assert_eq!(analysis.motivation_level, MotivationLevel::Low);
            assert_eq!(analysis.concerns, vec![CONCERN_DISMISSIVE.to_string()]);
        }

        #[test]
        fn dismissive_phrase_with_apostrophe_is_detected() {
            let analysis = BehaviorAnalysis::heuristic("Honestly I don't care about the team");
            assert!(analysis.concerns.contains(&CONCERN_DISMISSIVE.to_string()));
        }

        #[test]
        fn short_reply_is_flagged() {
            let analysis = BehaviorAnalysis::heuristic("Yes, sure.");
            assert_eq!(analysis.concerns, vec![CONCERN_SHORT_REPLY.to_string()]);
        }

        #[test]
        fn ordinary_answer_is_neutral() {
            let analysis = BehaviorAnalysis::heuristic(
                "I spent three years building payment services in Go",
            );

            assert_eq!(analysis.sentiment, Sentiment::Neutral);
            assert_eq!(analysis.motivation_level, MotivationLevel::Medium);
            assert_eq!(analysis.confidence.value(), 50);
            assert!(analysis.concerns.is_empty());
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn deserializes_with_float_confidence_and_missing_lists() {
            let analysis: BehaviorAnalysis = serde_json::from_str(
                r#"{"sentiment": "positive", "confidence": 82.6, "motivation_level": "high"}"#,
            )
            .unwrap();

            assert_eq!(analysis.sentiment, Sentiment::Positive);
            assert_eq!(analysis.confidence.value(), 83);
            assert!(analysis.concerns.is_empty());
        }

        #[test]
        fn confidence_above_hundred_is_clamped() {
            let analysis: BehaviorAnalysis =
                serde_json::from_str(r#"{"confidence": 400}"#).unwrap();
            assert_eq!(analysis.confidence, Percentage::HUNDRED);
        }
    }

    mod rollup {
        use super::*;

        fn entry(sentiment: Sentiment, markers: &[&str]) -> BehaviorEntry {
            let mut analysis = BehaviorAnalysis::heuristic("a perfectly normal answer here");
            analysis.sentiment = sentiment;
            analysis.behavioral_markers = markers.iter().map(|m| m.to_string()).collect();
            BehaviorEntry {
                message: "a perfectly normal answer here".to_string(),
                analysis,
                timestamp: Timestamp::now(),
            }
        }

        #[test]
        fn majority_sentiment_wins() {
            let log = vec![
                entry(Sentiment::Positive, &["structured"]),
                entry(Sentiment::Positive, &["structured", "concise"]),
                entry(Sentiment::Negative, &[]),
            ];
            let rollup = BehaviorRollup::aggregate(&log, &[]);

            assert_eq!(rollup.overall_sentiment, Sentiment::Positive);
            assert_eq!(rollup.patterns[0], "structured (2x)");
            assert!(rollup.recommendation.starts_with("Lean hire"));
        }

        #[test]
        fn tied_sentiment_is_neutral() {
            let log = vec![entry(Sentiment::Positive, &[]), entry(Sentiment::Negative, &[])];
            assert_eq!(
                BehaviorRollup::aggregate(&log, &[]).overall_sentiment,
                Sentiment::Neutral
            );
        }

        #[test]
        fn many_red_flags_lean_no_hire() {
            let flags: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
            let log = vec![entry(Sentiment::Negative, &[])];
            let rollup = BehaviorRollup::aggregate(&log, &flags);

            assert!(rollup.recommendation.starts_with("Lean no-hire"));
            assert_eq!(rollup.red_flags.len(), 3);
        }

        #[test]
        fn empty_log_makes_no_recommendation() {
            let rollup = BehaviorRollup::aggregate(&[], &[]);

            assert!(rollup.recommendation.is_empty());
            assert_eq!(rollup.overall_sentiment, Sentiment::Neutral);
            assert_eq!(rollup.feedback, "No answers were analyzed.");
        }
    }
}
