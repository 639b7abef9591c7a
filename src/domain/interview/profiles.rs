//! Accumulated module outputs and their merge rules.
//!
//! Every profile only grows: merges add or average evidence, and nothing
//! observed earlier is ever dropped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{Percentage, Score};

/// Skill tag used when professional evidence names no skill.
pub const GENERAL_SKILL: &str = "general";

// ════════════════════════════════════════════════════════════════════════════════
// Running average
// ════════════════════════════════════════════════════════════════════════════════

/// Incremental mean over 0–100 scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RunningAverage {
    pub mean: f64,
    pub count: u32,
}

impl RunningAverage {
    pub fn observe(&mut self, value: f64) {
        self.count += 1;
        self.mean += (value - self.mean) / f64::from(self.count);
    }
}

fn clamp_score_100(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Professional knowledge
// ════════════════════════════════════════════════════════════════════════════════

/// Evaluation criteria for a technical answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    TechnicalCorrectness,
    Completeness,
    Clarity,
    PracticalGrounding,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::TechnicalCorrectness,
        Criterion::Completeness,
        Criterion::Clarity,
        Criterion::PracticalGrounding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TechnicalCorrectness => "technical_correctness",
            Self::Completeness => "completeness",
            Self::Clarity => "clarity",
            Self::PracticalGrounding => "practical_grounding",
        }
    }
}

/// One scored answer, as returned by the collaborator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfessionalEvidence {
    pub score: f64,
    pub skills: Vec<String>,
    pub criteria: BTreeMap<Criterion, f64>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProfessionalProfile {
    pub overall: RunningAverage,
    pub skills: BTreeMap<String, RunningAverage>,
    pub criteria: BTreeMap<Criterion, RunningAverage>,
    #[serde(default)]
    pub feedback: Vec<String>,
    #[serde(default)]
    pub placeholder: bool,
}

impl ProfessionalProfile {
    pub fn merge(&mut self, evidence: &ProfessionalEvidence) {
        let score = clamp_score_100(evidence.score);
        self.overall.observe(score);

        let mut tagged = false;
        for skill in &evidence.skills {
            let tag = skill.trim().to_lowercase();
            if tag.is_empty() {
                continue;
            }
            self.skills.entry(tag).or_default().observe(score);
            tagged = true;
        }
        if !tagged {
            self.skills
                .entry(GENERAL_SKILL.to_string())
                .or_default()
                .observe(score);
        }

        for (criterion, value) in &evidence.criteria {
            self.criteria
                .entry(*criterion)
                .or_default()
                .observe(clamp_score_100(*value));
        }

        if let Some(feedback) = evidence.feedback.as_deref().map(str::trim) {
            if !feedback.is_empty() {
                self.feedback.push(feedback.to_string());
            }
        }

        self.placeholder = false;
    }

    /// Number of answers that have been scored.
    pub fn answers_evaluated(&self) -> u32 {
        self.overall.count
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Personality typing
// ════════════════════════════════════════════════════════════════════════════════

/// The four opposing axis pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalityAxis {
    ExtraversionIntroversion,
    SensingIntuition,
    ThinkingFeeling,
    JudgingPerceiving,
}

impl PersonalityAxis {
    pub const ALL: [PersonalityAxis; 4] = [
        PersonalityAxis::ExtraversionIntroversion,
        PersonalityAxis::SensingIntuition,
        PersonalityAxis::ThinkingFeeling,
        PersonalityAxis::JudgingPerceiving,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExtraversionIntroversion => "extraversion_introversion",
            Self::SensingIntuition => "sensing_intuition",
            Self::ThinkingFeeling => "thinking_feeling",
            Self::JudgingPerceiving => "judging_perceiving",
        }
    }

    /// (positive letter, negative letter)
    pub fn letters(&self) -> (char, char) {
        match self {
            Self::ExtraversionIntroversion => ('E', 'I'),
            Self::SensingIntuition => ('S', 'N'),
            Self::ThinkingFeeling => ('T', 'F'),
            Self::JudgingPerceiving => ('J', 'P'),
        }
    }
}

/// Per-utterance trait pressure. Positive values favor the first letter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TraitEvidence(pub BTreeMap<PersonalityAxis, f64>);

impl TraitEvidence {
    pub fn get(&self, axis: PersonalityAxis) -> f64 {
        self.0
            .get(&axis)
            .copied()
            .filter(|v| !v.is_nan())
            .unwrap_or(0.0)
            .clamp(-1.0, 1.0)
    }
}

/// Resolved four-letter type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityType {
    pub code: String,
    pub confidence: Percentage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PersonalityProfile {
    pub pressure: BTreeMap<PersonalityAxis, f64>,
    pub observations: u32,
    #[serde(default)]
    pub placeholder: bool,
}

impl PersonalityProfile {
    pub fn merge(&mut self, evidence: &TraitEvidence) {
        for axis in PersonalityAxis::ALL {
            *self.pressure.entry(axis).or_insert(0.0) += evidence.get(axis);
        }
        self.observations += 1;
        self.placeholder = false;
    }

    /// Converts accumulated pressure into a best-fit type.
    ///
    /// Zero pressure on an axis resolves to its second letter.
    pub fn resolve(&self) -> PersonalityType {
        let mut code = String::with_capacity(4);
        let mut certainty = 0.0;

        for axis in PersonalityAxis::ALL {
            let pressure = self.pressure.get(&axis).copied().unwrap_or(0.0);
            let (positive, negative) = axis.letters();
            code.push(if pressure > 0.0 { positive } else { negative });

            if self.observations > 0 {
                certainty += (pressure.abs() / f64::from(self.observations)).min(1.0);
            }
        }

        let mean = certainty / PersonalityAxis::ALL.len() as f64;
        PersonalityType {
            code,
            confidence: Percentage::new((mean * 100.0).round() as u8),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Competency and peer observation
// ════════════════════════════════════════════════════════════════════════════════

/// Fixed competency taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Competency {
    Teamwork,
    Communication,
    ProblemSolving,
    TimeManagement,
    SelfDevelopment,
    Leadership,
    Adaptability,
    Responsibility,
}

impl Competency {
    pub const ALL: [Competency; 8] = [
        Competency::Teamwork,
        Competency::Communication,
        Competency::ProblemSolving,
        Competency::TimeManagement,
        Competency::SelfDevelopment,
        Competency::Leadership,
        Competency::Adaptability,
        Competency::Responsibility,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Teamwork => "teamwork",
            Self::Communication => "communication",
            Self::ProblemSolving => "problem_solving",
            Self::TimeManagement => "time_management",
            Self::SelfDevelopment => "self_development",
            Self::Leadership => "leadership",
            Self::Adaptability => "adaptability",
            Self::Responsibility => "responsibility",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        let id = id.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL.into_iter().find(|c| c.as_str() == id)
    }
}

/// Peer-observation dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerDimension {
    Teamwork,
    Communication,
    Leadership,
    Adaptability,
    Collaboration,
}

impl PeerDimension {
    pub const ALL: [PeerDimension; 5] = [
        PeerDimension::Teamwork,
        PeerDimension::Communication,
        PeerDimension::Leadership,
        PeerDimension::Adaptability,
        PeerDimension::Collaboration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Teamwork => "teamwork",
            Self::Communication => "communication",
            Self::Leadership => "leadership",
            Self::Adaptability => "adaptability",
            Self::Collaboration => "collaboration",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        let id = id.trim().to_lowercase();
        Self::ALL.into_iter().find(|d| d.as_str() == id)
    }
}

/// Competency id → score on the 1–5 scale.
pub type CompetencyScores = BTreeMap<Competency, Score>;

/// Merges observations into a score map with the running-average rule.
pub fn merge_scores<K: Ord + Copy>(scores: &mut BTreeMap<K, Score>, observed: &BTreeMap<K, Score>) {
    for (key, value) in observed {
        scores
            .entry(*key)
            .and_modify(|current| *current = current.merge(*value))
            .or_insert(*value);
    }
}

/// Competency observations from one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompetencyEvidence {
    pub scores: BTreeMap<Competency, Score>,
}

/// Peer-observation evidence from one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PeerEvidence {
    pub scores: BTreeMap<PeerDimension, Score>,
    pub observation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PeerObservation {
    pub scores: BTreeMap<PeerDimension, Score>,
    pub observations: Vec<String>,
    #[serde(default)]
    pub placeholder: bool,
}

impl PeerObservation {
    pub fn merge(&mut self, evidence: &PeerEvidence) {
        merge_scores(&mut self.scores, &evidence.scores);

        if let Some(observation) = evidence.observation.as_deref().map(str::trim) {
            if !observation.is_empty() {
                self.observations.push(observation.to_string());
            }
        }

        self.placeholder = false;
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Candidate profile
// ════════════════════════════════════════════════════════════════════════════════

/// Facts extracted from one utterance. Every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct CandidateFacts {
    pub name: Option<String>,
    pub position: Option<String>,
    pub years_of_experience: Option<f64>,
    pub skills: Vec<String>,
    pub achievements: Vec<String>,
    pub goals: Vec<String>,
    pub personal_qualities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CandidateProfile {
    pub name: Option<String>,
    pub position: Option<String>,
    pub years_of_experience: Option<f64>,
    pub skills: Vec<String>,
    pub achievements: Vec<String>,
    pub goals: Vec<String>,
    pub personal_qualities: Vec<String>,
    #[serde(default)]
    pub placeholder: bool,
}

impl CandidateProfile {
    pub fn merge(&mut self, facts: &CandidateFacts) {
        if let Some(name) = non_blank(&facts.name) {
            self.name = Some(name);
        }
        if let Some(position) = non_blank(&facts.position) {
            self.position = Some(position);
        }
        if let Some(years) = facts.years_of_experience.filter(|y| y.is_finite() && *y >= 0.0) {
            self.years_of_experience = Some(years);
        }

        append_unique(&mut self.skills, &facts.skills);
        append_unique(&mut self.achievements, &facts.achievements);
        append_unique(&mut self.goals, &facts.goals);
        append_unique(&mut self.personal_qualities, &facts.personal_qualities);

        self.placeholder = false;
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Appends items not already present, compared case-insensitively.
fn append_unique(target: &mut Vec<String>, items: &[String]) {
    for item in items {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let lowered = item.to_lowercase();
        if !target.iter().any(|existing| existing.to_lowercase() == lowered) {
            target.push(item.to_string());
        }
    }
}
