//! Interview settings and the target-question table they drive.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::module::ModuleKind;

/// Shortest advisory duration accepted, in minutes.
pub const MIN_DURATION_MINUTES: u32 = 5;

/// Longest advisory duration accepted, in minutes.
pub const MAX_DURATION_MINUTES: u32 = 180;

/// Maximum number of focus-area hints kept.
pub const MAX_FOCUS_AREAS: usize = 10;

/// Seniority level the interview is pitched at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Junior,
    #[default]
    Middle,
    Senior,
}

impl Difficulty {
    /// Human-readable label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Junior => "junior",
            Self::Middle => "middle",
            Self::Senior => "senior",
        }
    }

    /// Adjustment applied to the professional track's question target.
    fn professional_adjustment(&self) -> i32 {
        match self {
            Self::Junior => -1,
            Self::Middle => 0,
            Self::Senior => 1,
        }
    }
}

/// Interview breadth; controls how many questions each module asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStyle {
    Comprehensive,
    #[default]
    Focused,
    Quick,
}

impl InterviewStyle {
    /// Base question count per module kind before difficulty adjustment.
    fn base_target(&self, kind: ModuleKind) -> u32 {
        use ModuleKind::*;
        match (self, kind) {
            (Self::Comprehensive, Professional) => 6,
            (Self::Comprehensive, Personality) => 4,
            (Self::Comprehensive, Competency) => 5,
            (Self::Comprehensive, PeerObservation) => 4,
            (Self::Comprehensive, Profile) => 3,

            (Self::Focused, Professional) => 4,
            (Self::Focused, Personality) => 3,
            (Self::Focused, Competency) => 3,
            (Self::Focused, PeerObservation) => 3,
            (Self::Focused, Profile) => 2,

            (Self::Quick, Professional) => 3,
            (Self::Quick, Personality) => 2,
            (Self::Quick, Competency) => 2,
            (Self::Quick, PeerObservation) => 2,
            (Self::Quick, Profile) => 1,
        }
    }
}

/// Settings chosen when a session is created. Immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSettings {
    pub difficulty: Difficulty,
    /// Advisory duration in minutes. The engine never enforces it.
    pub duration_minutes: u32,
    pub style: InterviewStyle,
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            duration_minutes: 20,
            style: InterviewStyle::default(),
            focus_areas: Vec::new(),
        }
    }
}

impl InterviewSettings {
    /// Creates settings with the given difficulty and style and default duration.
    pub fn new(difficulty: Difficulty, style: InterviewStyle) -> Self {
        Self {
            difficulty,
            style,
            ..Default::default()
        }
    }

    /// Sets the advisory duration.
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    /// Sets the focus-area hints.
    pub fn with_focus_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.focus_areas = areas.into_iter().map(Into::into).collect();
        self
    }

    /// Validates and normalizes the settings.
    ///
    /// Focus areas are trimmed, blanks dropped, and the list truncated.
    pub fn normalized(mut self) -> Result<Self, ValidationError> {
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&self.duration_minutes) {
            return Err(ValidationError::out_of_range(
                "duration_minutes",
                MIN_DURATION_MINUTES as i32,
                MAX_DURATION_MINUTES as i32,
                self.duration_minutes.min(i32::MAX as u32) as i32,
            ));
        }

        self.focus_areas = self
            .focus_areas
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .take(MAX_FOCUS_AREAS)
            .collect();

        Ok(self)
    }

    /// Number of questions the given module must ask before it completes.
    pub fn target_questions(&self, kind: ModuleKind) -> u32 {
        let base = self.style.base_target(kind);
        if kind != ModuleKind::Professional {
            return base;
        }
        (base as i32 + self.difficulty.professional_adjustment()).max(1) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_middle_targets_match_table() {
        let settings = InterviewSettings::new(Difficulty::Middle, InterviewStyle::Quick);

        assert_eq!(settings.target_questions(ModuleKind::Professional), 3);
        assert_eq!(settings.target_questions(ModuleKind::Personality), 2);
        assert_eq!(settings.target_questions(ModuleKind::Competency), 2);
        assert_eq!(settings.target_questions(ModuleKind::PeerObservation), 2);
        assert_eq!(settings.target_questions(ModuleKind::Profile), 1);
    }

    #[test]
    fn difficulty_only_moves_professional_track() {
        let junior = InterviewSettings::new(Difficulty::Junior, InterviewStyle::Comprehensive);
        let senior = InterviewSettings::new(Difficulty::Senior, InterviewStyle::Comprehensive);

        assert_eq!(junior.target_questions(ModuleKind::Professional), 5);
        assert_eq!(senior.target_questions(ModuleKind::Professional), 7);
        assert_eq!(
            junior.target_questions(ModuleKind::Competency),
            senior.target_questions(ModuleKind::Competency)
        );
    }

    #[test]
    fn professional_target_never_drops_below_one() {
        let settings = InterviewSettings::new(Difficulty::Junior, InterviewStyle::Quick);
        assert_eq!(settings.target_questions(ModuleKind::Professional), 2);
    }

    #[test]
    fn normalized_trims_and_drops_blank_focus_areas() {
        let settings = InterviewSettings::default()
            .with_focus_areas(["  rust ", "", "   ", "distributed systems"])
            .normalized()
            .unwrap();

        assert_eq!(settings.focus_areas, vec!["rust", "distributed systems"]);
    }

    #[test]
    fn normalized_caps_focus_area_count() {
        let areas: Vec<String> = (0..15).map(|i| format!("area-{}", i)).collect();
        let settings = InterviewSettings::default()
            .with_focus_areas(areas)
            .normalized()
            .unwrap();

        assert_eq!(settings.focus_areas.len(), MAX_FOCUS_AREAS);
    }

    #[test]
    fn normalized_rejects_out_of_range_duration() {
        assert!(InterviewSettings::default().with_duration(2).normalized().is_err());
        assert!(InterviewSettings::default().with_duration(500).normalized().is_err());
        assert!(InterviewSettings::default().with_duration(15).normalized().is_ok());
    }

    #[test]
    fn style_deserializes_from_snake_case() {
        let style: InterviewStyle = serde_json::from_str("\"quick\"").unwrap();
        assert_eq!(style, InterviewStyle::Quick);
    }
}
