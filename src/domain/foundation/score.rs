//! Score value object for competency-style ratings (1 to 5 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A rating on the 1..=5 scale. Construction always clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    /// Lowest score.
    pub const MIN: Self = Self(1);

    /// Highest score.
    pub const MAX: Self = Self(5);

    /// Creates a score from any integer, clamping into 1..=5.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(1, 5) as u8)
    }

    /// Creates a score from a possibly fractional value, rounding half away from zero.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self::clamped(value.round() as i64)
    }

    /// Running-average merge: `round((self + observed) / 2)`, clamped.
    pub fn merge(self, observed: Score) -> Score {
        let mean = (f64::from(self.0) + f64::from(observed.0)) / 2.0;
        Score::from_f64(mean)
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl From<u8> for Score {
    fn from(value: u8) -> Self {
        Self::clamped(i64::from(value))
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5", self.0)
    }
}
