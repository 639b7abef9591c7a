//! Interview engine tuning

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Generation parameters, context window and scheduling limits
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewConfig {
    #[serde(default = "default_reply_temperature")]
    pub reply_temperature: f32,

    #[serde(default = "default_reply_max_tokens")]
    pub reply_max_tokens: u32,

    #[serde(default = "default_extraction_temperature")]
    pub extraction_temperature: f32,

    #[serde(default = "default_extraction_max_tokens")]
    pub extraction_max_tokens: u32,

    /// Last N messages sent as reply context
    #[serde(default = "default_context_messages")]
    pub context_messages: usize,

    #[serde(default = "default_question_cache_ttl")]
    pub question_cache_ttl_secs: u64,

    /// Consecutive questions one module may own before the scheduler rotates
    #[serde(default = "default_repetition_limit")]
    pub repetition_limit: usize,

    /// Size of the focus history ring buffer
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

impl InterviewConfig {
    pub fn question_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.question_cache_ttl_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for temperature in [self.reply_temperature, self.extraction_temperature] {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ValidationError::InvalidTemperature);
            }
        }
        if self.repetition_limit == 0 {
            return Err(ValidationError::InvalidRepetitionLimit);
        }
        if self.history_capacity < self.repetition_limit {
            return Err(ValidationError::HistoryTooShort {
                capacity: self.history_capacity,
                limit: self.repetition_limit,
            });
        }
        Ok(())
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            reply_temperature: default_reply_temperature(),
            reply_max_tokens: default_reply_max_tokens(),
            extraction_temperature: default_extraction_temperature(),
            extraction_max_tokens: default_extraction_max_tokens(),
            context_messages: default_context_messages(),
            question_cache_ttl_secs: default_question_cache_ttl(),
            repetition_limit: default_repetition_limit(),
            history_capacity: default_history_capacity(),
        }
    }
}

fn default_reply_temperature() -> f32 {
    0.7
}

fn default_reply_max_tokens() -> u32 {
    300
}

fn default_extraction_temperature() -> f32 {
    0.2
}

fn default_extraction_max_tokens() -> u32 {
    600
}

fn default_context_messages() -> usize {
    8
}

fn default_question_cache_ttl() -> u64 {
    120
}

fn default_repetition_limit() -> usize {
    3
}

fn default_history_capacity() -> usize {
    6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = InterviewConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.context_messages, 8);
        assert_eq!(config.question_cache_ttl(), Duration::from_secs(120));
    }

    #[test]
    fn test_zero_repetition_limit_rejected() {
        let config = InterviewConfig {
            repetition_limit: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidRepetitionLimit));
    }

    #[test]
    fn test_history_must_cover_repetition_limit() {
        let config = InterviewConfig {
            repetition_limit: 4,
            history_capacity: 3,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::HistoryTooShort {
                capacity: 3,
                limit: 4
            })
        );
    }

    #[test]
    fn test_temperature_range() {
        let config = InterviewConfig {
            reply_temperature: 2.5,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTemperature));
    }
}
