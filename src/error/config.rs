// Configuration error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Configuration error code constants exposed to the host
///
/// These constants provide a single source of truth for error codes shared
/// between this core and its embedding application.
///
/// Error code range: 2001-2005
pub struct ConfigErrorCodes {}

impl ConfigErrorCodes {
    /// Decay factor outside [0.0, 1.0)
    pub const DECAY_OUT_OF_RANGE: i32 = 2001;

    /// Confidence threshold outside [0.0, 1.0]
    pub const THRESHOLD_OUT_OF_RANGE: i32 = 2002;

    /// Max influencers cap is zero
    pub const MAX_INFLUENCERS_ZERO: i32 = 2003;

    /// Intensity scale outside (0.0, 1.0]
    pub const INTENSITY_OUT_OF_RANGE: i32 = 2004;

    /// A classifier tuning constant is outside its documented range
    pub const TUNING_OUT_OF_RANGE: i32 = 2005;

    /// A classification rule table entry is malformed
    pub const RULE_INVALID: i32 = 2006;
}

/// Log a configuration error with structured context
pub fn log_config_error(err: &ConfigError, context: &str) {
    error!(
        "[Config] error in {}: code={}, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Configuration errors
///
/// Invalid values are rejected at configuration time with a descriptive
/// error. They are never silently clamped into range.
///
/// Error code range: 2001-2005
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Decay factor must lie in [0.0, 1.0)
    DecayOutOfRange { value: f32 },

    /// Confidence threshold must lie in [0.0, 1.0]
    ThresholdOutOfRange { value: f32 },

    /// Max influencers must be at least 1
    MaxInfluencersZero,

    /// Intensity scale must lie in (0.0, 1.0]
    IntensityOutOfRange { value: f32 },

    /// A classifier tuning constant is out of range
    TuningOutOfRange { name: &'static str, value: f32 },

    /// A classification rule table entry is malformed
    RuleInvalid { reason: String },
}

impl ErrorCode for ConfigError {
    fn code(&self) -> i32 {
        match self {
            ConfigError::DecayOutOfRange { .. } => ConfigErrorCodes::DECAY_OUT_OF_RANGE,
            ConfigError::ThresholdOutOfRange { .. } => ConfigErrorCodes::THRESHOLD_OUT_OF_RANGE,
            ConfigError::MaxInfluencersZero => ConfigErrorCodes::MAX_INFLUENCERS_ZERO,
            ConfigError::IntensityOutOfRange { .. } => ConfigErrorCodes::INTENSITY_OUT_OF_RANGE,
            ConfigError::TuningOutOfRange { .. } => ConfigErrorCodes::TUNING_OUT_OF_RANGE,
            ConfigError::RuleInvalid { .. } => ConfigErrorCodes::RULE_INVALID,
        }
    }

    fn message(&self) -> String {
        match self {
            ConfigError::DecayOutOfRange { value } => {
                format!("Decay factor must be in [0.0, 1.0) (got {})", value)
            }
            ConfigError::ThresholdOutOfRange { value } => {
                format!("Confidence threshold must be in [0.0, 1.0] (got {})", value)
            }
            ConfigError::MaxInfluencersZero => {
                "Max influencers must be at least 1".to_string()
            }
            ConfigError::IntensityOutOfRange { value } => {
                format!("Intensity scale must be in (0.0, 1.0] (got {})", value)
            }
            ConfigError::TuningOutOfRange { name, value } => {
                format!("Tuning constant {} out of range (got {})", name, value)
            }
            ConfigError::RuleInvalid { reason } => {
                format!("Invalid classification rule: {}", reason)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConfigError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_codes() {
        assert_eq!(
            ConfigError::DecayOutOfRange { value: -0.1 }.code(),
            ConfigErrorCodes::DECAY_OUT_OF_RANGE
        );
        assert_eq!(
            ConfigError::ThresholdOutOfRange { value: 1.5 }.code(),
            ConfigErrorCodes::THRESHOLD_OUT_OF_RANGE
        );
        assert_eq!(
            ConfigError::MaxInfluencersZero.code(),
            ConfigErrorCodes::MAX_INFLUENCERS_ZERO
        );
        assert_eq!(
            ConfigError::IntensityOutOfRange { value: 0.0 }.code(),
            ConfigErrorCodes::INTENSITY_OUT_OF_RANGE
        );
        assert_eq!(
            ConfigError::TuningOutOfRange {
                name: "fuzzy_band_boost",
                value: 9.0
            }
            .code(),
            ConfigErrorCodes::TUNING_OUT_OF_RANGE
        );
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::DecayOutOfRange { value: 1.0 };
        assert!(err.message().contains("[0.0, 1.0)"));
        assert!(err.message().contains('1'));

        let err = ConfigError::MaxInfluencersZero;
        assert!(err.message().contains("at least 1"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ThresholdOutOfRange { value: -0.2 };
        let display = format!("{}", err);
        assert!(display.contains("ConfigError"));
        assert!(display.contains(&err.code().to_string()));
    }
}
