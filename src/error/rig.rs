// Rig binding and orchestrator state errors

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Rig error code constants exposed to the host
///
/// Error code range: 3001-3006
pub struct RigErrorCodes {}

impl RigErrorCodes {
    /// No model is bound
    pub const NOT_BOUND: i32 = 3001;

    /// A model is already bound
    pub const ALREADY_BOUND: i32 = 3002;

    /// The bound model exposes no morph targets at all
    pub const NO_MORPH_TARGETS: i32 = 3003;

    /// Operation requires the Ready state
    pub const NOT_READY: i32 = 3004;

    /// A sequence is already playing
    pub const ALREADY_PLAYING: i32 = 3005;

    /// The submitted phoneme sequence is empty
    pub const EMPTY_SEQUENCE: i32 = 3006;
}

/// Log a rig error with structured context
pub fn log_rig_error(err: &RigError, context: &str) {
    error!(
        "[Engine] rig error in {}: code={}, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Renderer-boundary and state-transition errors
///
/// These are the only failures surfaced to the caller: everything inside the
/// classification/resolution pipeline recovers locally with documented
/// fallbacks. A failed transition leaves the engine in its previous state so
/// the caller can retry (e.g. once the mesh finishes loading).
///
/// Error code range: 3001-3006
#[derive(Debug, Clone, PartialEq)]
pub enum RigError {
    /// No model is bound; bind_model() first
    NotBound,

    /// A model is already bound; stop() first
    AlreadyBound,

    /// The morph target directory is empty (mesh not loaded yet?)
    NoMorphTargets,

    /// Operation requires the Ready state
    NotReady { state: String },

    /// A timed sequence is already playing
    AlreadyPlaying,

    /// The submitted phoneme sequence contains no entries
    EmptySequence,
}

impl ErrorCode for RigError {
    fn code(&self) -> i32 {
        match self {
            RigError::NotBound => RigErrorCodes::NOT_BOUND,
            RigError::AlreadyBound => RigErrorCodes::ALREADY_BOUND,
            RigError::NoMorphTargets => RigErrorCodes::NO_MORPH_TARGETS,
            RigError::NotReady { .. } => RigErrorCodes::NOT_READY,
            RigError::AlreadyPlaying => RigErrorCodes::ALREADY_PLAYING,
            RigError::EmptySequence => RigErrorCodes::EMPTY_SEQUENCE,
        }
    }

    fn message(&self) -> String {
        match self {
            RigError::NotBound => {
                "No model bound. Call bind_model() first.".to_string()
            }
            RigError::AlreadyBound => {
                "A model is already bound. Call stop() before rebinding.".to_string()
            }
            RigError::NoMorphTargets => {
                "Bound model exposes no morph targets; is the mesh loaded?".to_string()
            }
            RigError::NotReady { state } => {
                format!("Operation requires the Ready state (currently {})", state)
            }
            RigError::AlreadyPlaying => {
                "A phoneme sequence is already playing. Call stop() first.".to_string()
            }
            RigError::EmptySequence => {
                "Phoneme sequence contains no entries".to_string()
            }
        }
    }
}

impl fmt::Display for RigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RigError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for RigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rig_error_codes() {
        assert_eq!(RigError::NotBound.code(), RigErrorCodes::NOT_BOUND);
        assert_eq!(RigError::AlreadyBound.code(), RigErrorCodes::ALREADY_BOUND);
        assert_eq!(
            RigError::NoMorphTargets.code(),
            RigErrorCodes::NO_MORPH_TARGETS
        );
        assert_eq!(
            RigError::NotReady {
                state: "Idle".to_string()
            }
            .code(),
            RigErrorCodes::NOT_READY
        );
        assert_eq!(
            RigError::AlreadyPlaying.code(),
            RigErrorCodes::ALREADY_PLAYING
        );
        assert_eq!(RigError::EmptySequence.code(), RigErrorCodes::EMPTY_SEQUENCE);
    }

    #[test]
    fn test_rig_error_messages() {
        assert!(RigError::NotBound.message().contains("bind_model"));
        assert!(RigError::NoMorphTargets.message().contains("morph targets"));

        let err = RigError::NotReady {
            state: "Warming".to_string(),
        };
        assert!(err.message().contains("Warming"));
    }
}
