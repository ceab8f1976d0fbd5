// Error types for the lip sync engine
//
// This module defines custom error types for configuration and rig-binding
// operations, providing structured error handling with error codes suitable
// for host-boundary communication.
//
// Classification, viseme mapping, and binding resolution deliberately have
// no error types: their failure modes are defined fallbacks (silence
// phoneme, dropped binding) and never cross the module boundary as errors.

mod config;
mod rig;

pub use config::{log_config_error, ConfigError, ConfigErrorCodes};
pub use rig::{log_rig_error, RigError, RigErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the host boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
