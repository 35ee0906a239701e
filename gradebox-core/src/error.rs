//! Error types for gradebox-core.

use thiserror::Error;

/// Pre-flight configuration failures. Raised before any request is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The bearer token environment variable is unset or empty.
    #[error("must set the {var} environment variable")]
    MissingToken { var: &'static str },

    /// Course identifiers are positive integers.
    #[error("invalid course id {0}: must be a positive integer")]
    InvalidCourseId(u64),
}
