//! Error types for the acdat library
//!
//! Construction is the only fallible surface: matching never errors and
//! reports "no match" as an ordinary empty result.

use thiserror::Error;

/// Main error type for acdat operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcdatError {
    /// Resource limit exceeded (e.g., the transition table outgrew its budget)
    #[error("Resource limit exceeded: {0}")]
    ResourceLimitExceeded(String),

    /// Structural validation failed
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for acdat operations
pub type Result<T> = std::result::Result<T, AcdatError>;
