//! Error types and handling
//!
//! Domain-specific error types for configuration and parameter handling.
//! Remote operation failures are deliberately NOT part of this taxonomy:
//! per the lifecycle contract they are reported as [`crate::status::Status`]
//! values, never raised as errors. Only structural misconfiguration is fatal.

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file parsing error
    #[error("Failed to parse environment config: {message}")]
    Parsing { message: String },

    /// Configuration validation error
    #[error("Environment config validation error: {message}")]
    Validation { message: String },

    /// Configuration file I/O error
    #[error("Failed to read environment config file")]
    Io(#[from] std::io::Error),

    /// Configuration file not found
    #[error("Environment config file not found: {path}")]
    NotFound { path: String },
}

/// Tunable-parameter errors
#[derive(Error, Debug)]
pub enum TunableError {
    /// Malformed `name=value` assignment
    #[error("Invalid tunable assignment '{assignment}': expected name=value")]
    InvalidAssignment { assignment: String },
}

/// Main error enum wrapping all domain-specific errors
#[derive(Error, Debug)]
pub enum RembenchError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tunable-parameter errors
    #[error("Tunable error: {0}")]
    Tunable(#[from] TunableError),
}

/// Convenience type alias for Results with RembenchError
pub type Result<T> = std::result::Result<T, RembenchError>;
