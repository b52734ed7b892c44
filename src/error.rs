//! Error types for the tempo scheduling crate.
//!
//! All fallible operations return [`Result`], backed by the unified
//! [`TempoError`] enum. Parse errors carry the 1-based source line and the
//! offending token so a multi-line specification can be diagnosed without
//! re-tokenizing it.

use thiserror::Error;

/// Main error type for tempo operations.
#[derive(Error, Debug)]
pub enum TempoError {
    // Specification parse errors
    #[error("line {line}: expected 5 time fields, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: invalid token '{token}': {reason}")]
    Syntax {
        line: usize,
        token: String,
        reason: String,
    },

    #[error("line {line}: value {value} is out of range [{min}, {max}] for {field}")]
    OutOfRange {
        line: usize,
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("line {line}: reversed range {lo}-{hi}")]
    ReversedRange { line: usize, lo: u32, hi: u32 },

    #[error("line {line}: invalid step '{step}'")]
    InvalidStep { line: usize, step: String },

    #[error("line {line}: malformed parameter '{token}': {reason}")]
    Parameter {
        line: usize,
        token: String,
        reason: String,
    },

    // Seed derivation errors
    #[error("cannot derive a seed from an empty owner identity")]
    SeedDerivation,

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TempoError {
    /// The 1-based specification line this error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            TempoError::FieldCount { line, .. }
            | TempoError::Syntax { line, .. }
            | TempoError::OutOfRange { line, .. }
            | TempoError::ReversedRange { line, .. }
            | TempoError::InvalidStep { line, .. }
            | TempoError::Parameter { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Whether this error was produced while parsing a specification.
    pub fn is_parse_error(&self) -> bool {
        self.line().is_some()
    }
}

/// Result type alias for tempo operations.
pub type Result<T> = std::result::Result<T, TempoError>;
