//! Error types for the Attendance Penalty Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while classifying punches,
//! escalating violations and loading penalty policies.

use thiserror::Error;

use crate::history::HistoryLookupError;
use crate::models::ViolationCategory;

/// The main error type for the Attendance Penalty Engine.
///
/// The engine never substitutes a default when one of these occurs: every
/// variant is surfaced to the caller, who decides whether to skip, retry or
/// alert.
///
/// # Example
///
/// ```
/// use attendance_penalty_engine::error::EngineError;
///
/// let error = EngineError::InvalidInput {
///     field: "shift.start".to_string(),
///     message: "missing".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid input 'shift.start': missing");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Shift or punch data was malformed or missing.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// No severity table is configured for a category that produced a violation.
    #[error("No severity levels configured for '{category}'")]
    MissingConfiguration {
        /// The category without a severity table.
        category: ViolationCategory,
    },

    /// The injected violation history failed.
    #[error(transparent)]
    HistoryLookup(#[from] HistoryLookupError),

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but failed validation.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// A description of the validation failure.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an [`EngineError::InvalidConfiguration`].
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        EngineError::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
