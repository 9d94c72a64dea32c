//! Error types for parambind.
//!
//! Uses thiserror for structured errors with context. Binding errors are designed to:
//! - Be serializable so a failed result can be shipped to a caller as-is
//! - Name the offending parameter or field and what was expected
//! - Carry the exact diagnostic text surfaced by `ValidationResult::error_message`

use crate::validation::engine::Violation;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while binding raw inputs to a target operation.
///
/// Any of these aborts the whole validation: the orchestrator converts it
/// into a failed `ValidationResult` and no parameter values are returned.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BindingError {
    #[error("Out of range. There are only {actual} input parameters, but \"{parameter}\" takes parameter {position}.")]
    OutOfRange {
        parameter: String,
        /// One-based position the slot asked for.
        position: usize,
        actual: usize,
    },

    #[error("The type of parameter \"{parameter}\" does not match the type of the input parameter. An \"{expected}\" is expected, but \"{actual}\" is entered.")]
    TypeMismatch {
        parameter: String,
        expected: String,
        actual: String,
    },

    #[error("The number of parameters is not equal. {expected} parameters are expected, but {actual} parameters are obtained.")]
    CountMismatch { expected: usize, actual: usize },

    #[error("\"{text}\" is not a JSON string")]
    NotAJsonString { text: String },

    #[error("\"{text}\" cannot be converted to JSON. {reason}")]
    JsonParse { text: String, reason: String },

    #[error("Invalid JSON path \"{path}\": {reason}")]
    JsonPath { path: String, reason: String },

    #[error("The type of parameter \"{parameter}\" is not a structured record")]
    NotAStructuredRecord { parameter: String },

    #[error("{directive} supports only method parameters, but was found on field \"{element}\".")]
    UnsupportedElement { directive: String, element: String },

    #[error("{message}")]
    ConstraintViolation {
        message: String,
        violations: Vec<Violation>,
    },

    #[error("{message}")]
    CustomValidation { handler: String, message: String },

    #[error("Handler {handler} was invoked before being initialized with its directive")]
    NotInitialized { handler: String },

    #[error("Cannot encode record \"{record}\": {reason}")]
    Encoding { record: String, reason: String },
}

/// Coarse classification of a [`BindingError`], for callers that branch on
/// the failure category rather than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    OutOfRange,
    TypeMismatch,
    CountMismatch,
    NotAJsonString,
    JsonParseFailure,
    NotAStructuredRecord,
    ConstraintViolation,
    CustomValidationFailure,
    Misconfigured,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::OutOfRange => "out of range",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::CountMismatch => "count mismatch",
            ErrorKind::NotAJsonString => "not a JSON string",
            ErrorKind::JsonParseFailure => "JSON parse failure",
            ErrorKind::NotAStructuredRecord => "not a structured record",
            ErrorKind::ConstraintViolation => "constraint violation",
            ErrorKind::CustomValidationFailure => "custom validation failure",
            ErrorKind::Misconfigured => "misconfigured",
        };
        f.write_str(name)
    }
}

/// Errors from loading a [`ValidationConfig`](crate::core::config::ValidationConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unknown locale '{0}'")]
    UnknownLocale(String),
}

// ============================================================================
// Error Utilities
// ============================================================================

impl BindingError {
    /// Get the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BindingError::OutOfRange { .. } => ErrorKind::OutOfRange,
            BindingError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            BindingError::CountMismatch { .. } => ErrorKind::CountMismatch,
            BindingError::NotAJsonString { .. } => ErrorKind::NotAJsonString,
            BindingError::JsonParse { .. } | BindingError::JsonPath { .. } => {
                ErrorKind::JsonParseFailure
            }
            BindingError::NotAStructuredRecord { .. } => ErrorKind::NotAStructuredRecord,
            BindingError::ConstraintViolation { .. } => ErrorKind::ConstraintViolation,
            BindingError::CustomValidation { .. } => ErrorKind::CustomValidationFailure,
            BindingError::UnsupportedElement { .. }
            | BindingError::NotInitialized { .. }
            | BindingError::Encoding { .. } => ErrorKind::Misconfigured,
        }
    }

    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            BindingError::OutOfRange { parameter, position, .. } => Some(format!(
                "Supply at least {} inputs so that '{}' can be bound",
                position, parameter
            )),
            BindingError::CountMismatch { expected, .. } => {
                Some(format!("Supply exactly {} inputs", expected))
            }
            BindingError::TypeMismatch { parameter, expected, .. } => {
                Some(format!("Pass a value of type {} for '{}'", expected, parameter))
            }
            BindingError::NotAJsonString { .. } => {
                Some("Pass a JSON object or array".to_string())
            }
            BindingError::ConstraintViolation { violations, .. } => violations
                .first()
                .map(|v| format!("Adjust '{}'", v.field)),
            _ => None,
        }
    }

    /// Get the violations carried by a constraint failure.
    pub fn violations(&self) -> &[Violation] {
        match self {
            BindingError::ConstraintViolation { violations, .. } => violations,
            _ => &[],
        }
    }
}

/// Result type alias for binding operations.
pub type BindingResult<T> = Result<T, BindingError>;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_mismatch_message() {
        let error = BindingError::CountMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            error.to_string(),
            "The number of parameters is not equal. 4 parameters are expected, but 3 parameters are obtained."
        );
        assert_eq!(error.kind(), ErrorKind::CountMismatch);
    }

    #[test]
    fn test_out_of_range_names_parameter() {
        let error = BindingError::OutOfRange {
            parameter: "qq".to_string(),
            position: 4,
            actual: 3,
        };
        let message = error.to_string();
        assert!(message.contains("\"qq\""));
        assert!(message.contains("only 3 input parameters"));
        assert!(message.contains("parameter 4"));
    }

    #[test]
    fn test_suggestions() {
        let error = BindingError::CountMismatch {
            expected: 6,
            actual: 2,
        };
        assert!(error.suggested_fix().unwrap().contains('6'));

        let error = BindingError::NotInitialized {
            handler: "positional".to_string(),
        };
        assert!(error.suggested_fix().is_none());
        assert_eq!(error.kind(), ErrorKind::Misconfigured);
    }

    #[test]
    fn test_error_serializes() {
        let error = BindingError::NotAJsonString {
            text: "abc".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        let back: BindingError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, error);
    }
}
