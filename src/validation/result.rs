//! Validation outcome.

use crate::core::error::BindingError;
use crate::core::types::Value;
use serde::Serialize;

/// Outcome of one validation: either the bound values, in parameter order,
/// or the error that aborted binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    success: bool,
    error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<BindingError>,
    param_values: Vec<Value>,
}

impl ValidationResult {
    /// Successful result without values.
    pub fn success() -> Self {
        Self {
            success: true,
            error_message: None,
            error: None,
            param_values: Vec::new(),
        }
    }

    /// Successful result carrying the bound values.
    pub fn with_values(param_values: Vec<Value>) -> Self {
        Self {
            param_values,
            ..Self::success()
        }
    }

    /// Failed result. No values are carried.
    pub fn failure(error: BindingError) -> Self {
        Self {
            success: false,
            error_message: Some(error.to_string()),
            error: Some(error),
            param_values: Vec::new(),
        }
    }

    /// Whether binding succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Message of the aborting error.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// The aborting error.
    pub fn error(&self) -> Option<&BindingError> {
        self.error.as_ref()
    }

    /// Bound values in parameter order.
    pub fn param_values(&self) -> &[Value] {
        &self.param_values
    }

    /// Take the bound values.
    pub fn into_param_values(self) -> Vec<Value> {
        self.param_values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_has_no_values() {
        let result = ValidationResult::success();
        assert!(result.is_success());
        assert!(result.param_values().is_empty());
        assert!(result.error_message().is_none());
    }

    #[test]
    fn test_failure_carries_message() {
        let result = ValidationResult::failure(BindingError::CountMismatch {
            expected: 4,
            actual: 3,
        });
        assert!(!result.is_success());
        assert!(result.param_values().is_empty());
        assert_eq!(
            result.error_message(),
            Some("The number of parameters is not equal. 4 parameters are expected, but 3 parameters are obtained.")
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], serde_json::json!(false));
        assert!(json["error"].is_object());
    }
}
