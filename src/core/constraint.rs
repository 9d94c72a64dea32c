//! Declarative field-level constraints.
//!
//! Constraints are attached to operation parameters and record fields and
//! checked by the constraint engine after a value has been bound. Null values
//! satisfy every constraint except `Required`, `NotBlank` and `NotEmpty`.

use crate::core::config::Locale;
use crate::core::types::Value;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Largest bound printed for an open-ended size constraint.
pub const SIZE_UNBOUNDED: usize = i32::MAX as usize;

/// Constraints that can be applied to parameter/field values.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "params")]
pub enum Constraint {
    /// Value must not be null
    Required,
    /// String must contain at least one non-whitespace character
    NotBlank,
    /// String/list/JSON container must not be empty
    NotEmpty,

    /// Numeric value must be >= min
    MinValue(f64),
    /// Numeric value must be <= max
    MaxValue(f64),
    /// Numeric value must be within range [min, max]
    Range { min: f64, max: f64 },
    /// Numeric value must be > 0
    Positive,
    /// Numeric value must be >= 0
    NonNegative,

    /// String/list length must be within [min, max]
    Size { min: usize, max: usize },
    /// String must match the regex pattern in full
    Pattern(String),
    /// Value must equal one of the specified options
    OneOf(Vec<Value>),

    /// Custom constraint with validation function
    /// Note: The closure is skipped during serialization
    #[serde(skip)]
    Custom {
        name: String,
        message: String,
        validator: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
    },
}

impl std::fmt::Debug for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Required => write!(f, "Required"),
            Constraint::NotBlank => write!(f, "NotBlank"),
            Constraint::NotEmpty => write!(f, "NotEmpty"),
            Constraint::MinValue(v) => f.debug_tuple("MinValue").field(v).finish(),
            Constraint::MaxValue(v) => f.debug_tuple("MaxValue").field(v).finish(),
            Constraint::Range { min, max } => f
                .debug_struct("Range")
                .field("min", min)
                .field("max", max)
                .finish(),
            Constraint::Positive => write!(f, "Positive"),
            Constraint::NonNegative => write!(f, "NonNegative"),
            Constraint::Size { min, max } => f
                .debug_struct("Size")
                .field("min", min)
                .field("max", max)
                .finish(),
            Constraint::Pattern(p) => f.debug_tuple("Pattern").field(p).finish(),
            Constraint::OneOf(v) => f.debug_tuple("OneOf").field(v).finish(),
            Constraint::Custom { name, message, .. } => f
                .debug_struct("Custom")
                .field("name", name)
                .field("message", message)
                .field("validator", &"<closure>")
                .finish(),
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl Constraint {
    /// Length must be at most `max`.
    pub fn max_size(max: usize) -> Self {
        Constraint::Size { min: 0, max }
    }

    /// Length must be at least `min`.
    pub fn min_size(min: usize) -> Self {
        Constraint::Size {
            min,
            max: SIZE_UNBOUNDED,
        }
    }

    /// Integer value must be one of `values`.
    pub fn one_of_integers(values: impl IntoIterator<Item = i64>) -> Self {
        Constraint::OneOf(values.into_iter().map(Value::Integer).collect())
    }

    /// Build a custom constraint.
    pub fn custom<F>(name: impl Into<String>, message: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Constraint::Custom {
            name: name.into(),
            message: message.into(),
            validator: Arc::new(validator),
        }
    }
}

// ============================================================================
// Constraint Validation
// ============================================================================

impl Constraint {
    /// Validate a value against this constraint.
    ///
    /// On failure returns the message in `locale`, without the field name.
    pub fn validate(&self, value: &Value, locale: Locale) -> Result<(), String> {
        if self.is_satisfied_by(value) {
            Ok(())
        } else {
            Err(self.message(locale))
        }
    }

    /// Whether the engine should decorate the message with field name and
    /// invalid value. Custom messages are surfaced as written.
    pub fn is_templated(&self) -> bool {
        !matches!(self, Constraint::Custom { .. })
    }

    fn is_satisfied_by(&self, value: &Value) -> bool {
        match self {
            Constraint::Required => !value.is_null(),
            Constraint::NotBlank => value.as_str().is_some_and(|s| !s.trim().is_empty()),
            Constraint::NotEmpty => value.size().is_some_and(|len| len > 0),
            Constraint::Custom { validator, .. } => validator(value),
            _ if value.is_null() => true,

            Constraint::MinValue(min) => value.as_float().map_or(true, |n| n >= *min),
            Constraint::MaxValue(max) => value.as_float().map_or(true, |n| n <= *max),
            Constraint::Range { min, max } => {
                value.as_float().map_or(true, |n| n >= *min && n <= *max)
            }
            Constraint::Positive => value.as_float().map_or(true, |n| n > 0.0),
            Constraint::NonNegative => value.as_float().map_or(true, |n| n >= 0.0),

            Constraint::Size { min, max } => {
                value.size().map_or(true, |len| len >= *min && len <= *max)
            }
            Constraint::Pattern(pattern) => match value.as_str() {
                Some(s) => match Regex::new(&format!("^(?:{})$", pattern)) {
                    Ok(re) => re.is_match(s),
                    Err(error) => {
                        log::warn!("Invalid pattern '{}': {}", pattern, error);
                        false
                    }
                },
                None => true,
            },
            Constraint::OneOf(options) => options.iter().any(|opt| opt == value),
        }
    }

    /// Get the violation message for this constraint.
    pub fn message(&self, locale: Locale) -> String {
        match locale {
            Locale::English => self.message_en(),
            Locale::Chinese => self.message_zh(),
        }
    }

    fn message_en(&self) -> String {
        match self {
            Constraint::Required => "must not be null".to_string(),
            Constraint::NotBlank => "must not be blank".to_string(),
            Constraint::NotEmpty => "must not be empty".to_string(),
            Constraint::MinValue(min) => format!("must be greater than or equal to {}", min),
            Constraint::MaxValue(max) => format!("must be less than or equal to {}", max),
            Constraint::Range { min, max } => format!("must be between {} and {}", min, max),
            Constraint::Positive => "must be greater than 0".to_string(),
            Constraint::NonNegative => "must be greater than or equal to 0".to_string(),
            Constraint::Size { min, max } => format!("size must be between {} and {}", min, max),
            Constraint::Pattern(p) => format!("must match \"{}\"", p),
            Constraint::OneOf(options) => format!("must be one of {}", list_options(options)),
            Constraint::Custom { message, .. } => message.clone(),
        }
    }

    fn message_zh(&self) -> String {
        match self {
            Constraint::Required => "不能为null".to_string(),
            Constraint::NotBlank => "不能为空".to_string(),
            Constraint::NotEmpty => "不能为空".to_string(),
            Constraint::MinValue(min) => format!("最小不能小于{}", min),
            Constraint::MaxValue(max) => format!("最大不能超过{}", max),
            Constraint::Range { min, max } => format!("需要在{}和{}之间", min, max),
            Constraint::Positive => "必须是正数".to_string(),
            Constraint::NonNegative => "必须是正数或零".to_string(),
            Constraint::Size { min, max } => format!("个数必须在{}和{}之间", min, max),
            Constraint::Pattern(p) => format!("需要匹配正则表达式\"{}\"", p),
            Constraint::OneOf(options) => format!("只能取值{}", list_options(options)),
            Constraint::Custom { message, .. } => message.clone(),
        }
    }

    /// Get a human-readable description of this constraint.
    pub fn description(&self) -> String {
        match self {
            Constraint::Required => "Required".to_string(),
            Constraint::NotBlank => "Cannot be blank".to_string(),
            Constraint::NotEmpty => "Cannot be empty".to_string(),
            Constraint::MinValue(min) => format!("Must be at least {}", min),
            Constraint::MaxValue(max) => format!("Must be at most {}", max),
            Constraint::Range { min, max } => format!("Must be between {} and {}", min, max),
            Constraint::Positive => "Must be positive".to_string(),
            Constraint::NonNegative => "Must be non-negative".to_string(),
            Constraint::Size { min, max } => format!("Length between {} and {}", min, max),
            Constraint::Pattern(p) => format!("Must match pattern: {}", p),
            Constraint::OneOf(options) => format!("One of {} options", options.len()),
            Constraint::Custom { name, .. } => name.clone(),
        }
    }
}

fn list_options(options: &[Value]) -> String {
    let items: Vec<String> = options.iter().map(|o| o.to_string()).collect();
    format!("[{}]", items.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EN: Locale = Locale::English;

    #[test]
    fn test_range_validation() {
        let constraint = Constraint::Range { min: 10.0, max: 20.0 };

        assert!(constraint.validate(&Value::Integer(10), EN).is_ok());
        assert!(constraint.validate(&Value::Integer(20), EN).is_ok());
        assert!(constraint.validate(&Value::Integer(9), EN).is_err());
        assert!(constraint.validate(&Value::Float(20.5), EN).is_err());
        assert!(constraint.validate(&Value::Null, EN).is_ok());
    }

    #[test]
    fn test_min_max_messages() {
        let err = Constraint::MinValue(10.0).validate(&Value::Integer(3), EN).unwrap_err();
        assert_eq!(err, "must be greater than or equal to 10");

        let err = Constraint::MaxValue(20.0).validate(&Value::Integer(30), Locale::Chinese).unwrap_err();
        assert_eq!(err, "最大不能超过20");
    }

    #[test]
    fn test_not_blank() {
        assert!(Constraint::NotBlank.validate(&"cyk".into(), EN).is_ok());
        assert!(Constraint::NotBlank.validate(&"   ".into(), EN).is_err());
        assert!(Constraint::NotBlank.validate(&Value::Null, EN).is_err());
    }

    #[test]
    fn test_pattern_is_full_match() {
        let constraint = Constraint::Pattern("[1-9][0-9]{4,10}".to_string());
        assert!(constraint.validate(&"39793666111".into(), EN).is_ok());
        assert!(constraint.validate(&"0123456".into(), EN).is_err());
        assert!(constraint.validate(&"12345abc".into(), EN).is_err());
    }

    #[test]
    fn test_invalid_pattern_fails() {
        let constraint = Constraint::Pattern("[".to_string());
        assert!(constraint.validate(&"x".into(), EN).is_err());
    }

    #[test]
    fn test_size() {
        let constraint = Constraint::max_size(2);
        assert!(constraint.validate(&Value::List(vec!["a".into(), "b".into()]), EN).is_ok());
        assert!(constraint
            .validate(&Value::List(vec!["a".into(), "b".into(), "c".into()]), EN)
            .is_err());
        assert_eq!(
            constraint.message(EN),
            "size must be between 0 and 2"
        );
    }

    #[test]
    fn test_one_of() {
        let constraint = Constraint::one_of_integers([11, 12, 13, 18]);
        assert!(constraint.validate(&Value::Integer(18), EN).is_ok());
        let err = constraint.validate(&Value::Integer(19), Locale::Chinese).unwrap_err();
        assert_eq!(err, "只能取值[11,12,13,18]");
    }

    #[test]
    fn test_custom() {
        let even = Constraint::custom("even", "must be even", |v| {
            v.as_integer().map_or(true, |i| i % 2 == 0)
        });
        assert!(even.validate(&Value::Integer(4), EN).is_ok());
        assert_eq!(even.validate(&Value::Integer(3), EN).unwrap_err(), "must be even");
        assert!(!even.is_templated());
    }
}
