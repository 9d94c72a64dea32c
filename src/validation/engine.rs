//! Constraint engine.
//!
//! The engine checks a structured record's fields against their declared
//! constraints. Scalar parameters are checked by wrapping them into a
//! one-field [`SyntheticRecord`] first, so both paths share one engine.

use crate::core::config::{Locale, ValidationConfig};
use crate::core::constraint::Constraint;
use crate::core::record::{RecordSchema, RecordValue};
use crate::core::types::Value;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// One failed constraint check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Field the constraint was declared on
    pub field: String,
    /// Rendered message
    pub message: String,
    /// Value that failed the check
    pub invalid_value: Value,
}

/// A field paired with the constraints to check it against.
#[derive(Debug, Clone, Copy)]
pub struct ConstrainedField<'a> {
    /// Field name used in messages
    pub name: &'a str,
    /// Current value
    pub value: &'a Value,
    /// Declared constraints
    pub constraints: &'a [Constraint],
}

/// Something the engine can check: a type name and its constrained fields.
pub trait Constrained {
    /// Name of the checked type, for logging.
    fn type_name(&self) -> &str;

    /// Fields to check, in declaration order.
    fn constrained_fields(&self) -> Vec<ConstrainedField<'_>>;
}

/// Checks [`Constrained`] values.
pub trait ConstraintEngine: Send + Sync {
    /// Return every violation found (or only the first, for fail-fast engines).
    fn check(&self, target: &dyn Constrained) -> Vec<Violation>;
}

// ============================================================================
// Adapters
// ============================================================================

/// Transient one-field record carrying a scalar value and the constraints
/// declared on its slot.
#[derive(Debug, Clone)]
pub struct SyntheticRecord<T> {
    name: String,
    value: T,
    constraints: Vec<Constraint>,
}

/// Wrap a single value for constraint checking.
pub fn wrap<T>(name: impl Into<String>, value: T, constraints: &[Constraint]) -> SyntheticRecord<T>
where
    T: Borrow<Value>,
{
    SyntheticRecord {
        name: name.into(),
        value,
        constraints: constraints.to_vec(),
    }
}

impl<T> SyntheticRecord<T> {
    /// Unwrap the carried value.
    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: Borrow<Value>> Constrained for SyntheticRecord<T> {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn constrained_fields(&self) -> Vec<ConstrainedField<'_>> {
        vec![ConstrainedField {
            name: &self.name,
            value: self.value.borrow(),
            constraints: &self.constraints,
        }]
    }
}

/// A populated record viewed through its schema.
///
/// Class-level and ignored fields are not checked.
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    schema: &'a RecordSchema,
    record: &'a RecordValue,
}

impl<'a> RecordView<'a> {
    /// View `record` through `schema`.
    pub fn new(schema: &'a RecordSchema, record: &'a RecordValue) -> Self {
        Self { schema, record }
    }
}

static NULL: Value = Value::Null;

impl Constrained for RecordView<'_> {
    fn type_name(&self) -> &str {
        self.schema.name()
    }

    fn constrained_fields(&self) -> Vec<ConstrainedField<'_>> {
        self.schema
            .fields()
            .iter()
            .filter(|field| field.is_bindable())
            .map(|field| ConstrainedField {
                name: field.name(),
                value: self.record.get(field.name()).unwrap_or(&NULL),
                constraints: field.constraints(),
            })
            .collect()
    }
}

// ============================================================================
// Default engine
// ============================================================================

/// Engine driven by [`Constraint`] declarations.
#[derive(Debug, Clone, Copy)]
pub struct DeclarativeEngine {
    locale: Locale,
    fail_fast: bool,
}

impl DeclarativeEngine {
    /// Create an engine from configuration.
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            locale: config.locale,
            fail_fast: config.fail_fast,
        }
    }

    fn render(&self, field: &str, constraint: &Constraint, message: String, value: &Value) -> String {
        if !constraint.is_templated() {
            return message;
        }
        match self.locale {
            Locale::English => format!("{} {}, invalid value: {}.", field, message, value),
            Locale::Chinese => format!("{}{}, 无效的值: {}.", field, message, value),
        }
    }
}

impl Default for DeclarativeEngine {
    fn default() -> Self {
        Self::new(&ValidationConfig::default())
    }
}

impl ConstraintEngine for DeclarativeEngine {
    fn check(&self, target: &dyn Constrained) -> Vec<Violation> {
        let mut violations = Vec::new();

        for field in target.constrained_fields() {
            for constraint in field.constraints {
                if let Err(message) = constraint.validate(field.value, self.locale) {
                    violations.push(Violation {
                        field: field.name.to_string(),
                        message: self.render(field.name, constraint, message, field.value),
                        invalid_value: field.value.clone(),
                    });
                    if self.fail_fast {
                        return violations;
                    }
                }
            }
        }

        if !violations.is_empty() {
            log::debug!(
                "{} violation(s) on {}",
                violations.len(),
                target.type_name()
            );
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::FieldSchema;
    use crate::core::types::ValueType;

    #[test]
    fn test_wrapped_scalar_message() {
        let engine = DeclarativeEngine::default();
        let constraints = [Constraint::Range { min: 10.0, max: 20.0 }];
        let violations = engine.check(&wrap("age", Value::Integer(30), &constraints));

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "age");
        assert_eq!(
            violations[0].message,
            "age must be between 10 and 20, invalid value: 30."
        );
        assert_eq!(violations[0].invalid_value, Value::Integer(30));
    }

    #[test]
    fn test_chinese_message() {
        let engine = DeclarativeEngine::new(&ValidationConfig::default().with_locale(Locale::Chinese));
        let constraints = [Constraint::MaxValue(20.0)];
        let violations = engine.check(&wrap("age", Value::Integer(30), &constraints));
        assert_eq!(violations[0].message, "age最大不能超过20, 无效的值: 30.");
    }

    #[test]
    fn test_fail_fast() {
        let constraints = [Constraint::NotBlank, Constraint::max_size(1)];
        let value = Value::String("  ".to_string());

        let fast = DeclarativeEngine::default();
        assert_eq!(fast.check(&wrap("name", &value, &constraints)).len(), 1);

        let thorough = DeclarativeEngine::new(&ValidationConfig::default().with_fail_fast(false));
        assert_eq!(thorough.check(&wrap("name", &value, &constraints)).len(), 2);
    }

    #[test]
    fn test_custom_message_is_verbatim() {
        let engine = DeclarativeEngine::default();
        let constraints = [Constraint::custom("odd", "odd numbers only", |v| {
            v.as_integer().map_or(true, |i| i % 2 == 1)
        })];
        let violations = engine.check(&wrap("n", Value::Integer(2), &constraints));
        assert_eq!(violations[0].message, "odd numbers only");
    }

    #[test]
    fn test_record_view_skips_ignored_fields() {
        let schema = RecordSchema::builder("User")
            .field(FieldSchema::new("name", ValueType::String).with_constraint(Constraint::NotBlank))
            .field(
                FieldSchema::new("secret", ValueType::String)
                    .ignored()
                    .with_constraint(Constraint::Required),
            )
            .build();
        let mut record = schema.instantiate();
        record.set("name", "cyk".into());

        let engine = DeclarativeEngine::default();
        assert!(engine.check(&RecordView::new(&schema, &record)).is_empty());

        record.set("name", "".into());
        let violations = engine.check(&RecordView::new(&schema, &record));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "name");
    }
}
