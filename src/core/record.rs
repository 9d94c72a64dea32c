//! Structured record schemas and instances.
//!
//! A record schema plays the part of a plain data type: named, typed fields
//! in declaration order, each with its own directives, constraints and setter.
//! Binding never writes a field directly; it always goes through the field's
//! setter.

use crate::core::constraint::Constraint;
use crate::core::directive::{find, Directive, Ignore, JsonBinding};
use crate::core::error::{BindingError, BindingResult};
use crate::core::json_path;
use crate::core::types::{Value, ValueType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Function that stores a bound value into a record.
pub type FieldSetter = Arc<dyn Fn(&mut RecordValue, Value) + Send + Sync>;

/// Description of one record field.
#[derive(Clone)]
pub struct FieldSchema {
    name: String,
    field_type: ValueType,
    directives: Vec<Directive>,
    constraints: Vec<Constraint>,
    class_level: bool,
    setter: FieldSetter,
}

/// Description of a structured record type.
#[derive(Clone)]
pub struct RecordSchema {
    name: String,
    fields: Vec<FieldSchema>,
}

/// Populated instance of a record schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordValue {
    /// Name of the schema this record was built from
    pub type_name: String,
    fields: IndexMap<String, Value>,
}

// ============================================================================
// FieldSchema
// ============================================================================

impl FieldSchema {
    /// Create a field with the default setter.
    pub fn new(name: impl Into<String>, field_type: ValueType) -> Self {
        let name = name.into();
        let key = name.clone();
        Self {
            name,
            field_type,
            directives: Vec::new(),
            constraints: Vec::new(),
            class_level: false,
            setter: Arc::new(move |record: &mut RecordValue, value: Value| {
                record.set(key.clone(), value)
            }),
        }
    }

    /// Bind this field from the whole JSON document at `index`.
    pub fn json(self, index: usize) -> Self {
        self.with_directive(Directive::Json(JsonBinding::new(index)))
    }

    /// Bind this field from the JSON sub-value at `path` of input `index`.
    pub fn json_path(self, index: usize, path: impl Into<String>) -> Self {
        self.with_directive(Directive::Json(JsonBinding::with_path(index, path)))
    }

    /// Exclude this field from positional consumption and constraint checks.
    pub fn ignored(self) -> Self {
        self.with_directive(Directive::Ignore(Ignore))
    }

    /// Mark this field as class-level; it is never bound.
    pub fn class_level(mut self) -> Self {
        self.class_level = true;
        self
    }

    /// Add a directive.
    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Add a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Replace the setter used to store bound values.
    pub fn with_setter<F>(mut self, setter: F) -> Self
    where
        F: Fn(&mut RecordValue, Value) + Send + Sync + 'static,
    {
        self.setter = Arc::new(setter);
        self
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared field type.
    pub fn field_type(&self) -> &ValueType {
        &self.field_type
    }

    /// Directives declared on this field.
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Constraints checked after binding.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Whether this field belongs to the type rather than the instance.
    pub fn is_class_level(&self) -> bool {
        self.class_level
    }

    /// Whether this field carries `Ignore`.
    pub fn is_ignored(&self) -> bool {
        find::<Ignore>(&self.directives).is_some()
    }

    /// JSON binding declared on this field, if any.
    pub fn json_binding(&self) -> Option<&JsonBinding> {
        find::<JsonBinding>(&self.directives)
    }

    /// Whether this field takes part in binding and constraint checks.
    pub fn is_bindable(&self) -> bool {
        !self.class_level && !self.is_ignored()
    }

    /// Store `value` into `record` through this field's setter.
    pub fn assign(&self, record: &mut RecordValue, value: Value) {
        (self.setter)(record, value);
    }
}

impl fmt::Debug for FieldSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSchema")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("directives", &self.directives)
            .field("constraints", &self.constraints)
            .field("class_level", &self.class_level)
            .field("setter", &"<closure>")
            .finish()
    }
}

// ============================================================================
// RecordSchema
// ============================================================================

impl RecordSchema {
    /// Create a new schema builder.
    pub fn builder(name: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Find a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Create the zero-value instance: every non-class-level field holds
    /// its type's default.
    pub fn instantiate(&self) -> RecordValue {
        let fields = self
            .fields
            .iter()
            .filter(|f| !f.class_level)
            .map(|f| (f.name.clone(), f.field_type.default_value()))
            .collect();
        RecordValue {
            type_name: self.name.clone(),
            fields,
        }
    }

    /// Encode `record` as the raw inputs Record binding would read it from.
    ///
    /// Positional fields occupy the leading inputs in declaration order.
    /// JSON-bound fields are written at their declared index; fields bound
    /// by path are merged into the document at that index.
    pub fn encode_inputs(&self, record: &RecordValue) -> BindingResult<Vec<String>> {
        let encoding = |reason: String| BindingError::Encoding {
            record: self.name.clone(),
            reason,
        };

        let mut positional = Vec::new();
        let mut documents: IndexMap<usize, serde_json::Value> = IndexMap::new();
        let mut by_path = Vec::new();

        for field in self.fields.iter().filter(|f| f.is_bindable()) {
            let value = record.get(&field.name).cloned().unwrap_or(Value::Null);
            match field.json_binding() {
                None => positional.push(value.to_raw_input()),
                Some(binding) if binding.json_path.trim().is_empty() => {
                    if documents.insert(binding.index, value.to_json()).is_some() {
                        return Err(encoding(format!(
                            "input {} holds more than one whole JSON document",
                            binding.index
                        )));
                    }
                }
                Some(binding) => by_path.push((binding, value)),
            }
        }

        for (binding, value) in by_path {
            let segments = json_path::parse(&binding.json_path).map_err(&encoding)?;
            let document = documents
                .entry(binding.index)
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
            let existing = json_path::select(document, &segments).cloned();
            match existing {
                // Already provided by a whole-document field
                Some(existing) if existing == value.to_json() => {}
                Some(_) => {
                    return Err(encoding(format!(
                        "path {} of input {} disagrees with the whole document",
                        binding.json_path, binding.index
                    )))
                }
                None => json_path::insert(document, &segments, value.to_json()).map_err(&encoding)?,
            }
        }

        let len = documents
            .keys()
            .map(|index| index + 1)
            .chain(std::iter::once(positional.len()))
            .max()
            .unwrap_or(0);
        let mut inputs = vec![String::new(); len];
        for (i, raw) in positional.into_iter().enumerate() {
            inputs[i] = raw;
        }
        for (index, document) in documents {
            if index < self.positional_count() {
                return Err(encoding(format!(
                    "input {} is claimed by both a positional and a JSON field",
                    index
                )));
            }
            inputs[index] = document.to_string();
        }
        Ok(inputs)
    }

    fn positional_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|f| f.is_bindable() && f.json_binding().is_none())
            .count()
    }
}

impl fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Builder for RecordSchema.
pub struct RecordSchemaBuilder {
    name: String,
    fields: Vec<FieldSchema>,
}

impl RecordSchemaBuilder {
    /// Add a field.
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Build the schema.
    pub fn build(self) -> RecordSchema {
        RecordSchema {
            name: self.name,
            fields: self.fields,
        }
    }
}

// ============================================================================
// RecordValue
// ============================================================================

impl RecordValue {
    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Store a field value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Iterate fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of stored fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convert to a JSON object keyed by field name.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.type_name)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person_schema() -> RecordSchema {
        RecordSchema::builder("Person")
            .field(FieldSchema::new("name", ValueType::String))
            .field(FieldSchema::new("age", ValueType::Integer))
            .field(FieldSchema::new("VERSION", ValueType::Integer).class_level())
            .field(FieldSchema::new("note", ValueType::String).ignored())
            .field(FieldSchema::new("tags", ValueType::string_list()).json(2))
            .field(FieldSchema::new("first_key", ValueType::String).json_path(3, "$.key1"))
            .build()
    }

    #[test]
    fn test_instantiate_uses_defaults() {
        let record = person_schema().instantiate();
        assert_eq!(record.get("age"), Some(&Value::Integer(0)));
        assert_eq!(record.get("name"), Some(&Value::Null));
        assert!(record.get("VERSION").is_none());
        assert_eq!(record.len(), 5);
    }

    #[test]
    fn test_custom_setter() {
        let field = FieldSchema::new("name", ValueType::String).with_setter(|record, value| {
            let trimmed = value.as_str().map(|s| s.trim().to_string()).unwrap_or_default();
            record.set("name", Value::String(trimmed));
        });
        let mut record = RecordSchema::builder("Named").field(field.clone()).build().instantiate();

        field.assign(&mut record, Value::from("  cyk "));
        assert_eq!(record.get("name"), Some(&Value::from("cyk")));
    }

    #[test]
    fn test_encode_inputs_layout() {
        let schema = person_schema();
        let mut record = schema.instantiate();
        record.set("name", "cyk".into());
        record.set("age", 18.into());
        record.set("tags", Value::List(vec!["a".into()]));
        record.set("first_key", "v1".into());

        let inputs = schema.encode_inputs(&record).unwrap();
        assert_eq!(inputs, vec!["cyk", "18", r#"["a"]"#, r#"{"key1":"v1"}"#]);
    }

    #[test]
    fn test_encode_inputs_conflict() {
        let schema = RecordSchema::builder("Clash")
            .field(FieldSchema::new("a", ValueType::String))
            .field(FieldSchema::new("b", ValueType::Json).json(0))
            .build();
        let mut record = schema.instantiate();
        record.set("a", "x".into());
        record.set("b", Value::Json(serde_json::json!({})));

        assert!(matches!(
            schema.encode_inputs(&record),
            Err(BindingError::Encoding { .. })
        ));
    }

    #[test]
    fn test_record_display() {
        let mut record = RecordValue {
            type_name: "Pair".to_string(),
            fields: IndexMap::new(),
        };
        record.set("a", 1.into());
        record.set("b", "x".into());
        assert_eq!(record.to_string(), "Pair(a=1, b=x)");
    }
}
