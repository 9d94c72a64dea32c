//! Core value types produced by binding.
//!
//! The type system uses an enum-based approach:
//! - Closed set of types: a target operation declares one of a finite set of slot types
//! - Serialization: serde handles enums natively
//! - Exhaustive matching catches missing casts at compile time

use crate::core::error::{BindingError, BindingResult};
use crate::core::record::{RecordSchema, RecordValue};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// A bound, typed argument value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// Absence of a value
    Null,
    /// Boolean value
    Boolean(bool),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Homogeneous list of values
    List(Vec<Value>),
    /// Untyped JSON document
    Json(serde_json::Value),
    /// Populated structured record
    Record(RecordValue),
    /// Shared output collector handed to the operation
    Output(OutputBuffer),
}

/// Declared type of a bindable slot.
#[derive(Debug, Clone)]
pub enum ValueType {
    /// `true`/`false`, also `1`/`0` as raw input
    Boolean,
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point number
    Float,
    /// Raw input passed through
    String,
    /// List of a specific type
    List(Box<ValueType>),
    /// Any JSON document, kept untyped
    Json,
    /// Structured record described by a schema
    Record(Arc<RecordSchema>),
}

/// Shared buffer the invoked operation may write results into.
///
/// Cloning shares the underlying storage.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer(Arc<Mutex<Vec<String>>>);

// ============================================================================
// Value Implementation
// ============================================================================

impl Value {
    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Try to get this value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Try to get this value as a float.
    /// Integers are automatically converted to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            Value::Json(serde_json::Value::Number(n)) => n.as_f64(),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Json(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a list reference.
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        if let Value::List(list) = self {
            Some(list)
        } else {
            None
        }
    }

    /// Try to get this value as a record reference.
    pub fn as_record(&self) -> Option<&RecordValue> {
        if let Value::Record(record) = self {
            Some(record)
        } else {
            None
        }
    }

    /// Try to get this value as a JSON document reference.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        if let Value::Json(json) = self {
            Some(json)
        } else {
            None
        }
    }

    /// Try to get this value as an output buffer.
    pub fn as_output(&self) -> Option<&OutputBuffer> {
        if let Value::Output(buffer) = self {
            Some(buffer)
        } else {
            None
        }
    }

    /// Check if this value is Null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Number of elements for sized values (strings count characters).
    pub fn size(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            Value::List(list) => Some(list.len()),
            Value::Record(record) => Some(record.len()),
            Value::Output(buffer) => Some(buffer.len()),
            Value::Json(serde_json::Value::String(s)) => Some(s.chars().count()),
            Value::Json(serde_json::Value::Array(arr)) => Some(arr.len()),
            Value::Json(serde_json::Value::Object(map)) => Some(map.len()),
            _ => None,
        }
    }

    /// Convert this value to plain JSON.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(list) => serde_json::Value::Array(list.iter().map(Value::to_json).collect()),
            Value::Json(json) => json.clone(),
            Value::Record(record) => record.to_json(),
            Value::Output(buffer) => serde_json::Value::from(buffer.snapshot()),
        }
    }

    /// Deserialize this value into a caller-defined type.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_json())
    }

    /// Render this value as a raw positional input, the inverse of
    /// [`ValueType::cast_str`].
    pub fn to_raw_input(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            other => other.to_json().to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "{}", s),
            Value::List(list) => {
                write!(f, "[")?;
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Json(json) => write!(f, "{}", json),
            Value::Record(record) => write!(f, "{}", record),
            Value::Output(buffer) => write!(f, "{:?}", buffer.snapshot()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

// ============================================================================
// ValueType Implementation
// ============================================================================

impl ValueType {
    /// Shorthand for a list of strings.
    pub fn string_list() -> Self {
        ValueType::List(Box::new(ValueType::String))
    }

    /// Shorthand for a record type.
    pub fn record(schema: RecordSchema) -> Self {
        ValueType::Record(Arc::new(schema))
    }

    /// Get the record schema if this is a record type.
    pub fn as_record(&self) -> Option<&Arc<RecordSchema>> {
        if let ValueType::Record(schema) = self {
            Some(schema)
        } else {
            None
        }
    }

    /// Value used for a slot no handler produced a value for.
    pub fn default_value(&self) -> Value {
        match self {
            ValueType::Boolean => Value::Boolean(false),
            ValueType::Integer => Value::Integer(0),
            ValueType::Float => Value::Float(0.0),
            ValueType::String | ValueType::List(_) | ValueType::Json | ValueType::Record(_) => {
                Value::Null
            }
        }
    }

    /// Cast a raw positional input to this type.
    ///
    /// Scalars are parsed from their text form; list, JSON and record types
    /// parse the text as JSON first.
    pub fn cast_str(&self, name: &str, raw: &str) -> BindingResult<Value> {
        let mismatch = || BindingError::TypeMismatch {
            parameter: name.to_string(),
            expected: self.to_string(),
            actual: raw.to_string(),
        };

        match self {
            ValueType::Boolean => parse_bool(raw).map(Value::Boolean).ok_or_else(mismatch),
            ValueType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| mismatch()),
            ValueType::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| mismatch()),
            ValueType::String => Ok(Value::String(raw.to_string())),
            ValueType::List(_) | ValueType::Json | ValueType::Record(_) => {
                let json: serde_json::Value = serde_json::from_str(raw).map_err(|_| mismatch())?;
                self.from_json(name, &json)
            }
        }
    }

    /// Convert a parsed JSON value to this type.
    pub fn from_json(&self, name: &str, json: &serde_json::Value) -> BindingResult<Value> {
        use serde_json::Value as Json;

        let mismatch = || BindingError::TypeMismatch {
            parameter: name.to_string(),
            expected: self.to_string(),
            actual: json.to_string(),
        };

        match (self, json) {
            (ValueType::Json, _) => Ok(Value::Json(json.clone())),
            (_, Json::Null) => Ok(Value::Null),
            (ValueType::Boolean, Json::Bool(b)) => Ok(Value::Boolean(*b)),
            (ValueType::Integer, Json::Number(n)) => {
                n.as_i64().map(Value::Integer).ok_or_else(mismatch)
            }
            (ValueType::Float, Json::Number(n)) => {
                n.as_f64().map(Value::Float).ok_or_else(mismatch)
            }
            (ValueType::String, Json::String(s)) => Ok(Value::String(s.clone())),
            (ValueType::String, other) => Ok(Value::String(other.to_string())),
            (ValueType::Boolean | ValueType::Integer | ValueType::Float, Json::String(s)) => {
                self.cast_str(name, s)
            }
            (ValueType::List(inner), Json::Array(items)) => items
                .iter()
                .map(|item| inner.from_json(name, item))
                .collect::<BindingResult<Vec<_>>>()
                .map(Value::List),
            (ValueType::Record(schema), Json::Object(map)) => {
                let mut record = schema.instantiate();
                for field in schema.fields().iter().filter(|f| !f.is_class_level()) {
                    if let Some(item) = map.get(field.name()) {
                        let value = field.field_type().from_json(field.name(), item)?;
                        field.assign(&mut record, value);
                    }
                }
                Ok(Value::Record(record))
            }
            _ => Err(mismatch()),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueType::Boolean, ValueType::Boolean)
            | (ValueType::Integer, ValueType::Integer)
            | (ValueType::Float, ValueType::Float)
            | (ValueType::String, ValueType::String)
            | (ValueType::Json, ValueType::Json) => true,
            (ValueType::List(a), ValueType::List(b)) => a == b,
            // Schemas are nominal
            (ValueType::Record(a), ValueType::Record(b)) => a.name() == b.name(),
            _ => false,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Boolean => write!(f, "boolean"),
            ValueType::Integer => write!(f, "integer"),
            ValueType::Float => write!(f, "float"),
            ValueType::String => write!(f, "string"),
            ValueType::List(inner) => write!(f, "list<{}>", inner),
            ValueType::Json => write!(f, "json"),
            ValueType::Record(schema) => write!(f, "{}", schema.name()),
        }
    }
}

// ============================================================================
// OutputBuffer Implementation
// ============================================================================

impl OutputBuffer {
    /// Create a new empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer pre-filled with `items`.
    pub fn from_vec(items: Vec<String>) -> Self {
        Self(Arc::new(Mutex::new(items)))
    }

    /// Append a result line.
    pub fn push(&self, item: impl Into<String>) {
        self.0.lock().push(item.into());
    }

    /// Copy the current contents.
    pub fn snapshot(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    /// Number of collected items.
    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    /// Check if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    /// Check whether two handles share the same storage.
    pub fn shares_storage_with(&self, other: &OutputBuffer) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for OutputBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.shares_storage_with(other) || *self.0.lock() == *other.0.lock()
    }
}

impl Serialize for OutputBuffer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.lock().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for OutputBuffer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<String>::deserialize(deserializer).map(OutputBuffer::from_vec)
    }
}
