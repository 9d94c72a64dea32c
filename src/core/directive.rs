//! Binding directives.
//!
//! A directive is a declarative instruction attached to an operation, a
//! parameter or a record field describing how its value is sourced. The set
//! of directives is closed; handlers select the one they understand with
//! [`find`].

use serde::{Deserialize, Serialize};

/// Bind from one positional input, cast to the declared scalar type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Positional {
    /// Index into the raw inputs
    pub index: usize,
    /// Whether constraint checks run on the cast value
    pub required: bool,
}

/// Bind from one positional input parsed as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonBinding {
    /// Index into the raw inputs
    pub index: usize,
    /// Path of the sub-value to bind; empty binds the whole document
    #[serde(default)]
    pub json_path: String,
}

/// Bind a structured record field by field from the raw inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordBinding {
    /// Required number of raw inputs
    pub expected_size: Option<usize>,
}

/// Bind the whole raw input sequence as a list of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBinding {
    /// Required number of raw inputs
    pub expected_size: Option<usize>,
}

/// Operation-level input count check with optional custom handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationArity {
    /// Required number of raw inputs
    pub expected_size: Option<usize>,
    /// Names of registered custom handlers, run in order
    #[serde(default)]
    pub custom_handlers: Vec<String>,
}

/// Marks the parameter that receives the output buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSink;

/// Excludes a record field from binding and constraint checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ignore;

/// A declared binding instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "directive", content = "config")]
pub enum Directive {
    /// Scalar from one input
    Positional(Positional),
    /// JSON document or sub-value from one input
    Json(JsonBinding),
    /// Structured record from several inputs
    Record(RecordBinding),
    /// Every input as a list of strings
    ListOfStrings(ListBinding),
    /// Operation-level count and custom checks
    OperationArity(OperationArity),
    /// Output buffer placeholder
    OutputSink(OutputSink),
    /// Skipped record field
    Ignore(Ignore),
}

impl Directive {
    /// Required positional binding at `index`.
    pub fn positional(index: usize) -> Self {
        Directive::Positional(Positional {
            index,
            required: true,
        })
    }

    /// Positional binding at `index` that skips constraint checks.
    pub fn optional_positional(index: usize) -> Self {
        Directive::Positional(Positional {
            index,
            required: false,
        })
    }

    /// Whole-document JSON binding at `index`.
    pub fn json(index: usize) -> Self {
        Directive::Json(JsonBinding::new(index))
    }

    /// JSON binding of the sub-value at `path` of input `index`.
    pub fn json_path(index: usize, path: impl Into<String>) -> Self {
        Directive::Json(JsonBinding::with_path(index, path))
    }

    /// Record binding with an optional input count.
    pub fn record(expected_size: Option<usize>) -> Self {
        Directive::Record(RecordBinding { expected_size })
    }

    /// List binding with an optional input count.
    pub fn list(expected_size: Option<usize>) -> Self {
        Directive::ListOfStrings(ListBinding { expected_size })
    }

    /// Operation arity check for exactly `expected_size` inputs.
    pub fn arity(expected_size: usize) -> Self {
        Directive::OperationArity(OperationArity::sized(expected_size))
    }

    /// Output sink marker.
    pub fn output_sink() -> Self {
        Directive::OutputSink(OutputSink)
    }

    /// Short name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Directive::Positional(_) => "Positional",
            Directive::Json(_) => "Json",
            Directive::Record(_) => "Record",
            Directive::ListOfStrings(_) => "ListOfStrings",
            Directive::OperationArity(_) => "OperationArity",
            Directive::OutputSink(_) => "OutputSink",
            Directive::Ignore(_) => "Ignore",
        }
    }
}

impl JsonBinding {
    /// Bind the whole document at `index`.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            json_path: String::new(),
        }
    }

    /// Bind the sub-value at `path`.
    pub fn with_path(index: usize, path: impl Into<String>) -> Self {
        Self {
            index,
            json_path: path.into(),
        }
    }

    /// Check whether a path is configured.
    pub fn has_path(&self) -> bool {
        !self.json_path.trim().is_empty()
    }
}

impl OperationArity {
    /// Check for exactly `expected_size` inputs.
    pub fn sized(expected_size: usize) -> Self {
        Self {
            expected_size: Some(expected_size),
            custom_handlers: Vec::new(),
        }
    }

    /// Run no count check, only custom handlers.
    pub fn r#unsized() -> Self {
        Self::default()
    }

    /// Append a custom handler by registry name.
    pub fn custom_handler(mut self, name: impl Into<String>) -> Self {
        self.custom_handlers.push(name.into());
        self
    }
}

impl From<OperationArity> for Directive {
    fn from(arity: OperationArity) -> Self {
        Directive::OperationArity(arity)
    }
}

// ============================================================================
// Variant lookup
// ============================================================================

/// A directive payload type that can be picked out of a directive list.
pub trait DirectiveVariant: Clone {
    /// Borrow the payload if `directive` is this variant.
    fn extract(directive: &Directive) -> Option<&Self>;
}

macro_rules! directive_variant {
    ($ty:ty, $variant:ident) => {
        impl DirectiveVariant for $ty {
            fn extract(directive: &Directive) -> Option<&Self> {
                match directive {
                    Directive::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

directive_variant!(Positional, Positional);
directive_variant!(JsonBinding, Json);
directive_variant!(RecordBinding, Record);
directive_variant!(ListBinding, ListOfStrings);
directive_variant!(OperationArity, OperationArity);
directive_variant!(OutputSink, OutputSink);
directive_variant!(Ignore, Ignore);

/// Find the first directive of type `D`.
pub fn find<D: DirectiveVariant>(directives: &[Directive]) -> Option<&D> {
    directives.iter().find_map(D::extract)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_variant() {
        let directives = vec![Directive::json_path(2, "$.key1"), Directive::positional(0)];

        let positional = find::<Positional>(&directives).unwrap();
        assert_eq!(positional.index, 0);
        assert!(positional.required);

        let json = find::<JsonBinding>(&directives).unwrap();
        assert!(json.has_path());
        assert!(find::<RecordBinding>(&directives).is_none());
    }

    #[test]
    fn test_arity_builder() {
        let arity = OperationArity::sized(9).custom_handler("six_inputs");
        assert_eq!(arity.expected_size, Some(9));
        assert_eq!(arity.custom_handlers, vec!["six_inputs".to_string()]);
        assert_eq!(Directive::from(arity).name(), "OperationArity");
    }

    #[test]
    fn test_directive_serde() {
        let directive = Directive::positional(3);
        let json = serde_json::to_string(&directive).unwrap();
        let back: Directive = serde_json::from_str(&json).unwrap();
        assert_eq!(directive, back);
    }
}
