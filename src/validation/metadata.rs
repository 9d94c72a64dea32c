//! Validation contexts.
//!
//! [`ValidationMetadata`] is the per-invocation context shared by every
//! handler. [`ElementMetadata`] is a read-only view over the slot currently
//! being bound, either an operation parameter or a record field.

use crate::core::config::ValidationConfig;
use crate::core::constraint::Constraint;
use crate::core::directive::Directive;
use crate::core::operation::{ParameterSpec, TargetOperation};
use crate::core::record::FieldSchema;
use crate::core::types::{OutputBuffer, ValueType};
use crate::validation::engine::{ConstraintEngine, DeclarativeEngine};
use std::fmt;
use std::sync::Arc;

/// Context for one validation attempt.
#[derive(Clone)]
pub struct ValidationMetadata {
    operation: Arc<TargetOperation>,
    raw_inputs: Vec<String>,
    param_names: Vec<String>,
    output: OutputBuffer,
    engine: Arc<dyn ConstraintEngine>,
}

impl ValidationMetadata {
    /// Create a context with the default constraint engine.
    ///
    /// Parameter names are taken from the operation, so there is always one
    /// name per declared parameter.
    pub fn new(
        operation: Arc<TargetOperation>,
        raw_inputs: Vec<String>,
        output: OutputBuffer,
    ) -> Self {
        let param_names = operation.parameter_names();
        Self {
            operation,
            raw_inputs,
            param_names,
            output,
            engine: Arc::new(DeclarativeEngine::default()),
        }
    }

    /// Replace the constraint engine.
    pub fn with_engine(mut self, engine: Arc<dyn ConstraintEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Use a [`DeclarativeEngine`] built from `config`.
    pub fn with_config(self, config: &ValidationConfig) -> Self {
        self.with_engine(Arc::new(DeclarativeEngine::new(config)))
    }

    /// The operation being bound.
    pub fn operation(&self) -> &TargetOperation {
        &self.operation
    }

    /// Raw inputs in positional order.
    pub fn raw_inputs(&self) -> &[String] {
        &self.raw_inputs
    }

    /// Number of raw inputs.
    pub fn input_count(&self) -> usize {
        self.raw_inputs.len()
    }

    /// Declared parameter names, parallel to the operation's parameters.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Buffer handed to output-sink parameters.
    pub fn output(&self) -> &OutputBuffer {
        &self.output
    }

    /// Engine used for constraint checks.
    pub fn engine(&self) -> &dyn ConstraintEngine {
        self.engine.as_ref()
    }
}

impl fmt::Debug for ValidationMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationMetadata")
            .field("operation", &self.operation.name())
            .field("raw_inputs", &self.raw_inputs)
            .field("param_names", &self.param_names)
            .field("output", &self.output)
            .finish()
    }
}

/// What kind of slot an [`ElementMetadata`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Operation parameter
    Parameter,
    /// Field of a structured record
    Field,
}

/// Read-only view over one bindable slot.
#[derive(Debug, Clone, Copy)]
pub struct ElementMetadata<'a> {
    /// Parameter or field
    pub kind: ElementKind,
    /// Declared type
    pub value_type: &'a ValueType,
    /// Parameter position, or the JSON index of an independently addressed field
    pub index: Option<usize>,
    /// Slot name
    pub name: &'a str,
    /// Directives declared on the slot
    pub directives: &'a [Directive],
    /// Constraints declared on the slot
    pub constraints: &'a [Constraint],
}

impl<'a> ElementMetadata<'a> {
    /// View over the parameter at `position`.
    pub fn parameter(spec: &'a ParameterSpec, position: usize, name: &'a str) -> Self {
        Self {
            kind: ElementKind::Parameter,
            value_type: &spec.param_type,
            index: Some(position),
            name,
            directives: &spec.directives,
            constraints: &spec.constraints,
        }
    }

    /// View over a record field.
    pub fn field(field: &'a FieldSchema, index: Option<usize>) -> Self {
        Self {
            kind: ElementKind::Field,
            value_type: field.field_type(),
            index,
            name: field.name(),
            directives: field.directives(),
            constraints: field.constraints(),
        }
    }

    /// Whether this slot is an operation parameter.
    pub fn on_parameter(&self) -> bool {
        self.kind == ElementKind::Parameter
    }

    /// Whether this slot is a record field.
    pub fn on_field(&self) -> bool {
        self.kind == ElementKind::Field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operation::ParameterSpec;

    #[test]
    fn test_param_names_follow_operation() {
        let operation = TargetOperation::builder("op")
            .parameter(ParameterSpec::positional("a", ValueType::String, 0))
            .parameter(ParameterSpec::list("rest"))
            .build();
        let metadata = ValidationMetadata::new(
            Arc::new(operation),
            vec!["x".to_string()],
            OutputBuffer::new(),
        );

        assert_eq!(metadata.param_names(), ["a".to_string(), "rest".to_string()]);
        assert_eq!(metadata.param_names().len(), metadata.operation().parameter_count());
        assert_eq!(metadata.input_count(), 1);
    }

    #[test]
    fn test_element_kinds() {
        let spec = ParameterSpec::positional("age", ValueType::Integer, 1);
        let element = ElementMetadata::parameter(&spec, 1, "age");
        assert!(element.on_parameter());
        assert_eq!(element.index, Some(1));

        let field = FieldSchema::new("addresses", ValueType::string_list()).json_path(5, "$.key2");
        let element = ElementMetadata::field(&field, Some(5));
        assert!(element.on_field());
        assert_eq!(element.directives.len(), 1);
    }
}
