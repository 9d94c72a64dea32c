//! Positional scalar binding.

use super::{check_index, ensure_valid, initialized, ElementValidatorHandler, Initializable};
use crate::core::directive::Positional;
use crate::core::error::BindingResult;
use crate::core::types::Value;
use crate::validation::chain::ValidationChain;
use crate::validation::engine::wrap;
use crate::validation::metadata::{ElementMetadata, ValidationMetadata};

/// Binds `raw_inputs[index]`, cast to the slot's declared type.
///
/// Required slots have their constraints checked through a one-field
/// synthetic record.
#[derive(Debug, Default)]
pub struct PositionalHandler {
    directive: Option<Positional>,
}

impl PositionalHandler {
    /// Create an uninitialized handler.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Initializable for PositionalHandler {
    type Directive = Positional;

    fn initialize(&mut self, directive: Positional) {
        self.directive = Some(directive);
    }
}

impl ElementValidatorHandler for PositionalHandler {
    fn name(&self) -> &'static str {
        "positional"
    }

    fn handle(
        &self,
        metadata: &ValidationMetadata,
        chain: &mut ValidationChain,
        element: &ElementMetadata<'_>,
    ) -> BindingResult<Value> {
        chain.intercept();
        let directive = initialized(&self.directive, self.name())?;

        check_index(element.name, directive.index, metadata.input_count())?;
        let raw = &metadata.raw_inputs()[directive.index];
        let value = element.value_type.cast_str(element.name, raw)?;

        if directive.required {
            ensure_valid(metadata, &wrap(element.name, &value, element.constraints))?;
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constraint::Constraint;
    use crate::core::error::BindingError;
    use crate::core::operation::{ParameterSpec, TargetOperation};
    use crate::core::types::{OutputBuffer, ValueType};
    use crate::validation::handlers::Applicable;
    use std::sync::Arc;

    fn metadata(inputs: &[&str]) -> ValidationMetadata {
        let operation = TargetOperation::builder("op").build();
        ValidationMetadata::new(
            Arc::new(operation),
            inputs.iter().map(|s| s.to_string()).collect(),
            OutputBuffer::new(),
        )
    }

    fn bind(spec: &ParameterSpec, inputs: &[&str]) -> (BindingResult<Value>, ValidationChain) {
        let mut handler = PositionalHandler::new();
        assert!(handler.applies_to(&spec.directives));
        let mut chain = ValidationChain::new();
        let element = ElementMetadata::parameter(spec, 0, &spec.name);
        let result = handler.handle(&metadata(inputs), &mut chain, &element);
        (result, chain)
    }

    #[test]
    fn test_binds_and_intercepts() {
        let spec = ParameterSpec::positional("age", ValueType::Integer, 1);
        let (result, chain) = bind(&spec, &["cyk", "18"]);
        assert_eq!(result.unwrap(), Value::Integer(18));
        assert!(!chain.should_continue());
    }

    #[test]
    fn test_out_of_range() {
        let spec = ParameterSpec::positional("qq", ValueType::String, 3);
        let (result, chain) = bind(&spec, &["cyk", "18", "true"]);
        assert!(matches!(
            result,
            Err(BindingError::OutOfRange {
                position: 4,
                actual: 3,
                ..
            })
        ));
        assert!(!chain.should_continue());
    }

    #[test]
    fn test_constraints_only_checked_when_required() {
        let range = Constraint::Range { min: 10.0, max: 20.0 };

        let spec = ParameterSpec::positional("age", ValueType::Integer, 0).with_constraint(range.clone());
        let (result, _) = bind(&spec, &["30"]);
        assert_eq!(
            result.unwrap_err().to_string(),
            "age must be between 10 and 20, invalid value: 30."
        );

        let spec = ParameterSpec::optional_positional("age", ValueType::Integer, 0).with_constraint(range);
        let (result, _) = bind(&spec, &["30"]);
        assert_eq!(result.unwrap(), Value::Integer(30));
    }

    #[test]
    fn test_type_mismatch() {
        let spec = ParameterSpec::positional("married", ValueType::Boolean, 0);
        let (result, _) = bind(&spec, &["maybe"]);
        assert!(matches!(result, Err(BindingError::TypeMismatch { .. })));
    }
}
