//! Whole-input list binding.

use super::{check_size, initialized, ElementValidatorHandler, Initializable};
use crate::core::directive::ListBinding;
use crate::core::error::BindingResult;
use crate::core::types::Value;
use crate::validation::chain::ValidationChain;
use crate::validation::metadata::{ElementMetadata, ValidationMetadata};

/// Binds every raw input, unchanged and in order, as a list of strings.
#[derive(Debug, Default)]
pub struct ListHandler {
    directive: Option<ListBinding>,
}

impl ListHandler {
    /// Create an uninitialized handler.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Initializable for ListHandler {
    type Directive = ListBinding;

    fn initialize(&mut self, directive: ListBinding) {
        self.directive = Some(directive);
    }
}

impl ElementValidatorHandler for ListHandler {
    fn name(&self) -> &'static str {
        "list"
    }

    fn handle(
        &self,
        metadata: &ValidationMetadata,
        chain: &mut ValidationChain,
        _element: &ElementMetadata<'_>,
    ) -> BindingResult<Value> {
        chain.intercept();
        let directive = initialized(&self.directive, self.name())?;
        check_size(directive.expected_size, metadata.input_count())?;

        Ok(Value::List(
            metadata
                .raw_inputs()
                .iter()
                .cloned()
                .map(Value::String)
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::BindingError;
    use crate::core::operation::{ParameterSpec, TargetOperation};
    use crate::core::types::OutputBuffer;
    use crate::validation::handlers::Applicable;
    use std::sync::Arc;

    fn bind(spec: &ParameterSpec, inputs: &[&str]) -> BindingResult<Value> {
        let metadata = ValidationMetadata::new(
            Arc::new(TargetOperation::builder("op").build()),
            inputs.iter().map(|s| s.to_string()).collect(),
            OutputBuffer::new(),
        );
        let mut handler = ListHandler::new();
        assert!(handler.applies_to(&spec.directives));
        let element = ElementMetadata::parameter(spec, 0, &spec.name);
        handler.handle(&metadata, &mut ValidationChain::new(), &element)
    }

    #[test]
    fn test_returns_inputs_unchanged() {
        let spec = ParameterSpec::list_sized("inputs", 4);
        let value = bind(&spec, &["cyk", "18", "true", " spaced "]).unwrap();
        assert_eq!(
            value,
            Value::List(vec!["cyk".into(), "18".into(), "true".into(), " spaced ".into()])
        );
    }

    #[test]
    fn test_count_mismatch() {
        let spec = ParameterSpec::list_sized("inputs", 4);
        let error = bind(&spec, &["cyk", "18", "true"]).unwrap_err();
        assert_eq!(
            error,
            BindingError::CountMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_unsized_accepts_anything() {
        let spec = ParameterSpec::list("inputs");
        assert_eq!(bind(&spec, &[]).unwrap(), Value::List(vec![]));
    }
}
