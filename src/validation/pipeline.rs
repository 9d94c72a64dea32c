//! Validation pipeline implementation.

use crate::core::error::BindingResult;
use crate::core::types::Value;
use crate::validation::chain::ValidationChain;
use crate::validation::handlers::{
    ArityHandler, ElementValidatorHandler, JsonHandler, ListHandler, MethodValidatorHandler,
    OutputSinkHandler, PositionalHandler, RecordHandler,
};
use crate::validation::metadata::{ElementMetadata, ValidationMetadata};
use crate::validation::registry::CustomHandlerRegistry;
use crate::validation::result::ValidationResult;
use std::sync::Arc;
use std::time::Instant;

/// Composes handler lists for one invocation.
pub struct ValidationBuilder {
    metadata: ValidationMetadata,
    method_validators: Vec<Box<dyn MethodValidatorHandler>>,
    element_validators: Vec<Box<dyn ElementValidatorHandler>>,
}

impl ValidationBuilder {
    /// Create a builder without handlers.
    pub fn new(metadata: ValidationMetadata) -> Self {
        Self {
            metadata,
            method_validators: Vec::new(),
            element_validators: Vec::new(),
        }
    }

    /// Create a builder with fresh instances of every built-in handler.
    ///
    /// Order: arity at operation level; positional, JSON, record, list and
    /// output sink at parameter level.
    pub fn with_builtins(metadata: ValidationMetadata, registry: Arc<CustomHandlerRegistry>) -> Self {
        Self::new(metadata)
            .add_method_validator(ArityHandler::new(registry))
            .add_element_validator(PositionalHandler::new())
            .add_element_validator(JsonHandler::new())
            .add_element_validator(RecordHandler::new())
            .add_element_validator(ListHandler::new())
            .add_element_validator(OutputSinkHandler::new())
    }

    /// Append an operation-level handler.
    pub fn add_method_validator(mut self, handler: impl MethodValidatorHandler + 'static) -> Self {
        self.method_validators.push(Box::new(handler));
        self
    }

    /// Append a parameter-level handler.
    pub fn add_element_validator(mut self, handler: impl ElementValidatorHandler + 'static) -> Self {
        self.element_validators.push(Box::new(handler));
        self
    }

    /// Finish composing.
    pub fn build(self) -> Validation {
        Validation {
            metadata: self.metadata,
            method_validators: self.method_validators,
            element_validators: self.element_validators,
        }
    }
}

/// One validation attempt.
///
/// Handlers are stateful between initialization and handling, so a
/// `Validation` is consumed by [`Validation::validate`].
pub struct Validation {
    metadata: ValidationMetadata,
    method_validators: Vec<Box<dyn MethodValidatorHandler>>,
    element_validators: Vec<Box<dyn ElementValidatorHandler>>,
}

impl Validation {
    /// Start composing a validation for `metadata`.
    pub fn builder(metadata: ValidationMetadata) -> ValidationBuilder {
        ValidationBuilder::new(metadata)
    }

    /// The context this validation runs against.
    pub fn metadata(&self) -> &ValidationMetadata {
        &self.metadata
    }

    /// Run the method pass, then the parameter pass.
    ///
    /// The first error aborts validation; no values are returned with it.
    pub fn validate(self) -> ValidationResult {
        let Validation {
            metadata,
            mut method_validators,
            mut element_validators,
        } = self;

        if method_validators.is_empty() && element_validators.is_empty() {
            return ValidationResult::success();
        }

        let start = Instant::now();
        let operation = metadata.operation().name().to_string();

        let outcome = run_method_pass(&metadata, &mut method_validators)
            .and_then(|_| run_parameter_pass(&metadata, &mut element_validators));

        log::debug!("Validated {} in {:?}", operation, start.elapsed());

        match outcome {
            Ok(values) => ValidationResult::with_values(values),
            Err(error) => {
                log::error!("Validation of {} failed: {}", operation, error);
                ValidationResult::failure(error)
            }
        }
    }
}

fn run_method_pass(
    metadata: &ValidationMetadata,
    handlers: &mut [Box<dyn MethodValidatorHandler>],
) -> BindingResult<()> {
    let directives = metadata.operation().directives();

    for handler in handlers.iter_mut() {
        if !handler.applies_to(directives) {
            log::debug!("Method handler {} not applicable", handler.name());
            continue;
        }

        let mut chain = ValidationChain::new();
        handler.handle(metadata, &mut chain)?;
        if !chain.should_continue() {
            log::debug!("Method pass intercepted by {}", handler.name());
            break;
        }
    }
    Ok(())
}

fn run_parameter_pass(
    metadata: &ValidationMetadata,
    handlers: &mut [Box<dyn ElementValidatorHandler>],
) -> BindingResult<Vec<Value>> {
    let parameters = metadata.operation().parameters();
    let mut values = Vec::with_capacity(parameters.len());

    for (position, spec) in parameters.iter().enumerate() {
        let name = metadata
            .param_names()
            .get(position)
            .map(String::as_str)
            .unwrap_or(spec.name.as_str());
        let element = ElementMetadata::parameter(spec, position, name);
        let mut last = Value::Null;

        for handler in handlers.iter_mut() {
            if !handler.applies_to(element.directives) {
                continue;
            }

            let mut chain = ValidationChain::new();
            last = handler.handle(metadata, &mut chain, &element)?;
            if !chain.should_continue() {
                log::debug!("Parameter {} bound by {}", name, handler.name());
                break;
            }
        }

        if last.is_null() {
            last = spec.param_type.default_value();
        }
        values.push(last);
    }
    Ok(values)
}
