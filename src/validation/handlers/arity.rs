//! Operation arity and custom operation-level checks.

use super::{check_size, initialized, Initializable, MethodValidatorHandler};
use crate::core::directive::OperationArity;
use crate::core::error::{BindingError, BindingResult};
use crate::validation::chain::ValidationChain;
use crate::validation::metadata::ValidationMetadata;
use crate::validation::registry::CustomHandlerRegistry;
use std::sync::Arc;

/// Runs the configured custom handlers, then checks the input count.
///
/// A custom handler that intercepts the chain suppresses the count check.
/// Names missing from the registry, or disabled there, are skipped.
#[derive(Debug)]
pub struct ArityHandler {
    registry: Arc<CustomHandlerRegistry>,
    directive: Option<OperationArity>,
}

impl ArityHandler {
    /// Create a handler resolving custom handler names in `registry`.
    pub fn new(registry: Arc<CustomHandlerRegistry>) -> Self {
        Self {
            registry,
            directive: None,
        }
    }
}

impl Default for ArityHandler {
    fn default() -> Self {
        Self::new(Arc::new(CustomHandlerRegistry::new()))
    }
}

impl Initializable for ArityHandler {
    type Directive = OperationArity;

    fn initialize(&mut self, directive: OperationArity) {
        self.directive = Some(directive);
    }
}

impl MethodValidatorHandler for ArityHandler {
    fn name(&self) -> &'static str {
        "arity"
    }

    fn handle(
        &self,
        metadata: &ValidationMetadata,
        chain: &mut ValidationChain,
    ) -> BindingResult<()> {
        let directive = initialized(&self.directive, self.name())?;

        for name in &directive.custom_handlers {
            let Some(handler) = self.registry.create(name) else {
                log::warn!("Skipping custom handler '{}': not registered or disabled", name);
                continue;
            };

            handler
                .handle(metadata.raw_inputs(), chain)
                .map_err(|e| BindingError::CustomValidation {
                    handler: name.clone(),
                    message: format!("{:#}", e),
                })?;

            if !chain.should_continue() {
                log::debug!("Custom handler '{}' intercepted the arity check", name);
                return Ok(());
            }
        }

        check_size(directive.expected_size, metadata.input_count())
    }
}
