//! Output sink placeholder.

use super::{ElementValidatorHandler, Initializable};
use crate::core::directive::OutputSink;
use crate::core::error::BindingResult;
use crate::core::types::Value;
use crate::validation::chain::ValidationChain;
use crate::validation::metadata::{ElementMetadata, ValidationMetadata};

/// Hands the invocation's output buffer to the marked parameter.
///
/// Nothing is validated; the invoked operation fills the buffer itself.
#[derive(Debug, Default)]
pub struct OutputSinkHandler;

impl OutputSinkHandler {
    /// Create a handler.
    pub fn new() -> Self {
        Self
    }
}

impl Initializable for OutputSinkHandler {
    type Directive = OutputSink;

    fn initialize(&mut self, _directive: OutputSink) {}
}

impl ElementValidatorHandler for OutputSinkHandler {
    fn name(&self) -> &'static str {
        "output"
    }

    fn handle(
        &self,
        metadata: &ValidationMetadata,
        chain: &mut ValidationChain,
        _element: &ElementMetadata<'_>,
    ) -> BindingResult<Value> {
        chain.intercept();
        Ok(Value::Output(metadata.output().clone()))
    }
}
