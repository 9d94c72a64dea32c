//! Structured record binding.

use super::{
    check_index, check_size, ensure_valid, initialized, ElementValidatorHandler, Initializable,
    JsonHandler,
};
use crate::core::directive::RecordBinding;
use crate::core::error::{BindingError, BindingResult};
use crate::core::types::Value;
use crate::validation::chain::ValidationChain;
use crate::validation::engine::RecordView;
use crate::validation::metadata::{ElementMetadata, ValidationMetadata};

/// Binds a structured record field by field.
///
/// Fields without a JSON binding consume raw inputs in declaration order
/// through a cursor of their own; JSON-bound fields read their declared
/// index and leave the cursor where it is. Class-level and ignored fields
/// are skipped. The populated record is checked as a whole.
#[derive(Debug, Default)]
pub struct RecordHandler {
    directive: Option<RecordBinding>,
}

impl RecordHandler {
    /// Create an uninitialized handler.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Initializable for RecordHandler {
    type Directive = RecordBinding;

    fn initialize(&mut self, directive: RecordBinding) {
        self.directive = Some(directive);
    }
}

impl ElementValidatorHandler for RecordHandler {
    fn name(&self) -> &'static str {
        "record"
    }

    fn handle(
        &self,
        metadata: &ValidationMetadata,
        chain: &mut ValidationChain,
        element: &ElementMetadata<'_>,
    ) -> BindingResult<Value> {
        chain.intercept();
        let directive = initialized(&self.directive, self.name())?;

        if !element.on_parameter() {
            return Err(BindingError::UnsupportedElement {
                directive: "Record".to_string(),
                element: element.name.to_string(),
            });
        }
        let input_count = metadata.input_count();
        check_size(directive.expected_size, input_count)?;

        let schema = element
            .value_type
            .as_record()
            .ok_or_else(|| BindingError::NotAStructuredRecord {
                parameter: element.name.to_string(),
            })?;

        let mut record = schema.instantiate();
        let mut cursor = 0;

        for field in schema.fields().iter().filter(|f| f.is_bindable()) {
            let value = match field.json_binding() {
                Some(binding) => {
                    let handler = JsonHandler::with_directive(binding.clone());
                    let field_element = ElementMetadata::field(field, Some(binding.index));
                    handler.handle(metadata, &mut ValidationChain::new(), &field_element)?
                }
                None => {
                    check_index(field.name(), cursor, input_count)?;
                    let raw = &metadata.raw_inputs()[cursor];
                    cursor += 1;
                    field.field_type().cast_str(field.name(), raw)?
                }
            };
            field.assign(&mut record, value);
        }

        log::debug!(
            "Bound {} from {} positional input(s)",
            schema.name(),
            cursor
        );
        ensure_valid(metadata, &RecordView::new(schema, &record))?;
        Ok(Value::Record(record))
    }
}
