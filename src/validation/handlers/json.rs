//! JSON binding.

use super::{check_index, ensure_valid, initialized, ElementValidatorHandler, Initializable};
use crate::core::directive::JsonBinding;
use crate::core::error::{BindingError, BindingResult};
use crate::core::json_path;
use crate::core::types::Value;
use crate::validation::chain::ValidationChain;
use crate::validation::engine::{wrap, RecordView};
use crate::validation::metadata::{ElementMetadata, ValidationMetadata};

/// Binds a JSON document, or a sub-value of it, from one raw input.
#[derive(Debug, Default)]
pub struct JsonHandler {
    directive: Option<JsonBinding>,
}

impl JsonHandler {
    /// Create an uninitialized handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handler already bound to `directive`.
    pub fn with_directive(directive: JsonBinding) -> Self {
        Self {
            directive: Some(directive),
        }
    }
}

impl Initializable for JsonHandler {
    type Directive = JsonBinding;

    fn initialize(&mut self, directive: JsonBinding) {
        self.directive = Some(directive);
    }
}

impl ElementValidatorHandler for JsonHandler {
    fn name(&self) -> &'static str {
        "json"
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
        let document = parse_document(raw)?;

        let selected = if directive.has_path() {
            select(&document, &directive.json_path)?
        } else {
            document
        };
        let value = element.value_type.from_json(element.name, &selected)?;

        if element.on_parameter() {
            ensure_valid(metadata, &wrap(element.name, &value, element.constraints))?;
        }
        if let (Some(schema), Value::Record(record)) = (element.value_type.as_record(), &value) {
            ensure_valid(metadata, &RecordView::new(schema, record))?;
        }
        Ok(value)
    }
}

/// Check that `raw` is a JSON object or array, then parse it.
fn parse_document(raw: &str) -> BindingResult<serde_json::Value> {
    let trimmed = raw.trim();
    let bracketed = (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'));
    if !bracketed {
        return Err(BindingError::NotAJsonString {
            text: raw.to_string(),
        });
    }

    serde_json::from_str(trimmed).map_err(|e| BindingError::JsonParse {
        text: raw.to_string(),
        reason: e.to_string(),
    })
}

fn select(document: &serde_json::Value, path: &str) -> BindingResult<serde_json::Value> {
    let path_error = |reason: String| BindingError::JsonPath {
        path: path.to_string(),
        reason,
    };

    let segments = json_path::parse(path).map_err(&path_error)?;
    json_path::select(document, &segments)
        .cloned()
        .ok_or_else(|| path_error("path resolves to nothing".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constraint::Constraint;
    use crate::core::operation::{ParameterSpec, TargetOperation};
    use crate::core::record::{FieldSchema, RecordSchema};
    use crate::core::types::{OutputBuffer, ValueType};
    use crate::validation::handlers::Applicable;
    use std::sync::Arc;

    fn metadata(inputs: &[&str]) -> ValidationMetadata {
        ValidationMetadata::new(
            Arc::new(TargetOperation::builder("op").build()),
            inputs.iter().map(|s| s.to_string()).collect(),
            OutputBuffer::new(),
        )
    }

    fn bind(spec: &ParameterSpec, inputs: &[&str]) -> BindingResult<Value> {
        let mut handler = JsonHandler::new();
        assert!(handler.applies_to(&spec.directives));
        let element = ElementMetadata::parameter(spec, 0, &spec.name);
        handler.handle(&metadata(inputs), &mut ValidationChain::new(), &element)
    }

    #[test]
    fn test_whole_document() {
        let spec = ParameterSpec::json("ids", ValueType::List(Box::new(ValueType::Integer)), 0);
        assert_eq!(
            bind(&spec, &["[1, 2]"]).unwrap(),
            Value::List(vec![1.into(), 2.into()])
        );
    }

    #[test]
    fn test_path() {
        let spec = ParameterSpec::json_path("addresses", ValueType::string_list(), 0, "$.key2");
        let value = bind(&spec, &[r#"{"key1":"value1","key2":["value2","value3"]}"#]).unwrap();
        assert_eq!(value, Value::List(vec!["value2".into(), "value3".into()]));

        let spec = ParameterSpec::json_path("missing", ValueType::String, 0, "$.nope");
        assert!(matches!(
            bind(&spec, &[r#"{"key1":"value1"}"#]),
            Err(BindingError::JsonPath { .. })
        ));
    }

    #[test]
    fn test_not_json() {
        let spec = ParameterSpec::json("doc", ValueType::Json, 0);
        assert_eq!(
            bind(&spec, &["hello"]).unwrap_err().to_string(),
            "\"hello\" is not a JSON string"
        );
        assert!(matches!(
            bind(&spec, &["{not json}"]),
            Err(BindingError::JsonParse { .. })
        ));
    }

    #[test]
    fn test_parameter_constraints() {
        let spec = ParameterSpec::json("tags", ValueType::string_list(), 0)
            .with_constraint(Constraint::max_size(1));
        assert!(matches!(
            bind(&spec, &[r#"["a","b"]"#]),
            Err(BindingError::ConstraintViolation { .. })
        ));
    }

    #[test]
    fn test_field_record_is_checked() {
        let inner = RecordSchema::builder("Address")
            .field(FieldSchema::new("city", ValueType::String).with_constraint(Constraint::NotBlank))
            .build();
        let field = FieldSchema::new("address", ValueType::record(inner)).json(0);
        let handler = JsonHandler::with_directive(JsonBinding::new(0));
        let element = ElementMetadata::field(&field, Some(0));

        let value = handler
            .handle(&metadata(&[r#"{"city":"Chengdu"}"#]), &mut ValidationChain::new(), &element)
            .unwrap();
        assert_eq!(value.as_record().unwrap().get("city"), Some(&Value::from("Chengdu")));

        let error = handler
            .handle(&metadata(&[r#"{"city":" "}"#]), &mut ValidationChain::new(), &element)
            .unwrap_err();
        assert_eq!(error.to_string(), "city must not be blank, invalid value:  .");
    }
}
