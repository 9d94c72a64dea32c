//! Target operation descriptions.
//!
//! A [`TargetOperation`] is the resolved signature the pipeline binds inputs
//! for: its parameters in order, each with a declared type, directives and
//! constraints, plus directives declared on the operation itself.

use crate::core::constraint::Constraint;
use crate::core::directive::Directive;
use crate::core::record::RecordSchema;
use crate::core::types::ValueType;

/// One declared parameter of a target operation.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    /// Parameter name
    pub name: String,
    /// Declared type
    pub param_type: ValueType,
    /// Binding directives
    pub directives: Vec<Directive>,
    /// Constraints checked on the bound value
    pub constraints: Vec<Constraint>,
}

impl ParameterSpec {
    /// Create a parameter without directives.
    pub fn new(name: impl Into<String>, param_type: ValueType) -> Self {
        Self {
            name: name.into(),
            param_type,
            directives: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Required positional parameter bound from input `index`.
    pub fn positional(name: impl Into<String>, param_type: ValueType, index: usize) -> Self {
        Self::new(name, param_type).with_directive(Directive::positional(index))
    }

    /// Positional parameter bound from input `index` without constraint checks.
    pub fn optional_positional(
        name: impl Into<String>,
        param_type: ValueType,
        index: usize,
    ) -> Self {
        Self::new(name, param_type).with_directive(Directive::optional_positional(index))
    }

    /// Parameter bound from the JSON document at input `index`.
    pub fn json(name: impl Into<String>, param_type: ValueType, index: usize) -> Self {
        Self::new(name, param_type).with_directive(Directive::json(index))
    }

    /// Parameter bound from the sub-value at `path` of the JSON document at `index`.
    pub fn json_path(
        name: impl Into<String>,
        param_type: ValueType,
        index: usize,
        path: impl Into<String>,
    ) -> Self {
        Self::new(name, param_type).with_directive(Directive::json_path(index, path))
    }

    /// Record parameter bound field by field.
    pub fn record(name: impl Into<String>, schema: RecordSchema) -> Self {
        Self::new(name, ValueType::record(schema)).with_directive(Directive::record(None))
    }

    /// Record parameter that also requires exactly `expected_size` inputs.
    pub fn record_sized(name: impl Into<String>, schema: RecordSchema, expected_size: usize) -> Self {
        Self::new(name, ValueType::record(schema))
            .with_directive(Directive::record(Some(expected_size)))
    }

    /// Parameter receiving every raw input as a list of strings.
    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::string_list()).with_directive(Directive::list(None))
    }

    /// List parameter that also requires exactly `expected_size` inputs.
    pub fn list_sized(name: impl Into<String>, expected_size: usize) -> Self {
        Self::new(name, ValueType::string_list()).with_directive(Directive::list(Some(expected_size)))
    }

    /// Parameter receiving the output buffer.
    pub fn output_sink(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::string_list()).with_directive(Directive::output_sink())
    }

    /// Add a directive.
    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Add a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// Resolved signature of the operation being invoked.
#[derive(Debug, Clone)]
pub struct TargetOperation {
    name: String,
    parameters: Vec<ParameterSpec>,
    directives: Vec<Directive>,
}

impl TargetOperation {
    /// Create a new operation builder.
    pub fn builder(name: impl Into<String>) -> TargetOperationBuilder {
        TargetOperationBuilder::new(name)
    }

    /// Operation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of declared parameters.
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// Parameters in declaration order.
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Parameter at `position`.
    pub fn parameter(&self, position: usize) -> Option<&ParameterSpec> {
        self.parameters.get(position)
    }

    /// Directives declared on the operation itself.
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Parameter names in declaration order.
    pub fn parameter_names(&self) -> Vec<String> {
        self.parameters.iter().map(|p| p.name.clone()).collect()
    }
}

/// Builder for TargetOperation.
pub struct TargetOperationBuilder {
    name: String,
    parameters: Vec<ParameterSpec>,
    directives: Vec<Directive>,
}

impl TargetOperationBuilder {
    /// Create a new builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            directives: Vec::new(),
        }
    }

    /// Add an operation-level directive.
    pub fn directive(mut self, directive: impl Into<Directive>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Add a parameter.
    pub fn parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Build the operation.
    pub fn build(self) -> TargetOperation {
        TargetOperation {
            name: self.name,
            parameters: self.parameters,
            directives: self.directives,
        }
    }
}
