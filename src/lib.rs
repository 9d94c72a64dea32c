//! # Parambind - Declarative parameter binding
//!
//! Parambind converts a flat list of raw string/JSON inputs into the typed,
//! constraint-checked arguments of a target operation, or fails with a
//! precise diagnostic.
//!
//! ## Features
//!
//! - **Directive-driven binding**: positional scalars, JSON documents and paths,
//!   structured records, whole-input lists and output sinks
//! - **Handler chain**: operation-level and parameter-level handlers with
//!   short-circuit (`intercept`) semantics
//! - **Declarative constraints**: required, range, size, pattern, one-of and
//!   custom predicates, with English or Chinese messages
//! - **Extensible**: custom operation-level validators through a registry
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use parambind::prelude::*;
//! use std::sync::Arc;
//!
//! let operation = TargetOperation::builder("greet")
//!     .directive(Directive::arity(2))
//!     .parameter(ParameterSpec::positional("name", ValueType::String, 0)
//!         .with_constraint(Constraint::NotBlank))
//!     .parameter(ParameterSpec::positional("age", ValueType::Integer, 1)
//!         .with_constraint(Constraint::Range { min: 10.0, max: 20.0 }))
//!     .build();
//!
//! let metadata = ValidationMetadata::new(
//!     Arc::new(operation),
//!     vec!["cyk".to_string(), "18".to_string()],
//!     OutputBuffer::new(),
//! );
//!
//! let result = ValidationBuilder::with_builtins(metadata, Arc::new(CustomHandlerRegistry::new()))
//!     .build()
//!     .validate();
//!
//! assert!(result.is_success());
//! assert_eq!(result.param_values()[1], Value::Integer(18));
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: values, constraints, directives, records, operations, errors
//!   and configuration
//! - [`validation`]: metadata, chain, constraint engine, handlers and the
//!   pipeline that drives them

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod validation;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use parambind::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{OutputBuffer, Value, ValueType};

    // Declarations
    pub use crate::core::constraint::Constraint;
    pub use crate::core::directive::{Directive, OperationArity};
    pub use crate::core::operation::{ParameterSpec, TargetOperation};
    pub use crate::core::record::{FieldSchema, RecordSchema, RecordValue};

    // Configuration
    pub use crate::core::config::{Locale, ValidationConfig};

    // Errors
    pub use crate::core::error::{BindingError, BindingResult, ErrorKind};

    // Validation
    pub use crate::validation::chain::ValidationChain;
    pub use crate::validation::metadata::ValidationMetadata;
    pub use crate::validation::pipeline::{Validation, ValidationBuilder};
    pub use crate::validation::registry::{CustomHandlerRegistry, CustomValidatorHandler};
    pub use crate::validation::result::ValidationResult;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "parambind");
    }

    #[test]
    fn test_output_sink_end_to_end() {
        let operation = TargetOperation::builder("collect")
            .parameter(ParameterSpec::positional("name", ValueType::String, 0))
            .parameter(ParameterSpec::output_sink("out"))
            .build();
        let output = OutputBuffer::new();
        let metadata =
            ValidationMetadata::new(Arc::new(operation), vec!["cyk".to_string()], output.clone());

        let result = ValidationBuilder::with_builtins(metadata, Arc::new(CustomHandlerRegistry::new()))
            .build()
            .validate();
        assert!(result.is_success());

        let values = result.into_param_values();
        values[1].as_output().unwrap().push("done");
        assert_eq!(output.snapshot(), vec!["done".to_string()]);
    }

    #[test]
    fn test_bound_record_deserializes() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Pair {
            key: String,
            count: i64,
        }

        let schema = RecordSchema::builder("Pair")
            .field(FieldSchema::new("key", ValueType::String))
            .field(FieldSchema::new("count", ValueType::Integer))
            .build();
        let operation = TargetOperation::builder("pair")
            .parameter(ParameterSpec::record("pair", schema))
            .build();
        let metadata = ValidationMetadata::new(
            Arc::new(operation),
            vec!["a".to_string(), "3".to_string()],
            OutputBuffer::new(),
        );

        let result = ValidationBuilder::with_builtins(metadata, Arc::new(CustomHandlerRegistry::new()))
            .build()
            .validate();
        let pair: Pair = result.param_values()[0].deserialize_into().unwrap();
        assert_eq!(
            pair,
            Pair {
                key: "a".to_string(),
                count: 3
            }
        );
    }
}
