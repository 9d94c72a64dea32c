//! Core types for the binding pipeline.
//!
//! This module contains the data model the pipeline works on:
//! - Value types and declared slot types
//! - Constraints and directives
//! - Record schemas and target operations
//! - Error types and configuration

pub mod config;
pub mod constraint;
pub mod directive;
pub mod error;
pub mod json_path;
pub mod operation;
pub mod record;
pub mod types;

// Re-export commonly used types
pub use config::{Locale, ValidationConfig};
pub use constraint::Constraint;
pub use directive::{
    Directive, DirectiveVariant, Ignore, JsonBinding, ListBinding, OperationArity, OutputSink,
    Positional, RecordBinding,
};
pub use error::{BindingError, BindingResult, ConfigError, ErrorKind};
pub use operation::{ParameterSpec, TargetOperation};
pub use record::{FieldSchema, RecordSchema, RecordValue};
pub use types::{OutputBuffer, Value, ValueType};
