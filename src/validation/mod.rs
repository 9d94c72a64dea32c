//! Validation and binding pipeline.
//!
//! The pipeline runs operation-level handlers first, then binds each
//! parameter through the element-level handlers, and reports the outcome as
//! a [`ValidationResult`].

pub mod chain;
pub mod engine;
pub mod handlers;
pub mod metadata;
pub mod pipeline;
pub mod registry;
pub mod result;

pub use chain::ValidationChain;
pub use engine::{
    wrap, ConstrainedField, Constrained, ConstraintEngine, DeclarativeEngine, RecordView,
    SyntheticRecord, Violation,
};
pub use handlers::{
    Applicable, ElementValidatorHandler, Initializable, MethodValidatorHandler,
};
pub use metadata::{ElementKind, ElementMetadata, ValidationMetadata};
pub use pipeline::{Validation, ValidationBuilder};
pub use registry::{CustomHandlerRegistry, CustomValidatorHandler, HandlerFactory};
pub use result::ValidationResult;
