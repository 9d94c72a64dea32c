//! Handler contracts and the built-in handlers.
//!
//! A handler is bound to one directive type. Before each use the pipeline
//! asks whether the current target carries that directive; if it does, the
//! handler is initialized with it and then invoked.

pub mod arity;
pub mod json;
pub mod list;
pub mod output;
pub mod positional;
pub mod record;

pub use arity::ArityHandler;
pub use json::JsonHandler;
pub use list::ListHandler;
pub use output::OutputSinkHandler;
pub use positional::PositionalHandler;
pub use record::RecordHandler;

use crate::core::directive::{find, Directive, DirectiveVariant};
use crate::core::error::{BindingError, BindingResult};
use crate::core::types::Value;
use crate::validation::chain::ValidationChain;
use crate::validation::engine::Constrained;
use crate::validation::metadata::{ElementMetadata, ValidationMetadata};

/// Initialization hook binding a handler to its directive.
pub trait Initializable {
    /// Directive type this handler understands.
    type Directive: DirectiveVariant;

    /// Store the directive found on the current target.
    fn initialize(&mut self, directive: Self::Directive);
}

/// Applicability test, combined with initialization.
pub trait Applicable {
    /// If `directives` carries this handler's directive, initialize the
    /// handler with it and return `true`.
    fn applies_to(&mut self, directives: &[Directive]) -> bool;
}

impl<T: Initializable> Applicable for T {
    fn applies_to(&mut self, directives: &[Directive]) -> bool {
        match find::<T::Directive>(directives) {
            Some(directive) => {
                self.initialize(directive.clone());
                true
            }
            None => false,
        }
    }
}

/// Operation-level handler.
pub trait MethodValidatorHandler: Applicable + Send {
    /// Handler name for logging.
    fn name(&self) -> &'static str;

    /// Check the invocation as a whole.
    fn handle(&self, metadata: &ValidationMetadata, chain: &mut ValidationChain)
        -> BindingResult<()>;
}

/// Slot-level handler producing a bound value.
pub trait ElementValidatorHandler: Applicable + Send {
    /// Handler name for logging.
    fn name(&self) -> &'static str;

    /// Produce the typed value for `element`.
    fn handle(
        &self,
        metadata: &ValidationMetadata,
        chain: &mut ValidationChain,
        element: &ElementMetadata<'_>,
    ) -> BindingResult<Value>;
}

// ============================================================================
// Shared checks
// ============================================================================

/// Borrow the directive a handler was initialized with.
pub(crate) fn initialized<'a, D>(directive: &'a Option<D>, handler: &str) -> BindingResult<&'a D> {
    directive.as_ref().ok_or_else(|| BindingError::NotInitialized {
        handler: handler.to_string(),
    })
}

/// Require exactly `expected` inputs when a size is declared.
pub(crate) fn check_size(expected: Option<usize>, actual: usize) -> BindingResult<()> {
    match expected {
        Some(expected) if expected != actual => {
            Err(BindingError::CountMismatch { expected, actual })
        }
        _ => Ok(()),
    }
}

/// Require `index` to address one of `actual` inputs.
pub(crate) fn check_index(name: &str, index: usize, actual: usize) -> BindingResult<()> {
    if index < actual {
        Ok(())
    } else {
        Err(BindingError::OutOfRange {
            parameter: name.to_string(),
            position: index + 1,
            actual,
        })
    }
}

/// Run the constraint engine and turn violations into an error.
pub(crate) fn ensure_valid(
    metadata: &ValidationMetadata,
    target: &dyn Constrained,
) -> BindingResult<()> {
    let violations = metadata.engine().check(target);
    if violations.is_empty() {
        return Ok(());
    }

    let message = violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    Err(BindingError::ConstraintViolation {
        message,
        violations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::directive::Positional;

    #[derive(Default)]
    struct Probe {
        seen: Option<Positional>,
    }

    impl Initializable for Probe {
        type Directive = Positional;

        fn initialize(&mut self, directive: Positional) {
            self.seen = Some(directive);
        }
    }

    #[test]
    fn test_applies_to_initializes() {
        let mut probe = Probe::default();
        assert!(!probe.applies_to(&[Directive::list(None)]));
        assert!(probe.seen.is_none());

        assert!(probe.applies_to(&[Directive::list(None), Directive::positional(2)]));
        assert_eq!(probe.seen.as_ref().map(|p| p.index), Some(2));
    }

    #[test]
    fn test_check_size() {
        assert!(check_size(None, 3).is_ok());
        assert!(check_size(Some(3), 3).is_ok());
        assert_eq!(
            check_size(Some(4), 3),
            Err(BindingError::CountMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_check_index() {
        assert!(check_index("qq", 2, 3).is_ok());
        let error = check_index("qq", 3, 3).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Out of range. There are only 3 input parameters, but \"qq\" takes parameter 4."
        );
    }

    #[test]
    fn test_initialized_guard() {
        let none: Option<Positional> = None;
        assert!(matches!(
            initialized(&none, "positional"),
            Err(BindingError::NotInitialized { .. })
        ));
    }
}
