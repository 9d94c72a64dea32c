//! Registry of user-supplied operation-level validators.
//!
//! `OperationArity` names custom handlers; the arity handler looks the names
//! up here and runs a fresh instance of each.

use crate::validation::chain::ValidationChain;
use indexmap::IndexMap;
use std::sync::Arc;

/// User-supplied check over the whole raw input sequence.
///
/// Implementations may fail the validation by returning an error, or call
/// [`ValidationChain::intercept`] to skip the built-in count check. A handler
/// that never returns blocks the calling thread; there is no timeout.
pub trait CustomValidatorHandler: Send {
    /// Check `raw_inputs`.
    fn handle(&self, raw_inputs: &[String], chain: &mut ValidationChain) -> anyhow::Result<()>;
}

impl<F> CustomValidatorHandler for F
where
    F: Fn(&[String], &mut ValidationChain) -> anyhow::Result<()> + Send,
{
    fn handle(&self, raw_inputs: &[String], chain: &mut ValidationChain) -> anyhow::Result<()> {
        self(raw_inputs, chain)
    }
}

/// Factory function for creating handler instances.
pub type HandlerFactory = Arc<dyn Fn() -> Box<dyn CustomValidatorHandler> + Send + Sync>;

/// Registry entry containing a factory and its description.
#[derive(Clone)]
pub struct RegistryEntry {
    /// Factory function to create instances.
    pub factory: HandlerFactory,
    /// What the handler checks.
    pub description: String,
    /// Whether this handler may be created.
    pub enabled: bool,
}

/// Named custom validator factories.
#[derive(Clone, Default)]
pub struct CustomHandlerRegistry {
    handlers: IndexMap<String, RegistryEntry>,
}

impl CustomHandlerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler factory under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn CustomValidatorHandler> + Send + Sync + 'static,
    {
        self.register_with_description(name, String::new(), factory);
    }

    /// Register a handler factory with a description.
    pub fn register_with_description<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        factory: F,
    ) where
        F: Fn() -> Box<dyn CustomValidatorHandler> + Send + Sync + 'static,
    {
        let name = name.into();
        log::debug!("Registering custom handler '{}'", name);
        self.handlers.insert(
            name,
            RegistryEntry {
                factory: Arc::new(factory),
                description: description.into(),
                enabled: true,
            },
        );
    }

    /// Create a new instance of a handler by name.
    ///
    /// Returns `None` for unknown or disabled handlers.
    pub fn create(&self, name: &str) -> Option<Box<dyn CustomValidatorHandler>> {
        self.handlers
            .get(name)
            .filter(|e| e.enabled)
            .map(|e| (e.factory)())
    }

    /// Get a registry entry.
    pub fn get_entry(&self, name: &str) -> Option<&RegistryEntry> {
        self.handlers.get(name)
    }

    /// Check if a handler is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Enable or disable a handler.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        if let Some(entry) = self.handlers.get_mut(name) {
            entry.enabled = enabled;
            true
        } else {
            false
        }
    }

    /// Unregister a handler.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.handlers.shift_remove(name).is_some()
    }

    /// Get all registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(|s| s.as_str())
    }

    /// Get the total number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for CustomHandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomHandlerRegistry")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Intercepting;

    impl CustomValidatorHandler for Intercepting {
        fn handle(&self, _raw: &[String], chain: &mut ValidationChain) -> anyhow::Result<()> {
            chain.intercept();
            Ok(())
        }
    }

    fn registry() -> CustomHandlerRegistry {
        let mut registry = CustomHandlerRegistry::new();
        registry.register("intercepting", || Box::new(Intercepting));
        registry.register_with_description("non_empty", "at least one input", || {
            Box::new(|raw: &[String], _chain: &mut ValidationChain| -> anyhow::Result<()> {
                anyhow::ensure!(!raw.is_empty(), "no inputs");
                Ok(())
            })
        });
        registry
    }

    #[test]
    fn test_registry_creation() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("intercepting"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["intercepting", "non_empty"]);
        assert_eq!(registry.get_entry("non_empty").unwrap().description, "at least one input");
    }

    #[test]
    fn test_create_runs_fresh_instance() {
        let registry = registry();
        let handler = registry.create("intercepting").unwrap();
        let mut chain = ValidationChain::new();
        handler.handle(&[], &mut chain).unwrap();
        assert!(!chain.should_continue());

        let handler = registry.create("non_empty").unwrap();
        let error = handler.handle(&[], &mut ValidationChain::new()).unwrap_err();
        assert_eq!(error.to_string(), "no inputs");
    }

    #[test]
    fn test_disable_and_unregister() {
        let mut registry = registry();
        assert!(registry.set_enabled("intercepting", false));
        assert!(registry.create("intercepting").is_none());
        assert!(registry.contains("intercepting"));

        assert!(registry.unregister("intercepting"));
        assert!(!registry.unregister("intercepting"));
        assert!(!registry.set_enabled("missing", true));
        assert_eq!(registry.len(), 1);
    }
}
