//! Per-invocation chain control.

/// One-shot flag deciding whether the pipeline advances to the next handler.
///
/// A fresh chain is created for every handler invocation; it is never shared
/// across slots or passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationChain {
    advance: bool,
}

impl ValidationChain {
    /// Create a chain that advances.
    pub fn new() -> Self {
        Self { advance: true }
    }

    /// Claim the current slot or pass; later handlers do not run.
    pub fn intercept(&mut self) {
        self.advance = false;
    }

    /// Whether the next handler should run.
    pub fn should_continue(&self) -> bool {
        self.advance
    }
}

impl Default for ValidationChain {
    fn default() -> Self {
        Self::new()
    }
}
