//! Error types.
//!
//! Measurement and layout have no recoverable failures. Anything listed in
//! [`ContractViolation`] is a programmer error and aborts the pass.

use thiserror::Error;

use crate::primitives::Size;

/// A broken layout contract. Raised with [`ContractViolation::raise`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractViolation {
    #[error("layout `{layout}` returned {actual} attributes for {expected} children")]
    AttributeCountMismatch {
        layout: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("single-child layout `{layout}` requires exactly one child, found {actual}")]
    SingleChildCount { layout: &'static str, actual: usize },

    #[error("element `{element}` measured to {size:?}; sizes must be finite and non-negative")]
    InvalidSize { element: &'static str, size: Size },
}

impl ContractViolation {
    /// Abort the current pass.
    #[track_caller]
    pub fn raise(self) -> ! {
        tracing::error!("{}", self);
        panic!("{self}")
    }
}

/// Failure to load an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_messages() {
        let v = ContractViolation::AttributeCountMismatch {
            layout: "Overlay",
            expected: 3,
            actual: 2,
        };
        assert_eq!(v.to_string(), "layout `Overlay` returned 2 attributes for 3 children");

        let v = ContractViolation::SingleChildCount { layout: "Inset", actual: 0 };
        assert!(v.to_string().contains("exactly one child"));
    }

    #[test]
    #[should_panic(expected = "requires exactly one child")]
    fn test_raise_panics_with_message() {
        ContractViolation::SingleChildCount { layout: "Inset", actual: 2 }.raise();
    }
}
