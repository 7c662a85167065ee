//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the set-associative cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity or set size out of range, or configuration touched after
    /// initialization
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Data operation attempted before `initialize()`
    #[error("Cache has not been initialized")]
    NotInitialized,

    /// Absent key handed to `try_get`, `store` or `remove`
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The engine broke one of its own invariants
    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),
}

impl CacheError {
    /// Returns true when the error points at a bug in the engine rather than
    /// at misuse by the caller.
    pub fn is_internal(&self) -> bool {
        matches!(self, CacheError::InvariantViolation(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invariant_violation_is_internal() {
        assert!(CacheError::InvariantViolation("set overflow".to_string()).is_internal());
        assert!(!CacheError::NotInitialized.is_internal());
        assert!(!CacheError::Configuration("bad".to_string()).is_internal());
        assert!(!CacheError::InvalidArgument("key".to_string()).is_internal());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CacheError::NotInitialized.to_string(),
            "Cache has not been initialized"
        );
        assert_eq!(
            CacheError::Configuration("set_size must be >= 1".to_string()).to_string(),
            "Invalid configuration: set_size must be >= 1"
        );
    }
}
