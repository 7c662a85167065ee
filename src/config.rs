//! Configuration Module
//!
//! Holds the settings a cache is built from. Every field may be left unset;
//! defaults are applied and bounds are checked when the configuration is
//! resolved at `initialize()` time, after which it is frozen.

use std::env;

use serde::Deserialize;
use tracing::warn;

use crate::cache::{EvictionPolicy, DEFAULT_SET_SIZE, DEFAULT_TOTAL_CAPACITY, MAX_CAPACITY};
use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables, deserialized from
/// a host's own configuration file, or set directly before initialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Total number of items the cache may hold (default: 500)
    pub total_capacity: Option<usize>,
    /// Number of items per associative set (default: 10)
    pub set_size: Option<usize>,
    /// Eviction policy applied within a full set (default: least recently used)
    pub eviction_policy: Option<EvictionPolicy>,
    /// Materialize every set at initialization instead of on first access
    pub eager_set_creation: bool,
}

impl CacheConfig {
    /// Creates an empty configuration where every value falls back to its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TOTAL_CAPACITY` - Total item budget
    /// - `CACHE_SET_SIZE` - Items per set
    /// - `CACHE_EVICTION_POLICY` - `lru` or `mru`
    /// - `CACHE_EAGER_SETS` - `true`/`1`/`yes`/`on` to pre-allocate all sets,
    ///   `false`/`0`/`no`/`off` (any case) to create them on first use
    ///
    /// Missing or unparsable values are left unset.
    pub fn from_env() -> Self {
        Self {
            total_capacity: env::var("CACHE_TOTAL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok()),
            set_size: env::var("CACHE_SET_SIZE")
                .ok()
                .and_then(|v| v.parse().ok()),
            eviction_policy: env::var("CACHE_EVICTION_POLICY")
                .ok()
                .and_then(|v| v.parse().ok()),
            eager_set_creation: env::var("CACHE_EAGER_SETS")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }

    // == Builder Helpers ==
    pub fn with_total_capacity(mut self, total_capacity: usize) -> Self {
        self.total_capacity = Some(total_capacity);
        self
    }

    pub fn with_set_size(mut self, set_size: usize) -> Self {
        self.set_size = Some(set_size);
        self
    }

    pub fn with_eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = Some(policy);
        self
    }

    pub fn with_eager_set_creation(mut self, eager: bool) -> Self {
        self.eager_set_creation = eager;
        self
    }

    // == Resolve ==
    /// Applies defaults and validates `1 <= set_size <= total_capacity <= MAX_CAPACITY`.
    ///
    /// The set count is `total_capacity / set_size`; any remainder capacity is
    /// discarded rather than spread over the sets.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let total_capacity = self.total_capacity.unwrap_or(DEFAULT_TOTAL_CAPACITY);
        let set_size = self.set_size.unwrap_or(DEFAULT_SET_SIZE);

        let problem = if set_size < 1 {
            Some(format!("set_size must be at least 1, got {}", set_size))
        } else if total_capacity < 1 {
            Some(format!(
                "total_capacity must be at least 1, got {}",
                total_capacity
            ))
        } else if set_size > total_capacity {
            Some(format!(
                "set_size {} exceeds total_capacity {}",
                set_size, total_capacity
            ))
        } else if total_capacity > MAX_CAPACITY {
            Some(format!(
                "total_capacity {} exceeds the maximum of {}",
                total_capacity, MAX_CAPACITY
            ))
        } else {
            None
        };

        if let Some(message) = problem {
            warn!("Rejected cache configuration: {}", message);
            return Err(CacheError::Configuration(message));
        }

        Ok(ResolvedConfig {
            total_capacity,
            set_size,
            set_count: total_capacity / set_size,
            policy: self.eviction_policy.unwrap_or_default(),
            eager_set_creation: self.eager_set_creation,
        })
    }
}

/// Parses the boolean spellings accepted in environment variables.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// == Resolved Config ==
/// Validated, frozen configuration of an initialized cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub total_capacity: usize,
    pub set_size: usize,
    /// Number of associative sets, `total_capacity / set_size`
    pub set_count: usize,
    pub policy: EvictionPolicy,
    pub eager_set_creation: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_resolves_to_defaults() {
        let resolved = CacheConfig::default().resolve().unwrap();
        assert_eq!(resolved.total_capacity, 500);
        assert_eq!(resolved.set_size, 10);
        assert_eq!(resolved.set_count, 50);
        assert_eq!(resolved.policy, EvictionPolicy::LeastRecentlyUsed);
        assert!(!resolved.eager_set_creation);
    }

    #[test]
    fn test_remainder_capacity_is_discarded() {
        let resolved = CacheConfig::new()
            .with_total_capacity(25)
            .with_set_size(10)
            .resolve()
            .unwrap();
        assert_eq!(resolved.set_count, 2);
    }

    #[test]
    fn test_set_size_equal_to_capacity_gives_one_set() {
        let resolved = CacheConfig::new()
            .with_total_capacity(7)
            .with_set_size(7)
            .resolve()
            .unwrap();
        assert_eq!(resolved.set_count, 1);
    }

    #[test]
    fn test_rejects_zero_set_size() {
        let result = CacheConfig::new().with_set_size(0).resolve();
        assert!(matches!(result, Err(CacheError::Configuration(_))));
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let result = CacheConfig::new()
            .with_total_capacity(0)
            .with_set_size(1)
            .resolve();
        assert!(matches!(result, Err(CacheError::Configuration(_))));
    }

    #[test]
    fn test_rejects_set_size_above_capacity() {
        let result = CacheConfig::new()
            .with_total_capacity(5)
            .with_set_size(6)
            .resolve();
        assert!(matches!(result, Err(CacheError::Configuration(_))));
    }

    #[test]
    fn test_rejects_capacity_above_maximum() {
        let result = CacheConfig::new()
            .with_total_capacity(MAX_CAPACITY + 1)
            .resolve();
        assert!(matches!(result, Err(CacheError::Configuration(_))));

        let at_limit = CacheConfig::new()
            .with_total_capacity(MAX_CAPACITY)
            .with_set_size(1000)
            .resolve()
            .unwrap();
        assert_eq!(at_limit.set_count, MAX_CAPACITY / 1000);
    }

    #[test]
    fn test_config_deserialize() {
        let json = r#"{"total_capacity": 64, "set_size": 4, "eviction_policy": "mru"}"#;
        let config: CacheConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.total_capacity, Some(64));
        assert_eq!(config.set_size, Some(4));
        assert_eq!(config.eviction_policy, Some(EvictionPolicy::MostRecentlyUsed));
        assert!(!config.eager_set_creation);
    }

    #[test]
    fn test_parse_flag_spellings() {
        for truthy in ["true", "TRUE", "1", "yes", " On "] {
            assert_eq!(parse_flag(truthy), Some(true), "{:?}", truthy);
        }
        for falsy in ["false", "0", "No", "off"] {
            assert_eq!(parse_flag(falsy), Some(false), "{:?}", falsy);
        }
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn test_config_from_env() {
        env::set_var("CACHE_TOTAL_CAPACITY", "120");
        env::set_var("CACHE_SET_SIZE", "not-a-number");
        env::set_var("CACHE_EVICTION_POLICY", "mru");
        env::set_var("CACHE_EAGER_SETS", "1");

        let config = CacheConfig::from_env();

        env::remove_var("CACHE_TOTAL_CAPACITY");
        env::remove_var("CACHE_SET_SIZE");
        env::remove_var("CACHE_EVICTION_POLICY");
        env::remove_var("CACHE_EAGER_SETS");

        assert_eq!(config.total_capacity, Some(120));
        assert_eq!(config.set_size, None);
        assert_eq!(config.eviction_policy, Some(EvictionPolicy::MostRecentlyUsed));
        assert!(config.eager_set_creation);
    }
}
