//! Engine configuration.
//!
//! Hosts usually build this from a JSON blob shipped with the app, falling
//! back to [`EngineConfig::default`] for anything left out.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for an [`Engine`](crate::engine::Engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Thread one cache tree through every pass instead of starting fresh.
    pub retain_cache: bool,
    /// Capacity of the shared cache used by contents with a caching key.
    pub keyed_cache_capacity: usize,
    /// Passes a cache subtree or keyed entry may go unvisited before `gc` drops it.
    pub cache_max_age: u64,
    /// Drop state nodes whose identifiers disappeared after each layout pass.
    pub prune_state: bool,
    /// Warn when an element measures larger than a bounded constraint.
    pub warn_on_oversize: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retain_cache: true,
            keyed_cache_capacity: 512,
            cache_max_age: 8,
            prune_state: true,
            warn_on_oversize: true,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keyed_cache_capacity == 0 {
            return Err(ConfigError::Invalid(
                "keyed_cache_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
