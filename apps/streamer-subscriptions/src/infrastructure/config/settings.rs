//! Bridge Configuration Settings
//!
//! Settings for the handle registry, loaded from environment variables.

use crate::application::bridge::{DEFAULT_MAX_HANDLES, HandleRegistry};

/// Environment variable holding the registry capacity.
pub const MAX_HANDLES_VAR: &str = "STREAMER_SUBS_MAX_HANDLES";

/// Registry settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Ceiling on simultaneously live handles.
    pub max_handles: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_handles: DEFAULT_MAX_HANDLES,
        }
    }
}

impl BridgeConfig {
    /// Create configuration from environment variables.
    ///
    /// Unparseable values fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry capacity is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry capacity is zero.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let max_handles = parse_usize(&lookup, MAX_HANDLES_VAR, DEFAULT_MAX_HANDLES);
        if max_handles == 0 {
            return Err(ConfigError::ZeroValue(MAX_HANDLES_VAR.to_string()));
        }

        Ok(Self { max_handles })
    }

    /// Build a registry with these settings.
    #[must_use]
    pub fn build_registry(&self) -> HandleRegistry {
        HandleRegistry::with_capacity(self.max_handles)
    }
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Setting must be positive.
    #[error("environment variable {0} must be greater than zero")]
    ZeroValue(String),
}

fn parse_usize(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: usize) -> usize {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = BridgeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.max_handles, 65_536);
    }

    #[test]
    fn reads_capacity() {
        let config = BridgeConfig::from_lookup(lookup(&[(MAX_HANDLES_VAR, " 128 ")])).unwrap();
        assert_eq!(config.max_handles, 128);
        assert_eq!(config.build_registry().capacity(), 128);
    }

    #[test]
    fn unparseable_capacity_falls_back() {
        let config = BridgeConfig::from_lookup(lookup(&[(MAX_HANDLES_VAR, "lots")])).unwrap();
        assert_eq!(config.max_handles, DEFAULT_MAX_HANDLES);
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = BridgeConfig::from_lookup(lookup(&[(MAX_HANDLES_VAR, "0")])).unwrap_err();
        assert_eq!(err, ConfigError::ZeroValue(MAX_HANDLES_VAR.to_string()));
    }
}
