//! Configuration Module
//!
//! Environment-driven settings for the handle registry.

mod settings;

pub use settings::{BridgeConfig, ConfigError, MAX_HANDLES_VAR};
