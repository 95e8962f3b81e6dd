//! Infrastructure Layer - Boundary entry points and ambient adapters.
//!
//! Everything here sits at the edge of the crate: the status-code surface
//! for untyped callers, and the configuration, logging and metrics plumbing
//! the core relies on.

/// Status-code entry points over the handle registry.
pub mod abi;

/// Configuration loaded from the environment.
pub mod config;

/// Handle lifecycle metrics.
pub mod metrics;

/// `tracing-subscriber` initialization.
pub mod telemetry;
