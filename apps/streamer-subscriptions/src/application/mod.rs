//! Application Layer - Handle bridge, services and port definitions.
//!
//! This layer owns live subscriptions on behalf of callers and defines the
//! outbound port through which finished requests leave the core.

/// Opaque handles over the subscription registry.
pub mod bridge;

/// Port interfaces for external systems.
pub mod ports;

/// Application services coordinating the registry and ports.
pub mod services;
