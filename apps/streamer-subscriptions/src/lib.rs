#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::items_after_statements
    )
)]

//! Streamer Subscriptions - Subscription Request Core
//!
//! Builds validated subscription requests for a real-time market data
//! streamer and exposes them to untyped callers through opaque, kind-tagged
//! handles. Framing, sessions and network I/O belong to a transport adapter
//! behind [`SubscriptionTransport`].
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Pure types and validation
//!   - `symbol`: ticker to wire symbol normalization
//!   - `fields`: per-family field codes, durations and option venues
//!   - `subscription`: kinds, requests, immutable `Subscription` and factories
//!
//! - **Application**: Ownership and hand-off
//!   - `bridge`: handles, accepted kind ranges and the handle registry
//!   - `ports`: the outbound transport interface
//!   - `services`: submits registered requests to the transport
//!
//! - **Infrastructure**: Edges
//!   - `abi`: status-code entry points with output slots
//!   - `config`: registry settings from the environment
//!   - `telemetry`: `tracing-subscriber` setup
//!   - `metrics`: handle lifecycle metrics
//!
//! # Flow
//!
//! ```text
//! raw symbols, field codes ──► factory ──► Subscription ──► HandleRegistry
//!                                                              │
//!                        Handle { kind tag, id } ◄─────────────┤
//!                                                              ▼
//!                                 SubscriptionService ──► SubscriptionTransport
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Subscription types with no I/O.
pub mod domain;

/// Application layer - Handle bridge, services and ports.
pub mod application;

/// Infrastructure layer - Boundary entry points and ambient adapters.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::fields::{DurationType, FieldFamily, OptionVenue};
pub use domain::subscription::{
    Command, Exchange, KindShape, MAX_FIELDS, MAX_SYMBOLS, Parameters, ServiceType, Subscription,
    SubscriptionKind, SubscriptionRequest, ValidationError, Venue,
};
pub use domain::symbol::normalize;

// Handle bridge
pub use application::bridge::{
    BridgeError, DEFAULT_MAX_HANDLES, ErrorKind, Handle, HandleRegistry, HandleState, KindRange,
};

// Ports and services
pub use application::ports::{NoOpTransport, SubscriptionTransport, TransportError};
pub use application::services::{SubmitError, SubscriptionService};

// Boundary
pub use infrastructure::abi::{Bridge, Status};

// Infrastructure config
pub use infrastructure::config::{BridgeConfig, ConfigError};

// Metrics
pub use infrastructure::metrics::register_metrics;

// Telemetry
pub use infrastructure::telemetry::{
    LogFormat, TelemetryConfig, TelemetryError, init as init_telemetry,
};
