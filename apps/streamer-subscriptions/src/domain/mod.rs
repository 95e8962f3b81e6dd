//! Domain Layer - Subscription types and validation rules.
//!
//! Pure types with no I/O: symbol encoding, per-kind code predicates and
//! the immutable subscription requests built from them.

/// Field, duration and venue code predicates.
pub mod fields;

/// Immutable subscription requests and their factories.
pub mod subscription;

/// Ticker to wire symbol normalization.
pub mod symbol;
