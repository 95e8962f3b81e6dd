//! Port Interfaces
//!
//! Contracts the core expects from the outside world.
//!
//! ## Driven Ports (Outbound)
//!
//! - `SubscriptionTransport`: frames a finished request into the vendor
//!   protocol and sends it. Framing, sessions and I/O all live behind it.

use crate::domain::subscription::SubscriptionRequest;

/// Transport failure reported by an adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The adapter has no open session.
    #[error("transport not connected")]
    NotConnected,

    /// The adapter refused or failed to send.
    #[error("send failed: {message}")]
    SendFailed {
        /// Adapter message.
        message: String,
    },
}

/// Port that carries finished requests to the streamer.
#[cfg_attr(test, mockall::automock)]
pub trait SubscriptionTransport: Send + Sync {
    /// Hand off one request.
    fn submit(&self, request: &SubscriptionRequest) -> Result<(), TransportError>;
}

/// Transport that accepts and drops every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpTransport;

impl SubscriptionTransport for NoOpTransport {
    fn submit(&self, _request: &SubscriptionRequest) -> Result<(), TransportError> {
        Ok(())
    }
}
