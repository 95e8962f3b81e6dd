//! Application Services
//!
//! - `SubscriptionService`: resolves handles through the registry and hands
//!   the finished request to the transport port.

use std::sync::Arc;

use tracing::{debug, warn};

use super::bridge::{BridgeError, Handle, HandleRegistry};
use super::ports::{SubscriptionTransport, TransportError};

/// Failure while submitting a subscription.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The handle could not be resolved.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// The transport refused the request.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Hands subscriptions held in a registry to a transport.
pub struct SubscriptionService<T> {
    registry: Arc<HandleRegistry>,
    transport: T,
}

impl<T: SubscriptionTransport> SubscriptionService<T> {
    /// Create a service over a shared registry.
    pub const fn new(registry: Arc<HandleRegistry>, transport: T) -> Self {
        Self {
            registry,
            transport,
        }
    }

    /// Registry backing this service.
    #[must_use]
    pub const fn registry(&self) -> &Arc<HandleRegistry> {
        &self.registry
    }

    /// Submit the request behind `handle`.
    pub fn submit(&self, handle: &Handle) -> Result<(), SubmitError> {
        let subscription = self.registry.get(handle)?;
        let request = subscription.request();

        self.transport
            .submit(request)
            .inspect_err(|e| {
                warn!(service = %request.service(), error = %e, "Transport rejected request");
            })?;

        debug!(
            service = %request.service(),
            command = %request.command(),
            "Submitted subscription"
        );
        Ok(())
    }

    /// Submit the requests behind `handles` in order.
    ///
    /// Every handle is resolved before anything is sent, so a bad handle
    /// sends nothing. Sending stops at the first transport failure.
    pub fn submit_many(&self, handles: &[&Handle]) -> Result<(), SubmitError> {
        let requests = handles
            .iter()
            .map(|handle| {
                self.registry
                    .get(handle)
                    .map(|subscription| subscription.request().clone())
            })
            .collect::<Result<Vec<_>, _>>()?;

        for request in &requests {
            self.transport.submit(request)?;
        }
        debug!(count = requests.len(), "Submitted subscriptions");
        Ok(())
    }
}

impl<T> std::fmt::Debug for SubscriptionService<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionService")
            .field("live_handles", &self.registry.live_count())
            .finish_non_exhaustive()
    }
}
