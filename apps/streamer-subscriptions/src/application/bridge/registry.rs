//! Handle Registry
//!
//! Owns every live subscription behind an opaque id. Handles carry the id
//! plus a kind tag; each access checks the tag against the range the
//! operation accepts and then against the live object, so a handle can
//! never resolve to the wrong variant.
//!
//! Ids are handed out from a monotonic counter and never reused. A handle
//! whose object has been destroyed therefore misses on lookup instead of
//! aliasing a newer object.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::{debug, warn};

use super::error::BridgeError;
use super::handle::{Handle, HandleState, KindRange};
use crate::domain::fields::{DurationType, OptionVenue};
use crate::domain::subscription::{
    Command, Parameters, ServiceType, Subscription, SubscriptionKind, SubscriptionRequest, Venue,
};

/// Default ceiling on simultaneously live handles.
pub const DEFAULT_MAX_HANDLES: usize = 65_536;

/// Registry of live subscriptions addressed by [`Handle`].
#[derive(Debug)]
pub struct HandleRegistry {
    entries: RwLock<HashMap<u64, Arc<Subscription>>>,
    next_id: AtomicU64,
    capacity: usize,
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HandleRegistry {
    /// Registry with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_HANDLES)
    }

    /// Registry holding at most `capacity` live handles.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            capacity,
        }
    }

    /// Maximum number of live handles.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create a symbol/field subscription and return its handle.
    pub fn create_symbol_field<S, F>(
        &self,
        kind: SubscriptionKind,
        symbols: S,
        fields: F,
    ) -> Result<Handle, BridgeError>
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        F: IntoIterator<Item = i32>,
    {
        let subscription = Subscription::symbol_field(kind, symbols, fields)
            .inspect_err(|e| warn!(%kind, error = %e, "Rejected subscription"))?;
        self.insert(subscription)
    }

    /// Create a NASDAQ, NYSE or OTCBB actives subscription.
    pub fn create_actives(
        &self,
        kind: SubscriptionKind,
        duration: i32,
    ) -> Result<Handle, BridgeError> {
        let subscription = Subscription::actives(kind, duration)
            .inspect_err(|e| warn!(%kind, error = %e, "Rejected subscription"))?;
        self.insert(subscription)
    }

    /// Create an option actives subscription.
    pub fn create_option_actives(&self, venue: i32, duration: i32) -> Result<Handle, BridgeError> {
        let subscription = Subscription::option_actives(venue, duration).inspect_err(|e| {
            warn!(kind = %SubscriptionKind::OptionActives, error = %e, "Rejected subscription");
        })?;
        self.insert(subscription)
    }

    fn insert(&self, subscription: Subscription) -> Result<Handle, BridgeError> {
        let kind = subscription.kind();
        let mut entries = self.entries.write();

        if entries.len() >= self.capacity {
            warn!(%kind, capacity = self.capacity, "Handle registry full");
            return Err(BridgeError::Allocation(format!(
                "registry holds the maximum of {} handles",
                self.capacity
            )));
        }
        entries
            .try_reserve(1)
            .map_err(|e| BridgeError::Allocation(e.to_string()))?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        entries.insert(id, Arc::new(subscription));
        drop(entries);

        debug!(%kind, id, "Created subscription handle");
        Ok(Handle::live(kind, id))
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// Resolve `handle` and run `op` against its subscription.
    ///
    /// Checks run in order and stop at the first failure:
    /// the handle must be live, its tag must fall inside `accepted` and name
    /// a known kind, the id must still be registered, and the registered
    /// object must carry the same kind as the tag. `op` returning `None`
    /// means the variant lacks the capability and is reported as a type
    /// mismatch.
    pub fn access<T>(
        &self,
        handle: &Handle,
        accepted: KindRange,
        op: impl FnOnce(&Subscription) -> Option<T>,
    ) -> Result<T, BridgeError> {
        let subscription = self.resolve(handle, accepted)?;
        op(subscription.as_ref()).ok_or(BridgeError::TypeMismatch {
            found: handle.kind_id(),
            accepted,
        })
    }

    fn resolve(
        &self,
        handle: &Handle,
        accepted: KindRange,
    ) -> Result<Arc<Subscription>, BridgeError> {
        match handle.state() {
            HandleState::Live => {}
            HandleState::Uninitialized => {
                return Err(BridgeError::precondition("handle is uninitialized"));
            }
            HandleState::Destroyed => {
                return Err(BridgeError::precondition("handle has been destroyed"));
            }
        }

        let tag = handle.kind_id();
        if !accepted.contains(tag) {
            warn!(tag, %accepted, "Handle kind outside accepted range");
            return Err(BridgeError::TypeMismatch {
                found: tag,
                accepted,
            });
        }
        let kind = SubscriptionKind::from_id(tag).ok_or(BridgeError::UnknownKind(tag))?;

        let subscription = self
            .entries
            .read()
            .get(&handle.raw_id())
            .cloned()
            .ok_or_else(|| BridgeError::precondition("handle does not refer to a live object"))?;

        if subscription.kind() != kind {
            warn!(tag, live = %subscription.kind(), "Handle tag disagrees with live object");
            return Err(BridgeError::TypeMismatch {
                found: tag,
                accepted,
            });
        }
        Ok(subscription)
    }

    /// Shared reference to the subscription behind any handle.
    pub fn get(&self, handle: &Handle) -> Result<Arc<Subscription>, BridgeError> {
        self.resolve(handle, KindRange::ANY)
    }

    /// Service type of any subscription.
    pub fn service(&self, handle: &Handle) -> Result<ServiceType, BridgeError> {
        self.access(handle, KindRange::ANY, |s| Some(s.service()))
    }

    /// Command verb of any subscription.
    pub fn command(&self, handle: &Handle) -> Result<Command, BridgeError> {
        self.access(handle, KindRange::ANY, |s| Some(s.command()))
    }

    /// Parameter map of any subscription.
    pub fn parameters(&self, handle: &Handle) -> Result<Parameters, BridgeError> {
        self.access(handle, KindRange::ANY, |s| Some(s.parameters().clone()))
    }

    /// Finished request of any subscription.
    pub fn request(&self, handle: &Handle) -> Result<SubscriptionRequest, BridgeError> {
        self.access(handle, KindRange::ANY, |s| Some(s.request().clone()))
    }

    /// Normalized symbols of a symbol-scoped subscription.
    pub fn symbols(&self, handle: &Handle) -> Result<BTreeSet<String>, BridgeError> {
        self.access(handle, KindRange::SYMBOL_SCOPED, |s| s.symbols().cloned())
    }

    /// Field codes, provided the handle's kind lies in `accepted`.
    ///
    /// Pass [`KindRange::single`] for a concrete kind, or one of the shared
    /// ranges such as [`KindRange::CHART`].
    pub fn fields(
        &self,
        handle: &Handle,
        accepted: KindRange,
    ) -> Result<BTreeSet<u16>, BridgeError> {
        self.access(handle, accepted, |s| s.fields().cloned())
    }

    /// Duration of an actives subscription.
    pub fn duration(&self, handle: &Handle) -> Result<DurationType, BridgeError> {
        self.access(handle, KindRange::ACTIVES, Subscription::duration)
    }

    /// Enumerated venue of an option actives subscription.
    pub fn venue(&self, handle: &Handle) -> Result<OptionVenue, BridgeError> {
        self.access(
            handle,
            KindRange::single(SubscriptionKind::OptionActives),
            |s| match s.venue() {
                Some(Venue::Option(venue)) => Some(venue),
                _ => None,
            },
        )
    }

    /// Venue string of any actives subscription.
    pub fn venue_name(&self, handle: &Handle) -> Result<&'static str, BridgeError> {
        self.access(handle, KindRange::ACTIVES, |s| s.venue().map(Venue::as_str))
    }

    // =========================================================================
    // Destruction
    // =========================================================================

    /// Release the subscription behind any live handle.
    pub fn destroy(&self, handle: &mut Handle) -> Result<(), BridgeError> {
        self.destroy_kind(handle, KindRange::ANY)
    }

    /// Release the subscription, provided the handle's kind lies in `accepted`.
    ///
    /// On success the object is freed and the handle becomes
    /// [`HandleState::Destroyed`]. On failure the handle is left as it was.
    pub fn destroy_kind(
        &self,
        handle: &mut Handle,
        accepted: KindRange,
    ) -> Result<(), BridgeError> {
        let kind = self.resolve(handle, accepted)?.kind();

        let removed = self.entries.write().remove(&handle.raw_id());
        if removed.is_none() {
            // Lost a race with another holder of the same raw id.
            return Err(BridgeError::precondition("handle has been destroyed"));
        }

        debug!(%kind, id = handle.raw_id(), "Destroyed subscription handle");
        handle.mark_destroyed();
        Ok(())
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Number of live handles.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.entries.read().len()
    }

    /// Number of live handles of one kind.
    #[must_use]
    pub fn live_count_of(&self, kind: SubscriptionKind) -> usize {
        self.entries
            .read()
            .values()
            .filter(|s| s.kind() == kind)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::application::bridge::error::ErrorKind;
    use crate::application::bridge::handle::INERT_KIND_ID;
    use crate::domain::subscription::ValidationError;

    fn quotes(registry: &HandleRegistry) -> Handle {
        registry
            .create_symbol_field(SubscriptionKind::Quotes, ["spy", "qqq"], [0, 1, 2])
            .unwrap()
    }

    #[test]
    fn create_returns_live_tagged_handle() {
        let registry = HandleRegistry::new();
        let handle = quotes(&registry);

        assert!(handle.is_live());
        assert_eq!(handle.kind(), Some(SubscriptionKind::Quotes));
        assert_eq!(registry.live_count(), 1);
        assert_eq!(registry.service(&handle).unwrap(), ServiceType::Quote);
        assert_eq!(registry.command(&handle).unwrap(), Command::Subs);
    }

    #[test]
    fn failed_create_registers_nothing() {
        let registry = HandleRegistry::new();
        let err = registry
            .create_symbol_field(SubscriptionKind::Quotes, ["spy"], [53])
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn ids_are_not_reused() {
        let registry = HandleRegistry::new();
        let mut first = quotes(&registry);
        let first_id = first.raw_id();
        registry.destroy(&mut first).unwrap();

        let second = quotes(&registry);
        assert_ne!(second.raw_id(), first_id);
    }

    #[test]
    fn symbols_and_fields_resolve() {
        let registry = HandleRegistry::new();
        let handle = quotes(&registry);

        let symbols = registry.symbols(&handle).unwrap();
        assert_eq!(
            symbols.into_iter().collect::<Vec<_>>(),
            vec!["QQQ".to_string(), "SPY".to_string()]
        );

        let fields = registry
            .fields(&handle, KindRange::single(SubscriptionKind::Quotes))
            .unwrap();
        assert_eq!(fields.into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn field_getter_rejects_unrelated_kind() {
        let registry = HandleRegistry::new();
        let handle = quotes(&registry);

        let err = registry
            .fields(&handle, KindRange::single(SubscriptionKind::Options))
            .unwrap_err();
        assert_eq!(
            err,
            BridgeError::TypeMismatch {
                found: 1,
                accepted: KindRange::single(SubscriptionKind::Options),
            }
        );
    }

    #[test]
    fn shared_chart_range_accepts_both_charts() {
        let registry = HandleRegistry::new();
        let futures = registry
            .create_symbol_field(SubscriptionKind::ChartFutures, ["/es"], [0, 6])
            .unwrap();
        let options = registry
            .create_symbol_field(SubscriptionKind::ChartOptions, ["spy_011924c470"], [1])
            .unwrap();

        assert!(registry.fields(&futures, KindRange::CHART).is_ok());
        assert!(registry.fields(&options, KindRange::CHART).is_ok());
        assert!(registry.fields(&futures, KindRange::TIMESALE).is_err());
    }

    #[test]
    fn actives_accessors() {
        let registry = HandleRegistry::new();
        let nyse = registry
            .create_actives(SubscriptionKind::NyseActives, 2)
            .unwrap();
        let options = registry.create_option_actives(4, 0).unwrap();

        assert_eq!(registry.duration(&nyse).unwrap(), DurationType::Min30);
        assert_eq!(registry.venue_name(&nyse).unwrap(), "NYSE");
        assert_eq!(registry.venue_name(&options).unwrap(), "CALLS-DESC");
        assert_eq!(registry.venue(&options).unwrap(), OptionVenue::CallsDesc);

        let err = registry.venue(&nyse).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        let err = registry.symbols(&nyse).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn actives_factory_refuses_symbol_kind() {
        let registry = HandleRegistry::new();
        let err = registry
            .create_actives(SubscriptionKind::Quotes, 0)
            .unwrap_err();
        assert_eq!(
            err,
            BridgeError::Validation(ValidationError::UnsupportedKind(SubscriptionKind::Quotes))
        );
    }

    #[test]
    fn uninitialized_handle_is_precondition_error() {
        let registry = HandleRegistry::new();
        let err = registry.service(&Handle::uninitialized()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
    }

    #[test]
    fn forged_tag_is_type_mismatch() {
        let registry = HandleRegistry::new();
        let handle = quotes(&registry);
        let forged = Handle::from_raw(SubscriptionKind::Options.id(), handle.raw_id());

        let err = registry.service(&forged).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn inert_tag_over_live_id_is_precondition_error() {
        let registry = HandleRegistry::new();
        let handle = quotes(&registry);
        let forged = Handle::from_raw(INERT_KIND_ID, handle.raw_id());

        let err = registry.service(&forged).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert!(registry.service(&handle).is_ok());
    }

    #[test]
    fn reserved_tag_is_unknown_kind() {
        let registry = HandleRegistry::new();
        let handle = quotes(&registry);
        let forged = Handle::from_raw(8, handle.raw_id());

        assert_eq!(
            registry.fields(&forged, KindRange::CHART).unwrap_err(),
            BridgeError::UnknownKind(8)
        );
    }

    #[test]
    fn destroy_then_access_fails() {
        let registry = HandleRegistry::new();
        let mut handle = quotes(&registry);
        registry.destroy(&mut handle).unwrap();

        assert_eq!(handle.state(), HandleState::Destroyed);
        assert_eq!(registry.live_count(), 0);
        assert_eq!(
            registry.symbols(&handle).unwrap_err().kind(),
            ErrorKind::Precondition
        );
        assert_eq!(
            registry.destroy(&mut handle).unwrap_err().kind(),
            ErrorKind::Precondition
        );
    }

    #[test]
    fn stale_raw_handle_fails_after_destroy() {
        let registry = HandleRegistry::new();
        let mut handle = quotes(&registry);
        let (kind_id, id) = (handle.kind_id(), handle.raw_id());
        registry.destroy(&mut handle).unwrap();

        let stale = Handle::from_raw(kind_id, id);
        assert_eq!(
            registry.request(&stale).unwrap_err().kind(),
            ErrorKind::Precondition
        );
    }

    #[test]
    fn destroy_with_wrong_range_leaves_handle_live() {
        let registry = HandleRegistry::new();
        let mut handle = quotes(&registry);

        let err = registry
            .destroy_kind(&mut handle, KindRange::ACTIVES)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(handle.is_live());
        assert_eq!(registry.live_count(), 1);

        registry
            .destroy_kind(&mut handle, KindRange::single(SubscriptionKind::Quotes))
            .unwrap();
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn capacity_exhaustion_is_allocation_error() {
        let registry = HandleRegistry::with_capacity(1);
        let _first = quotes(&registry);

        let err = registry.create_option_actives(0, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Allocation);
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn live_count_per_kind() {
        let registry = HandleRegistry::new();
        let _a = quotes(&registry);
        let _b = quotes(&registry);
        let _c = registry.create_option_actives(0, 5).unwrap();

        assert_eq!(registry.live_count_of(SubscriptionKind::Quotes), 2);
        assert_eq!(registry.live_count_of(SubscriptionKind::OptionActives), 1);
        assert_eq!(registry.live_count_of(SubscriptionKind::NewsHeadline), 0);
    }

    #[test]
    fn concurrent_create_access_destroy() {
        let registry = Arc::new(HandleRegistry::new());

        let workers: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..50 {
                        let mut handle = registry
                            .create_symbol_field(SubscriptionKind::Quotes, [format!("s{i}")], [0])
                            .unwrap();
                        let symbols = registry.symbols(&handle).unwrap();
                        assert!(symbols.contains(&format!("S{i}")));
                        registry.destroy(&mut handle).unwrap();
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(registry.live_count(), 0);
    }
}
