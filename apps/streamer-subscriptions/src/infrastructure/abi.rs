//! Status-Code Entry Points
//!
//! Flat surface for callers that cannot use `Result` or the typed registry
//! directly. Every entry point returns a [`Status`] and writes its results
//! into caller-supplied output slots.
//!
//! - Required inputs and output slots arrive as `Option`; `None` is a
//!   precondition failure reported before anything is allocated.
//! - Creates write only into an uninitialized handle. A failed create leaves
//!   it uninitialized. A live or destroyed output slot is refused and left
//!   alone.
//! - A failed accessor leaves its output slot untouched.
//!
//! There is one create and one destroy per kind, a generic destroy, and
//! accessors grouped by capability.
//!
//! ```text
//! create_quotes(["spy"], [0, 1], &mut handle)  -> Status { code: 0 }
//! get_symbols(&handle, &mut symbols)           -> Status { code: 0 }, ["SPY"]
//! get_duration(&handle, &mut duration)         -> Status { code: 3 }
//! destroy(&mut handle)                         -> Status { code: 0 }
//! destroy(&mut handle)                         -> Status { code: 1 }
//! ```

use std::sync::Arc;

use tracing::debug;

use super::config::BridgeConfig;
use super::metrics;
use crate::application::bridge::{
    BridgeError, ErrorKind, Handle, HandleRegistry, HandleState, KindRange,
};
use crate::domain::subscription::SubscriptionKind;

// =============================================================================
// Status
// =============================================================================

/// Outcome of an entry point: a stable code plus optional detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: i32,
    detail: Option<String>,
}

impl Status {
    /// Code reported on success.
    pub const OK: i32 = 0;

    /// Successful status.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            code: Self::OK,
            detail: None,
        }
    }

    /// Whether the call succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code == Self::OK
    }

    /// Numeric status code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.code
    }

    /// Error category, or `None` on success.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self.code {
            1 => Some(ErrorKind::Precondition),
            2 => Some(ErrorKind::Validation),
            3 => Some(ErrorKind::TypeMismatch),
            4 => Some(ErrorKind::Allocation),
            _ => None,
        }
    }

    /// Human-readable failure detail.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl From<&BridgeError> for Status {
    fn from(err: &BridgeError) -> Self {
        Self {
            code: err.status_code(),
            detail: Some(err.to_string()),
        }
    }
}

// =============================================================================
// Bridge
// =============================================================================

/// Status-code facade over a [`HandleRegistry`].
#[derive(Debug, Clone)]
pub struct Bridge {
    registry: Arc<HandleRegistry>,
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new(Arc::new(HandleRegistry::new()))
    }
}

impl Bridge {
    /// Wrap a shared registry.
    #[must_use]
    pub const fn new(registry: Arc<HandleRegistry>) -> Self {
        Self { registry }
    }

    /// Build a bridge with a fresh registry sized by `config`.
    #[must_use]
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(Arc::new(config.build_registry()))
    }

    /// Registry behind this bridge.
    #[must_use]
    pub const fn registry(&self) -> &Arc<HandleRegistry> {
        &self.registry
    }

    fn reject(op: &'static str, err: &BridgeError) -> Status {
        debug!(op, error = %err, "Bridge call failed");
        metrics::record_rejected(op, err.kind());
        Status::from(err)
    }

    fn missing(op: &'static str, what: &str) -> Status {
        Self::reject(op, &BridgeError::precondition(format!("{what} is missing")))
    }

    // =========================================================================
    // Creation
    // =========================================================================

    fn create_into(
        &self,
        op: &'static str,
        out: Option<&mut Handle>,
        create: impl FnOnce(&HandleRegistry) -> Option<Result<Handle, BridgeError>>,
    ) -> Status {
        let Some(out) = out else {
            return Self::missing(op, "output handle");
        };
        match out.state() {
            HandleState::Uninitialized => {}
            HandleState::Live => {
                return Self::reject(
                    op,
                    &BridgeError::precondition("output handle already owns a subscription"),
                );
            }
            HandleState::Destroyed => {
                return Self::reject(op, &BridgeError::precondition("output handle was destroyed"));
            }
        }

        let Some(result) = create(self.registry.as_ref()) else {
            out.mark_invalid();
            return Self::missing(op, "input set");
        };

        match result {
            Ok(handle) => {
                if let Some(kind) = handle.kind() {
                    metrics::record_created(kind);
                }
                metrics::set_live_handles(self.registry.live_count());
                *out = handle;
                Status::ok()
            }
            Err(err) => {
                out.mark_invalid();
                Self::reject(op, &err)
            }
        }
    }

    fn create_symbol_field<S: AsRef<str>>(
        &self,
        op: &'static str,
        kind: SubscriptionKind,
        symbols: Option<&[S]>,
        fields: Option<&[i32]>,
        out: Option<&mut Handle>,
    ) -> Status {
        self.create_into(op, out, |registry| {
            let (symbols, fields) = (symbols?, fields?);
            Some(registry.create_symbol_field(kind, symbols, fields.iter().copied()))
        })
    }

    fn create_actives(
        &self,
        op: &'static str,
        kind: SubscriptionKind,
        duration: i32,
        out: Option<&mut Handle>,
    ) -> Status {
        self.create_into(op, out, |registry| {
            Some(registry.create_actives(kind, duration))
        })
    }

    /// Create an `OptionActives` subscription.
    pub fn create_option_actives(
        &self,
        venue: i32,
        duration: i32,
        out: Option<&mut Handle>,
    ) -> Status {
        self.create_into("create_option_actives", out, |registry| {
            Some(registry.create_option_actives(venue, duration))
        })
    }

    // =========================================================================
    // Destruction
    // =========================================================================

    fn destroy_in(
        &self,
        op: &'static str,
        accepted: KindRange,
        handle: Option<&mut Handle>,
    ) -> Status {
        let Some(handle) = handle else {
            return Self::missing(op, "handle");
        };
        let kind = handle.kind();

        match self.registry.destroy_kind(handle, accepted) {
            Ok(()) => {
                if let Some(kind) = kind {
                    metrics::record_destroyed(kind);
                }
                metrics::set_live_handles(self.registry.live_count());
                Status::ok()
            }
            Err(err) => Self::reject(op, &err),
        }
    }

    /// Destroy a handle of any kind.
    pub fn destroy(&self, handle: Option<&mut Handle>) -> Status {
        self.destroy_in("destroy", KindRange::ANY, handle)
    }

    /// Destroy an `OptionActives` handle.
    pub fn destroy_option_actives(&self, handle: Option<&mut Handle>) -> Status {
        self.destroy_in(
            "destroy_option_actives",
            KindRange::single(SubscriptionKind::OptionActives),
            handle,
        )
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    fn read<T>(
        &self,
        op: &'static str,
        handle: Option<&Handle>,
        out: Option<&mut T>,
        get: impl FnOnce(&HandleRegistry, &Handle) -> Result<T, BridgeError>,
    ) -> Status {
        let Some(handle) = handle else {
            return Self::missing(op, "handle");
        };
        let Some(out) = out else {
            return Self::missing(op, "output slot");
        };

        match get(self.registry.as_ref(), handle) {
            Ok(value) => {
                *out = value;
                Status::ok()
            }
            Err(err) => Self::reject(op, &err),
        }
    }

    fn read_fields(
        &self,
        op: &'static str,
        accepted: KindRange,
        handle: Option<&Handle>,
        out: Option<&mut Vec<i32>>,
    ) -> Status {
        self.read(op, handle, out, |registry, handle| {
            registry
                .fields(handle, accepted)
                .map(|fields| fields.into_iter().map(i32::from).collect())
        })
    }

    /// Service code of any subscription.
    pub fn get_service(&self, handle: Option<&Handle>, out: Option<&mut i32>) -> Status {
        self.read("get_service", handle, out, |registry, handle| {
            registry.service(handle).map(|service| service.code())
        })
    }

    /// Service name of any subscription.
    pub fn get_service_name(&self, handle: Option<&Handle>, out: Option<&mut String>) -> Status {
        self.read("get_service_name", handle, out, |registry, handle| {
            registry
                .service(handle)
                .map(|service| service.as_str().to_string())
        })
    }

    /// Command verb of any subscription.
    pub fn get_command(&self, handle: Option<&Handle>, out: Option<&mut String>) -> Status {
        self.read("get_command", handle, out, |registry, handle| {
            registry
                .command(handle)
                .map(|command| command.as_str().to_string())
        })
    }

    /// Ordered parameter map of any subscription.
    pub fn get_parameters(
        &self,
        handle: Option<&Handle>,
        out: Option<&mut Vec<(String, String)>>,
    ) -> Status {
        self.read("get_parameters", handle, out, |registry, handle| {
            registry.parameters(handle).map(|parameters| {
                parameters
                    .iter()
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect()
            })
        })
    }

    /// Normalized symbols of any symbol-scoped subscription.
    pub fn get_symbols(&self, handle: Option<&Handle>, out: Option<&mut Vec<String>>) -> Status {
        self.read("get_symbols", handle, out, |registry, handle| {
            registry
                .symbols(handle)
                .map(|symbols| symbols.into_iter().collect())
        })
    }

    /// Field codes of a futures or options chart subscription.
    pub fn get_chart_fields(&self, handle: Option<&Handle>, out: Option<&mut Vec<i32>>) -> Status {
        self.read_fields("get_chart_fields", KindRange::CHART, handle, out)
    }

    /// Field codes of any time & sales subscription.
    pub fn get_timesale_fields(
        &self,
        handle: Option<&Handle>,
        out: Option<&mut Vec<i32>>,
    ) -> Status {
        self.read_fields("get_timesale_fields", KindRange::TIMESALE, handle, out)
    }

    /// Duration code of any actives subscription.
    pub fn get_duration(&self, handle: Option<&Handle>, out: Option<&mut i32>) -> Status {
        self.read("get_duration", handle, out, |registry, handle| {
            registry.duration(handle).map(|duration| duration.code())
        })
    }

    /// Venue code of an `OptionActives` subscription.
    pub fn get_venue(&self, handle: Option<&Handle>, out: Option<&mut i32>) -> Status {
        self.read("get_venue", handle, out, |registry, handle| {
            registry.venue(handle).map(|venue| venue.code())
        })
    }

    /// Venue string of any actives subscription.
    pub fn get_venue_name(&self, handle: Option<&Handle>, out: Option<&mut String>) -> Status {
        self.read("get_venue_name", handle, out, |registry, handle| {
            registry.venue_name(handle).map(str::to_string)
        })
    }
}

// =============================================================================
// Per-Kind Entry Points
// =============================================================================

macro_rules! symbol_field_entry_points {
    ($($kind:ident => $create:ident, $destroy:ident, $fields:ident;)+) => {
        impl Bridge {
            $(
                #[doc = concat!("Create a `", stringify!($kind), "` subscription.")]
                pub fn $create<S: AsRef<str>>(
                    &self,
                    symbols: Option<&[S]>,
                    fields: Option<&[i32]>,
                    out: Option<&mut Handle>,
                ) -> Status {
                    self.create_symbol_field(
                        stringify!($create),
                        SubscriptionKind::$kind,
                        symbols,
                        fields,
                        out,
                    )
                }

                #[doc = concat!("Destroy a `", stringify!($kind), "` handle.")]
                pub fn $destroy(&self, handle: Option<&mut Handle>) -> Status {
                    self.destroy_in(
                        stringify!($destroy),
                        KindRange::single(SubscriptionKind::$kind),
                        handle,
                    )
                }

                #[doc = concat!("Field codes of a `", stringify!($kind), "` subscription.")]
                pub fn $fields(
                    &self,
                    handle: Option<&Handle>,
                    out: Option<&mut Vec<i32>>,
                ) -> Status {
                    self.read_fields(
                        stringify!($fields),
                        KindRange::single(SubscriptionKind::$kind),
                        handle,
                        out,
                    )
                }
            )+
        }
    };
}

macro_rules! actives_entry_points {
    ($($kind:ident => $create:ident, $destroy:ident;)+) => {
        impl Bridge {
            $(
                #[doc = concat!("Create a `", stringify!($kind), "` subscription.")]
                pub fn $create(&self, duration: i32, out: Option<&mut Handle>) -> Status {
                    self.create_actives(
                        stringify!($create),
                        SubscriptionKind::$kind,
                        duration,
                        out,
                    )
                }

                #[doc = concat!("Destroy a `", stringify!($kind), "` handle.")]
                pub fn $destroy(&self, handle: Option<&mut Handle>) -> Status {
                    self.destroy_in(
                        stringify!($destroy),
                        KindRange::single(SubscriptionKind::$kind),
                        handle,
                    )
                }
            )+
        }
    };
}

symbol_field_entry_points! {
    Quotes => create_quotes, destroy_quotes, get_quotes_fields;
    Options => create_options, destroy_options, get_options_fields;
    LevelOneFutures => create_level_one_futures,
        destroy_level_one_futures,
        get_level_one_futures_fields;
    LevelOneForex => create_level_one_forex, destroy_level_one_forex, get_level_one_forex_fields;
    LevelOneFuturesOptions => create_level_one_futures_options,
        destroy_level_one_futures_options,
        get_level_one_futures_options_fields;
    NewsHeadline => create_news_headline, destroy_news_headline, get_news_headline_fields;
    ChartEquity => create_chart_equity, destroy_chart_equity, get_chart_equity_fields;
    ChartFutures => create_chart_futures, destroy_chart_futures, get_chart_futures_fields;
    ChartOptions => create_chart_options, destroy_chart_options, get_chart_options_fields;
    TimesaleEquity => create_timesale_equity, destroy_timesale_equity, get_timesale_equity_fields;
    TimesaleFutures => create_timesale_futures,
        destroy_timesale_futures,
        get_timesale_futures_fields;
    TimesaleOptions => create_timesale_options,
        destroy_timesale_options,
        get_timesale_options_fields;
}

actives_entry_points! {
    NasdaqActives => create_nasdaq_actives, destroy_nasdaq_actives;
    NyseActives => create_nyse_actives, destroy_nyse_actives;
    OtcbbActives => create_otcbb_actives, destroy_otcbb_actives;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_query_destroy() {
        let bridge = Bridge::default();
        let mut handle = Handle::uninitialized();

        let status = bridge.create_quotes(
            Some(&["spy", "brk-b"][..]),
            Some(&[0, 1, 2][..]),
            Some(&mut handle),
        );
        assert!(status.is_ok(), "{status:?}");
        assert!(handle.is_live());

        let mut symbols = Vec::new();
        assert!(bridge.get_symbols(Some(&handle), Some(&mut symbols)).is_ok());
        assert_eq!(symbols, vec!["BRKpB".to_string(), "SPY".to_string()]);

        let mut service = 0;
        assert!(bridge.get_service(Some(&handle), Some(&mut service)).is_ok());
        assert_eq!(service, 1);

        let mut command = String::new();
        assert!(bridge.get_command(Some(&handle), Some(&mut command)).is_ok());
        assert_eq!(command, "SUBS");

        assert!(bridge.destroy_quotes(Some(&mut handle)).is_ok());
        assert_eq!(handle.state(), HandleState::Destroyed);
        assert_eq!(bridge.registry().live_count(), 0);
    }

    #[test]
    fn missing_output_handle_is_precondition() {
        let bridge = Bridge::default();
        let status = bridge.create_quotes(Some(&["spy"][..]), Some(&[0][..]), None);
        assert_eq!(status.kind(), Some(ErrorKind::Precondition));
        assert_eq!(bridge.registry().live_count(), 0);
    }

    #[test]
    fn missing_inputs_leave_handle_uninitialized() {
        let bridge = Bridge::default();
        let mut handle = Handle::uninitialized();

        let status = bridge.create_options::<&str>(None, Some(&[0][..]), Some(&mut handle));
        assert_eq!(status.kind(), Some(ErrorKind::Precondition));
        assert_eq!(status.detail(), Some("precondition failed: input set is missing"));
        assert_eq!(handle.state(), HandleState::Uninitialized);
    }

    #[test]
    fn validation_failure_marks_handle_invalid() {
        let bridge = Bridge::default();
        let mut handle = Handle::uninitialized();

        let status =
            bridge.create_news_headline(Some(&["aapl"][..]), Some(&[11][..]), Some(&mut handle));
        assert_eq!(status.code(), 2);
        assert_eq!(
            status.detail(),
            Some("validation failed: invalid field 11 for NewsHeadlineSubscription")
        );
        assert!(!handle.is_live());
        assert_eq!(bridge.registry().live_count(), 0);
    }

    #[test]
    fn create_refuses_live_output_slot() {
        let bridge = Bridge::default();
        let mut handle = Handle::uninitialized();
        assert!(bridge.create_nasdaq_actives(0, Some(&mut handle)).is_ok());
        let before = handle.raw_id();

        let status = bridge.create_nyse_actives(1, Some(&mut handle));
        assert_eq!(status.kind(), Some(ErrorKind::Precondition));
        assert_eq!(handle.raw_id(), before);
        assert_eq!(bridge.registry().live_count(), 1);
    }

    #[test]
    fn create_refuses_destroyed_output_slot() {
        let bridge = Bridge::default();
        let mut handle = Handle::uninitialized();
        assert!(bridge.create_nasdaq_actives(0, Some(&mut handle)).is_ok());
        assert!(bridge.destroy(Some(&mut handle)).is_ok());

        let status = bridge.create_nyse_actives(1, Some(&mut handle));
        assert_eq!(status.kind(), Some(ErrorKind::Precondition));
        assert_eq!(handle.state(), HandleState::Destroyed);
        assert_eq!(bridge.registry().live_count(), 0);
    }

    #[test]
    fn failed_create_leaves_destroyed_slot_destroyed() {
        let bridge = Bridge::default();
        let mut handle = Handle::uninitialized();
        assert!(bridge.create_nasdaq_actives(0, Some(&mut handle)).is_ok());
        assert!(bridge.destroy(Some(&mut handle)).is_ok());

        let status = bridge.create_nyse_actives(99, Some(&mut handle));
        assert_eq!(status.kind(), Some(ErrorKind::Precondition));
        assert_eq!(handle.state(), HandleState::Destroyed);

        let status = bridge.create_quotes::<&str>(None, Some(&[0][..]), Some(&mut handle));
        assert_eq!(status.kind(), Some(ErrorKind::Precondition));
        assert_eq!(handle.state(), HandleState::Destroyed);
    }

    #[test]
    fn failed_accessor_leaves_output_untouched() {
        let bridge = Bridge::default();
        let mut handle = Handle::uninitialized();
        let status =
            bridge.create_chart_equity(Some(&["spy"][..]), Some(&[0, 8][..]), Some(&mut handle));
        assert!(status.is_ok());

        let mut duration = -1;
        let status = bridge.get_duration(Some(&handle), Some(&mut duration));
        assert_eq!(status.kind(), Some(ErrorKind::TypeMismatch));
        assert_eq!(duration, -1);

        let mut fields = vec![99];
        let status = bridge.get_chart_fields(Some(&handle), Some(&mut fields));
        assert_eq!(status.code(), 3);
        assert_eq!(fields, vec![99]);

        assert!(bridge.get_chart_equity_fields(Some(&handle), Some(&mut fields)).is_ok());
        assert_eq!(fields, vec![0, 8]);
    }

    #[test]
    fn shared_range_getters() {
        let bridge = Bridge::default();
        let mut chart = Handle::uninitialized();
        let mut timesale = Handle::uninitialized();
        assert!(
            bridge
                .create_chart_futures(Some(&["/es"][..]), Some(&[6][..]), Some(&mut chart))
                .is_ok()
        );
        assert!(
            bridge
                .create_timesale_options(
                    Some(&["spy_011924c470"][..]),
                    Some(&[4][..]),
                    Some(&mut timesale),
                )
                .is_ok()
        );

        let mut fields = Vec::new();
        assert!(bridge.get_chart_fields(Some(&chart), Some(&mut fields)).is_ok());
        assert_eq!(fields, vec![6]);
        assert!(bridge.get_timesale_fields(Some(&timesale), Some(&mut fields)).is_ok());
        assert_eq!(fields, vec![4]);
        assert_eq!(bridge.get_timesale_fields(Some(&chart), Some(&mut fields)).code(), 3);
    }

    #[test]
    fn actives_getters() {
        let bridge = Bridge::default();
        let mut handle = Handle::uninitialized();
        assert!(bridge.create_option_actives(2, 3, Some(&mut handle)).is_ok());

        let mut venue = -1;
        let mut duration = -1;
        let mut name = String::new();
        assert!(bridge.get_venue(Some(&handle), Some(&mut venue)).is_ok());
        assert!(bridge.get_duration(Some(&handle), Some(&mut duration)).is_ok());
        assert!(bridge.get_venue_name(Some(&handle), Some(&mut name)).is_ok());
        assert_eq!((venue, duration, name.as_str()), (2, 3, "PUTS"));

        let mut parameters = Vec::new();
        assert!(bridge.get_parameters(Some(&handle), Some(&mut parameters)).is_ok());
        assert_eq!(
            parameters,
            vec![
                ("keys".to_string(), "PUTS-600".to_string()),
                ("fields".to_string(), "0,1".to_string()),
            ]
        );
    }

    #[test]
    fn per_kind_destroy_rejects_other_kinds() {
        let bridge = Bridge::default();
        let mut handle = Handle::uninitialized();
        assert!(bridge.create_otcbb_actives(4, Some(&mut handle)).is_ok());

        assert_eq!(bridge.destroy_nyse_actives(Some(&mut handle)).code(), 3);
        assert!(handle.is_live());
        assert!(bridge.destroy_otcbb_actives(Some(&mut handle)).is_ok());
        assert_eq!(bridge.destroy(Some(&mut handle)).code(), 1);
    }

    #[test]
    fn missing_handle_or_slot() {
        let bridge = Bridge::default();
        let mut out = 0;
        assert_eq!(bridge.get_service(None, Some(&mut out)).code(), 1);
        assert_eq!(bridge.get_service(Some(&Handle::uninitialized()), None).code(), 1);
        assert_eq!(bridge.destroy(None).code(), 1);
    }

    #[test]
    fn status_round_trip() {
        let ok = Status::ok();
        assert!(ok.is_ok());
        assert_eq!(ok.kind(), None);
        assert_eq!(ok.detail(), None);

        let status = Status::from(&BridgeError::Allocation("full".to_string()));
        assert_eq!(status.code(), 4);
        assert_eq!(status.kind(), Some(ErrorKind::Allocation));
    }

    #[test]
    fn bridge_from_config() {
        let bridge = Bridge::from_config(&BridgeConfig { max_handles: 1 });
        let mut first = Handle::uninitialized();
        let mut second = Handle::uninitialized();
        assert!(bridge.create_nasdaq_actives(0, Some(&mut first)).is_ok());
        assert_eq!(bridge.create_nasdaq_actives(0, Some(&mut second)).code(), 4);
        assert_eq!(second.state(), HandleState::Uninitialized);
    }
}
