//! Opaque handles and accepted kind ranges.

use std::fmt;

use crate::domain::subscription::SubscriptionKind;

/// Kind identifier carried by a handle that owns nothing.
pub const INERT_KIND_ID: i32 = 0;

/// Lifecycle of a handle as seen by its holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleState {
    /// Never populated by a successful create.
    #[default]
    Uninitialized,
    /// Owns a registered subscription.
    Live,
    /// Released by destroy. Terminal.
    Destroyed,
}

/// Opaque, kind-tagged reference to a registered subscription.
///
/// A handle is single-owner: it is not `Clone`, and destroying it through
/// the registry leaves it inert. Foreign callers that only hold the raw
/// parts can rebuild one with [`Handle::from_raw`]; the registry checks the
/// tag against the live object before every access, so a forged or stale
/// handle fails instead of resolving to the wrong variant.
#[derive(Debug, PartialEq, Eq, Default)]
pub struct Handle {
    kind_id: i32,
    id: u64,
    state: HandleState,
}

impl Handle {
    /// A handle that owns nothing.
    #[must_use]
    pub const fn uninitialized() -> Self {
        Self {
            kind_id: INERT_KIND_ID,
            id: 0,
            state: HandleState::Uninitialized,
        }
    }

    pub(crate) const fn live(kind: SubscriptionKind, id: u64) -> Self {
        Self {
            kind_id: kind.id(),
            id,
            state: HandleState::Live,
        }
    }

    /// Rebuild a handle from raw parts received across the boundary.
    ///
    /// A zero id or the inert tag yields an uninitialized handle.
    #[must_use]
    pub const fn from_raw(kind_id: i32, id: u64) -> Self {
        if id == 0 || kind_id == INERT_KIND_ID {
            return Self::uninitialized();
        }
        Self {
            kind_id,
            id,
            state: HandleState::Live,
        }
    }

    /// Raw parts for passing across the boundary.
    #[must_use]
    pub const fn into_raw(self) -> (i32, u64) {
        (self.kind_id, self.id)
    }

    /// Kind identifier tag.
    #[must_use]
    pub const fn kind_id(&self) -> i32 {
        self.kind_id
    }

    /// Kind named by the tag, if recognized.
    #[must_use]
    pub const fn kind(&self) -> Option<SubscriptionKind> {
        SubscriptionKind::from_id(self.kind_id)
    }

    /// Registry key.
    #[must_use]
    pub const fn raw_id(&self) -> u64 {
        self.id
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> HandleState {
        self.state
    }

    /// Whether the handle claims to own a subscription.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self.state, HandleState::Live)
    }

    pub(crate) const fn mark_destroyed(&mut self) {
        self.kind_id = INERT_KIND_ID;
        self.id = 0;
        self.state = HandleState::Destroyed;
    }

    pub(crate) const fn mark_invalid(&mut self) {
        self.kind_id = INERT_KIND_ID;
        self.id = 0;
        self.state = HandleState::Uninitialized;
    }
}

/// Closed range of kind identifiers an operation accepts.
///
/// Shared base capabilities are contiguous ranges, e.g. every chart kind
/// sits in `8..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindRange {
    low: i32,
    high: i32,
    name: &'static str,
}

impl KindRange {
    /// Any subscription.
    pub const ANY: Self = Self::new(1, 18, "any subscription");
    /// Kinds built from symbols and fields.
    pub const SYMBOL_SCOPED: Self = Self::new(1, 14, "symbol subscription");
    /// Futures and option charts (8 is the reserved forex slot).
    pub const CHART: Self = Self::new(8, 10, "chart subscription");
    /// Time & sales kinds.
    pub const TIMESALE: Self = Self::new(11, 14, "timesale subscription");
    /// Most actives kinds.
    pub const ACTIVES: Self = Self::new(15, 18, "actives subscription");

    const fn new(low: i32, high: i32, name: &'static str) -> Self {
        Self { low, high, name }
    }

    /// Range accepting exactly one kind.
    #[must_use]
    pub const fn single(kind: SubscriptionKind) -> Self {
        Self::new(kind.id(), kind.id(), kind.name())
    }

    /// Range matching the field accessor for a kind: its shared family
    /// range where one exists, otherwise the kind alone.
    #[must_use]
    pub const fn fields_of(kind: SubscriptionKind) -> Self {
        match kind {
            SubscriptionKind::ChartFutures | SubscriptionKind::ChartOptions => Self::CHART,
            SubscriptionKind::TimesaleEquity
            | SubscriptionKind::TimesaleFutures
            | SubscriptionKind::TimesaleOptions => Self::TIMESALE,
            _ => Self::single(kind),
        }
    }

    /// Whether `kind_id` falls inside the range.
    #[must_use]
    pub const fn contains(&self, kind_id: i32) -> bool {
        kind_id >= self.low && kind_id <= self.high
    }

    /// Whether every identifier in `self` is also in `other`.
    #[must_use]
    pub const fn is_within(&self, other: &Self) -> bool {
        self.low >= other.low && self.high <= other.high
    }

    /// Lowest accepted identifier.
    #[must_use]
    pub const fn low(&self) -> i32 {
        self.low
    }

    /// Highest accepted identifier.
    #[must_use]
    pub const fn high(&self) -> i32 {
        self.high
    }
}

impl fmt::Display for KindRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}..={}]", self.name, self.low, self.high)
    }
}
