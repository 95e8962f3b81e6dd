//! Subscription Model
//!
//! Immutable subscription requests for every streamer kind, and the two
//! factories that build them.
//!
//! # Design
//!
//! A [`Subscription`] is a kind tag plus capability data:
//! - symbol-scoped kinds carry a normalized symbol set and a field set
//! - actives kinds carry a venue and a duration
//!
//! All validation runs inside the factory before anything is built, so a
//! `Subscription` that exists is always complete: symbol and field sets are
//! non-empty, every code passed its kind's predicate, and symbols are
//! stored in wire form.

mod kind;
mod request;

use std::collections::BTreeSet;

use thiserror::Error;

pub use kind::{Exchange, KindShape, SubscriptionKind};
pub use request::{Command, Parameters, ServiceType, SubscriptionRequest};

use crate::domain::fields::{DurationType, FieldFamily, OptionVenue};
use crate::domain::symbol::normalize;

// =============================================================================
// Constants
// =============================================================================

/// Most symbols a single request may carry.
pub const MAX_SYMBOLS: usize = 500;

/// Most field codes a single request may carry.
pub const MAX_FIELDS: usize = 100;

// =============================================================================
// Errors
// =============================================================================

/// Reasons a factory refuses to build a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No symbols supplied.
    #[error("no symbols")]
    EmptySymbols,

    /// No field codes supplied.
    #[error("no fields")]
    EmptyFields,

    /// A symbol was empty or whitespace only.
    #[error("blank symbol")]
    BlankSymbol,

    /// Symbol count over the protocol ceiling.
    #[error("{count} symbols exceeds maximum of {max}")]
    TooManySymbols {
        /// Distinct symbols supplied.
        count: usize,
        /// Ceiling.
        max: usize,
    },

    /// Field count over the protocol ceiling.
    #[error("{count} fields exceeds maximum of {max}")]
    TooManyFields {
        /// Distinct fields supplied.
        count: usize,
        /// Ceiling.
        max: usize,
    },

    /// Field code outside the kind's legal set.
    #[error("invalid field {code} for {kind}")]
    InvalidField {
        /// Kind being built.
        kind: SubscriptionKind,
        /// Offending code.
        code: i32,
    },

    /// Duration code outside the enumerated set.
    #[error("invalid duration {0}")]
    InvalidDuration(i32),

    /// Venue code outside the enumerated set.
    #[error("invalid venue {0}")]
    InvalidVenue(i32),

    /// Factory does not build this kind.
    #[error("{0} is not built by this factory")]
    UnsupportedKind(SubscriptionKind),
}

// =============================================================================
// Capability Data
// =============================================================================

/// Venue of an actives subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Venue {
    /// Literal exchange name.
    Exchange(Exchange),
    /// Enumerated option venue.
    Option(OptionVenue),
}

impl Venue {
    /// Canonical string used in the `keys` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exchange(exchange) => exchange.as_str(),
            Self::Option(venue) => venue.as_str(),
        }
    }
}

/// Symbol-scoped capability: symbols plus field codes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SymbolScope {
    family: FieldFamily,
    symbols: BTreeSet<String>,
    fields: BTreeSet<u16>,
}

/// Duration-scoped capability: venue plus duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActivesScope {
    venue: Venue,
    duration: DurationType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Scope {
    Symbols(SymbolScope),
    Actives(ActivesScope),
}

// =============================================================================
// Subscription
// =============================================================================

/// Immutable, validated subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    kind: SubscriptionKind,
    scope: Scope,
    request: SubscriptionRequest,
}

impl Subscription {
    /// Build a `SUBS` request for a symbol-scoped kind.
    ///
    /// # Example
    ///
    /// ```rust
    /// use streamer_subscriptions::domain::subscription::{Subscription, SubscriptionKind};
    ///
    /// let sub = Subscription::symbol_field(SubscriptionKind::Quotes, ["spy", "brk-b"], [2, 0, 1])
    ///     .unwrap();
    ///
    /// assert_eq!(sub.parameters().get("fields"), Some("0,1,2"));
    /// assert_eq!(sub.parameters().get("keys"), Some("BRKpB,SPY"));
    /// ```
    pub fn symbol_field<S, F>(
        kind: SubscriptionKind,
        symbols: S,
        fields: F,
    ) -> Result<Self, ValidationError>
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        F: IntoIterator<Item = i32>,
    {
        Self::symbol_field_with_command(kind, Command::Subs, symbols, fields)
    }

    /// Build a symbol-scoped request with an explicit command verb.
    pub fn symbol_field_with_command<S, F>(
        kind: SubscriptionKind,
        command: Command,
        symbols: S,
        fields: F,
    ) -> Result<Self, ValidationError>
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        F: IntoIterator<Item = i32>,
    {
        let family = kind
            .field_family()
            .ok_or(ValidationError::UnsupportedKind(kind))?;

        let mut encoded = BTreeSet::new();
        for symbol in symbols {
            let symbol = symbol.as_ref();
            if symbol.trim().is_empty() {
                return Err(ValidationError::BlankSymbol);
            }
            encoded.insert(normalize(symbol));
        }
        let codes: Vec<i32> = fields.into_iter().collect();

        if encoded.is_empty() {
            return Err(ValidationError::EmptySymbols);
        }
        if codes.is_empty() {
            return Err(ValidationError::EmptyFields);
        }
        if encoded.len() > MAX_SYMBOLS {
            return Err(ValidationError::TooManySymbols {
                count: encoded.len(),
                max: MAX_SYMBOLS,
            });
        }

        let distinct: BTreeSet<i32> = codes.iter().copied().collect();
        if distinct.len() > MAX_FIELDS {
            return Err(ValidationError::TooManyFields {
                count: distinct.len(),
                max: MAX_FIELDS,
            });
        }

        let mut field_set = BTreeSet::new();
        for code in codes {
            let valid = u16::try_from(code)
                .ok()
                .filter(|_| family.is_valid(code))
                .ok_or(ValidationError::InvalidField { kind, code })?;
            field_set.insert(valid);
        }

        let parameters = Parameters::symbol_field(join(&field_set), join(&encoded));

        Ok(Self {
            kind,
            scope: Scope::Symbols(SymbolScope {
                family,
                symbols: encoded,
                fields: field_set,
            }),
            request: SubscriptionRequest::new(kind.service(), command, parameters),
        })
    }

    /// Build a `SUBS` request for a fixed-exchange actives kind.
    pub fn actives(kind: SubscriptionKind, duration: i32) -> Result<Self, ValidationError> {
        Self::actives_with_command(kind, Command::Subs, duration)
    }

    /// Build a fixed-exchange actives request with an explicit command verb.
    pub fn actives_with_command(
        kind: SubscriptionKind,
        command: Command,
        duration: i32,
    ) -> Result<Self, ValidationError> {
        let KindShape::Actives(exchange) = kind.shape() else {
            return Err(ValidationError::UnsupportedKind(kind));
        };
        let duration =
            DurationType::from_code(duration).ok_or(ValidationError::InvalidDuration(duration))?;

        Ok(Self::build_actives(
            kind,
            command,
            Venue::Exchange(exchange),
            duration,
        ))
    }

    /// Build a `SUBS` request for the option actives stream.
    pub fn option_actives(venue: i32, duration: i32) -> Result<Self, ValidationError> {
        Self::option_actives_with_command(Command::Subs, venue, duration)
    }

    /// Build an option actives request with an explicit command verb.
    pub fn option_actives_with_command(
        command: Command,
        venue: i32,
        duration: i32,
    ) -> Result<Self, ValidationError> {
        let venue = OptionVenue::from_code(venue).ok_or(ValidationError::InvalidVenue(venue))?;
        let duration =
            DurationType::from_code(duration).ok_or(ValidationError::InvalidDuration(duration))?;

        Ok(Self::build_actives(
            SubscriptionKind::OptionActives,
            command,
            Venue::Option(venue),
            duration,
        ))
    }

    fn build_actives(
        kind: SubscriptionKind,
        command: Command,
        venue: Venue,
        duration: DurationType,
    ) -> Self {
        let keys = format!("{}-{}", venue.as_str(), duration.as_str());

        Self {
            kind,
            scope: Scope::Actives(ActivesScope { venue, duration }),
            request: SubscriptionRequest::new(kind.service(), command, Parameters::actives(keys)),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Kind tag.
    #[must_use]
    pub const fn kind(&self) -> SubscriptionKind {
        self.kind
    }

    /// Target service.
    #[must_use]
    pub const fn service(&self) -> ServiceType {
        self.request.service()
    }

    /// Command verb.
    #[must_use]
    pub const fn command(&self) -> Command {
        self.request.command()
    }

    /// Finished parameter map.
    #[must_use]
    pub const fn parameters(&self) -> &Parameters {
        self.request.parameters()
    }

    /// Finished request, as handed to the transport.
    #[must_use]
    pub const fn request(&self) -> &SubscriptionRequest {
        &self.request
    }

    /// Normalized symbols, for symbol-scoped kinds.
    #[must_use]
    pub const fn symbols(&self) -> Option<&BTreeSet<String>> {
        match &self.scope {
            Scope::Symbols(scope) => Some(&scope.symbols),
            Scope::Actives(_) => None,
        }
    }

    /// Field codes, for symbol-scoped kinds.
    #[must_use]
    pub const fn fields(&self) -> Option<&BTreeSet<u16>> {
        match &self.scope {
            Scope::Symbols(scope) => Some(&scope.fields),
            Scope::Actives(_) => None,
        }
    }

    /// Field family, for symbol-scoped kinds.
    #[must_use]
    pub const fn field_family(&self) -> Option<FieldFamily> {
        match &self.scope {
            Scope::Symbols(scope) => Some(scope.family),
            Scope::Actives(_) => None,
        }
    }

    /// Duration, for actives kinds.
    #[must_use]
    pub const fn duration(&self) -> Option<DurationType> {
        match &self.scope {
            Scope::Actives(scope) => Some(scope.duration),
            Scope::Symbols(_) => None,
        }
    }

    /// Venue, for actives kinds.
    #[must_use]
    pub const fn venue(&self) -> Option<Venue> {
        match &self.scope {
            Scope::Actives(scope) => Some(scope.venue),
            Scope::Symbols(_) => None,
        }
    }
}

fn join<T: ToString>(items: &BTreeSet<T>) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

// =============================================================================
// Tests
// =============================================================================
