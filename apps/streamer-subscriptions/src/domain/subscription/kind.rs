//! Subscription kinds and their stable identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::request::ServiceType;
use crate::domain::fields::FieldFamily;

/// Closed set of subscription kinds.
///
/// The discriminant is the kind identifier carried by handles across the
/// boundary. Identifiers 8 (chart forex) and 12 (timesale forex) are
/// reserved: the streamer rejects those services, so they have no kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i32)]
pub enum SubscriptionKind {
    /// Level one equity quotes.
    Quotes = 1,
    /// Level one option quotes.
    Options = 2,
    /// Level one futures quotes.
    LevelOneFutures = 3,
    /// Level one forex quotes.
    LevelOneForex = 4,
    /// Level one futures option quotes.
    LevelOneFuturesOptions = 5,
    /// News headlines.
    NewsHeadline = 6,
    /// Equity minute charts.
    ChartEquity = 7,
    /// Futures minute charts.
    ChartFutures = 9,
    /// Option minute charts.
    ChartOptions = 10,
    /// Equity time & sales.
    TimesaleEquity = 11,
    /// Futures time & sales.
    TimesaleFutures = 13,
    /// Option time & sales.
    TimesaleOptions = 14,
    /// NASDAQ most actives.
    NasdaqActives = 15,
    /// NYSE most actives.
    NyseActives = 16,
    /// OTCBB most actives.
    OtcbbActives = 17,
    /// Option most actives.
    OptionActives = 18,
}

/// Parameter shape a kind is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindShape {
    /// Symbol set plus field codes drawn from the family.
    SymbolField(FieldFamily),
    /// Duration code against a fixed exchange.
    Actives(Exchange),
    /// Duration code against an enumerated option venue.
    OptionActives,
}

/// Exchanges with a fixed-venue actives stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    /// NASDAQ.
    Nasdaq,
    /// New York Stock Exchange.
    Nyse,
    /// OTC Bulletin Board.
    Otcbb,
}

impl Exchange {
    /// Literal venue name used in the `keys` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nasdaq => "NASDAQ",
            Self::Nyse => "NYSE",
            Self::Otcbb => "OTCBB",
        }
    }
}

impl SubscriptionKind {
    /// Every kind, in identifier order.
    pub const ALL: [Self; 16] = [
        Self::Quotes,
        Self::Options,
        Self::LevelOneFutures,
        Self::LevelOneForex,
        Self::LevelOneFuturesOptions,
        Self::NewsHeadline,
        Self::ChartEquity,
        Self::ChartFutures,
        Self::ChartOptions,
        Self::TimesaleEquity,
        Self::TimesaleFutures,
        Self::TimesaleOptions,
        Self::NasdaqActives,
        Self::NyseActives,
        Self::OtcbbActives,
        Self::OptionActives,
    ];

    /// Stable kind identifier.
    #[must_use]
    pub const fn id(self) -> i32 {
        self as i32
    }

    /// Resolve a kind identifier. Unknown and reserved identifiers give `None`.
    #[must_use]
    pub const fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Self::Quotes),
            2 => Some(Self::Options),
            3 => Some(Self::LevelOneFutures),
            4 => Some(Self::LevelOneForex),
            5 => Some(Self::LevelOneFuturesOptions),
            6 => Some(Self::NewsHeadline),
            7 => Some(Self::ChartEquity),
            9 => Some(Self::ChartFutures),
            10 => Some(Self::ChartOptions),
            11 => Some(Self::TimesaleEquity),
            13 => Some(Self::TimesaleFutures),
            14 => Some(Self::TimesaleOptions),
            15 => Some(Self::NasdaqActives),
            16 => Some(Self::NyseActives),
            17 => Some(Self::OtcbbActives),
            18 => Some(Self::OptionActives),
            _ => None,
        }
    }

    /// Streamer service this kind subscribes to.
    #[must_use]
    pub const fn service(self) -> ServiceType {
        match self {
            Self::Quotes => ServiceType::Quote,
            Self::Options => ServiceType::Option,
            Self::LevelOneFutures => ServiceType::LevelOneFutures,
            Self::LevelOneForex => ServiceType::LevelOneForex,
            Self::LevelOneFuturesOptions => ServiceType::LevelOneFuturesOptions,
            Self::NewsHeadline => ServiceType::NewsHeadline,
            Self::ChartEquity => ServiceType::ChartEquity,
            Self::ChartFutures => ServiceType::ChartFutures,
            Self::ChartOptions => ServiceType::ChartOptions,
            Self::TimesaleEquity => ServiceType::TimesaleEquity,
            Self::TimesaleFutures => ServiceType::TimesaleFutures,
            Self::TimesaleOptions => ServiceType::TimesaleOptions,
            Self::NasdaqActives => ServiceType::ActivesNasdaq,
            Self::NyseActives => ServiceType::ActivesNyse,
            Self::OtcbbActives => ServiceType::ActivesOtcbb,
            Self::OptionActives => ServiceType::ActivesOptions,
        }
    }

    /// Parameter shape and validator table for this kind.
    #[must_use]
    pub const fn shape(self) -> KindShape {
        match self {
            Self::Quotes => KindShape::SymbolField(FieldFamily::Quotes),
            Self::Options => KindShape::SymbolField(FieldFamily::Options),
            Self::LevelOneFutures => KindShape::SymbolField(FieldFamily::LevelOneFutures),
            Self::LevelOneForex => KindShape::SymbolField(FieldFamily::LevelOneForex),
            Self::LevelOneFuturesOptions => {
                KindShape::SymbolField(FieldFamily::LevelOneFuturesOptions)
            }
            Self::NewsHeadline => KindShape::SymbolField(FieldFamily::NewsHeadline),
            Self::ChartEquity => KindShape::SymbolField(FieldFamily::ChartEquity),
            Self::ChartFutures | Self::ChartOptions => KindShape::SymbolField(FieldFamily::Chart),
            Self::TimesaleEquity | Self::TimesaleFutures | Self::TimesaleOptions => {
                KindShape::SymbolField(FieldFamily::Timesale)
            }
            Self::NasdaqActives => KindShape::Actives(Exchange::Nasdaq),
            Self::NyseActives => KindShape::Actives(Exchange::Nyse),
            Self::OtcbbActives => KindShape::Actives(Exchange::Otcbb),
            Self::OptionActives => KindShape::OptionActives,
        }
    }

    /// Field family, for symbol-scoped kinds.
    #[must_use]
    pub const fn field_family(self) -> Option<FieldFamily> {
        match self.shape() {
            KindShape::SymbolField(family) => Some(family),
            KindShape::Actives(_) | KindShape::OptionActives => None,
        }
    }

    /// Whether this kind is built from symbols and fields.
    #[must_use]
    pub const fn is_symbol_scoped(self) -> bool {
        matches!(self.shape(), KindShape::SymbolField(_))
    }

    /// Human-readable kind name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Quotes => "QuotesSubscription",
            Self::Options => "OptionsSubscription",
            Self::LevelOneFutures => "LevelOneFuturesSubscription",
            Self::LevelOneForex => "LevelOneForexSubscription",
            Self::LevelOneFuturesOptions => "LevelOneFuturesOptionsSubscription",
            Self::NewsHeadline => "NewsHeadlineSubscription",
            Self::ChartEquity => "ChartEquitySubscription",
            Self::ChartFutures => "ChartFuturesSubscription",
            Self::ChartOptions => "ChartOptionsSubscription",
            Self::TimesaleEquity => "TimesaleEquitySubscription",
            Self::TimesaleFutures => "TimesaleFuturesSubscription",
            Self::TimesaleOptions => "TimesaleOptionsSubscription",
            Self::NasdaqActives => "NasdaqActivesSubscription",
            Self::NyseActives => "NyseActivesSubscription",
            Self::OtcbbActives => "OtcbbActivesSubscription",
            Self::OptionActives => "OptionActivesSubscription",
        }
    }
}

impl fmt::Display for SubscriptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
