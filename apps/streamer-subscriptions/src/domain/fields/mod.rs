//! Field, Duration and Venue Codes
//!
//! Closed integer enumerations accepted by each streamer service, and the
//! validity predicates over them. Predicates are total: any `i32` can be
//! checked, and out-of-range or negative codes simply report `false`.
//!
//! Kinds that share a base capability share a family, so every chart kind
//! answers `is_valid` identically, as do the time & sales kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Field Families
// =============================================================================

/// Set of legal field codes for a group of subscription kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldFamily {
    /// Level one equity quotes.
    Quotes,
    /// Level one option quotes.
    Options,
    /// Level one futures quotes.
    LevelOneFutures,
    /// Level one forex quotes.
    LevelOneForex,
    /// Level one futures option quotes.
    LevelOneFuturesOptions,
    /// News headlines.
    NewsHeadline,
    /// Equity minute charts.
    ChartEquity,
    /// Futures and option minute charts.
    Chart,
    /// Time & sales for equities, futures and options.
    Timesale,
}

impl FieldFamily {
    /// Highest legal field code. Legal codes are `0..=max_code`.
    #[must_use]
    pub const fn max_code(self) -> u16 {
        match self {
            Self::Quotes => 52,
            Self::Options => 41,
            Self::LevelOneFutures | Self::LevelOneFuturesOptions => 35,
            Self::LevelOneForex => 29,
            Self::NewsHeadline => 10,
            Self::ChartEquity => 8,
            Self::Chart => 6,
            Self::Timesale => 4,
        }
    }

    /// Check whether `code` is a legal field for this family.
    #[must_use]
    pub const fn is_valid(self, code: i32) -> bool {
        code >= 0 && code <= self.max_code() as i32
    }

    /// Number of legal field codes.
    #[must_use]
    pub const fn code_count(self) -> usize {
        self.max_code() as usize + 1
    }

    /// All legal codes, ascending.
    pub fn codes(self) -> impl Iterator<Item = u16> {
        0..=self.max_code()
    }
}

// =============================================================================
// Duration
// =============================================================================

/// Aggregation window for "most actives" streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DurationType {
    /// Whole trading day.
    AllDay = 0,
    /// Trailing 60 minutes.
    Min60 = 1,
    /// Trailing 30 minutes.
    Min30 = 2,
    /// Trailing 10 minutes.
    Min10 = 3,
    /// Trailing 5 minutes.
    Min5 = 4,
    /// Trailing minute.
    Min1 = 5,
}

impl DurationType {
    /// Check whether `code` names a duration.
    #[must_use]
    pub const fn is_valid(code: i32) -> bool {
        Self::from_code(code).is_some()
    }

    /// Resolve a duration from its integer code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::AllDay),
            1 => Some(Self::Min60),
            2 => Some(Self::Min30),
            3 => Some(Self::Min10),
            4 => Some(Self::Min5),
            5 => Some(Self::Min1),
            _ => None,
        }
    }

    /// Integer code of this duration.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Wire form used inside the `keys` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllDay => "ALL",
            Self::Min60 => "3600",
            Self::Min30 => "1800",
            Self::Min10 => "600",
            Self::Min5 => "300",
            Self::Min1 => "60",
        }
    }
}

impl fmt::Display for DurationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Option Venue
// =============================================================================

/// Venue selector for the option "most actives" stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionVenue {
    /// All options by volume.
    Opts = 0,
    /// Calls by volume.
    Calls = 1,
    /// Puts by volume.
    Puts = 2,
    /// All options by dollar value.
    OptsDesc = 3,
    /// Calls by dollar value.
    CallsDesc = 4,
    /// Puts by dollar value.
    PutsDesc = 5,
}

impl OptionVenue {
    /// Check whether `code` names a venue.
    #[must_use]
    pub const fn is_valid(code: i32) -> bool {
        Self::from_code(code).is_some()
    }

    /// Resolve a venue from its integer code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Opts),
            1 => Some(Self::Calls),
            2 => Some(Self::Puts),
            3 => Some(Self::OptsDesc),
            4 => Some(Self::CallsDesc),
            5 => Some(Self::PutsDesc),
            _ => None,
        }
    }

    /// Integer code of this venue.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Canonical wire string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Opts => "OPTS",
            Self::Calls => "CALLS",
            Self::Puts => "PUTS",
            Self::OptsDesc => "OPTS-DESC",
            Self::CallsDesc => "CALLS-DESC",
            Self::PutsDesc => "PUTS-DESC",
        }
    }
}

impl fmt::Display for OptionVenue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(FieldFamily::Quotes, 53)]
    #[test_case(FieldFamily::Options, 42)]
    #[test_case(FieldFamily::LevelOneFutures, 36)]
    #[test_case(FieldFamily::LevelOneForex, 30)]
    #[test_case(FieldFamily::LevelOneFuturesOptions, 36)]
    #[test_case(FieldFamily::NewsHeadline, 11)]
    #[test_case(FieldFamily::ChartEquity, 9)]
    #[test_case(FieldFamily::Chart, 7)]
    #[test_case(FieldFamily::Timesale, 5)]
    fn family_sizes(family: FieldFamily, expected: usize) {
        assert_eq!(family.code_count(), expected);
        assert_eq!(family.codes().count(), expected);
    }

    #[test]
    fn field_predicate_bounds() {
        for family in [FieldFamily::Quotes, FieldFamily::Chart, FieldFamily::Timesale] {
            assert!(family.is_valid(0));
            assert!(family.is_valid(i32::from(family.max_code())));
            assert!(!family.is_valid(i32::from(family.max_code()) + 1));
            assert!(!family.is_valid(-1));
            assert!(!family.is_valid(i32::MIN));
            assert!(!family.is_valid(i32::MAX));
        }
    }

    #[test]
    fn duration_codes_round_trip() {
        for code in 0..=5 {
            let duration = DurationType::from_code(code).unwrap();
            assert_eq!(duration.code(), code);
            assert!(DurationType::is_valid(code));
        }
        assert!(!DurationType::is_valid(6));
        assert!(!DurationType::is_valid(-1));
    }

    #[test]
    fn duration_wire_strings() {
        assert_eq!(DurationType::AllDay.to_string(), "ALL");
        assert_eq!(DurationType::Min60.as_str(), "3600");
        assert_eq!(DurationType::Min1.as_str(), "60");
    }

    #[test]
    fn venue_codes_and_strings() {
        assert_eq!(OptionVenue::from_code(3), Some(OptionVenue::OptsDesc));
        assert_eq!(OptionVenue::OptsDesc.as_str(), "OPTS-DESC");
        assert_eq!(OptionVenue::Calls.to_string(), "CALLS");
        assert!(!OptionVenue::is_valid(6));
        assert!(!OptionVenue::is_valid(-3));
    }
}
