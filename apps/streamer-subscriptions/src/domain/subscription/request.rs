//! Request Payload
//!
//! The common shape every subscription reduces to before it leaves the
//! core: a service, a command verb and an ordered parameter map. The
//! transport frames this together with session fields; that framing is
//! not done here.
//!
//! # Wire Format (JSON)
//! ```json
//! {"service": "QUOTE", "command": "SUBS", "parameters": {"fields": "0,1,2", "keys": "AAPL,SPY"}}
//! ```

use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

// =============================================================================
// Service
// =============================================================================

/// Streamer service a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum ServiceType {
    /// `QUOTE`
    Quote = 1,
    /// `OPTION`
    Option = 2,
    /// `LEVELONE_FUTURES`
    #[serde(rename = "LEVELONE_FUTURES")]
    LevelOneFutures = 3,
    /// `LEVELONE_FOREX`
    #[serde(rename = "LEVELONE_FOREX")]
    LevelOneForex = 4,
    /// `LEVELONE_FUTURES_OPTIONS`
    #[serde(rename = "LEVELONE_FUTURES_OPTIONS")]
    LevelOneFuturesOptions = 5,
    /// `NEWS_HEADLINE`
    NewsHeadline = 6,
    /// `CHART_EQUITY`
    ChartEquity = 7,
    /// `CHART_FUTURES`
    ChartFutures = 9,
    /// `CHART_OPTIONS`
    ChartOptions = 10,
    /// `TIMESALE_EQUITY`
    TimesaleEquity = 11,
    /// `TIMESALE_FUTURES`
    TimesaleFutures = 13,
    /// `TIMESALE_OPTIONS`
    TimesaleOptions = 14,
    /// `ACTIVES_NASDAQ`
    ActivesNasdaq = 15,
    /// `ACTIVES_NYSE`
    ActivesNyse = 16,
    /// `ACTIVES_OTCBB`
    ActivesOtcbb = 17,
    /// `ACTIVES_OPTIONS`
    ActivesOptions = 18,
}

impl ServiceType {
    /// Stable integer code exposed through handles.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Service name on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quote => "QUOTE",
            Self::Option => "OPTION",
            Self::LevelOneFutures => "LEVELONE_FUTURES",
            Self::LevelOneForex => "LEVELONE_FOREX",
            Self::LevelOneFuturesOptions => "LEVELONE_FUTURES_OPTIONS",
            Self::NewsHeadline => "NEWS_HEADLINE",
            Self::ChartEquity => "CHART_EQUITY",
            Self::ChartFutures => "CHART_FUTURES",
            Self::ChartOptions => "CHART_OPTIONS",
            Self::TimesaleEquity => "TIMESALE_EQUITY",
            Self::TimesaleFutures => "TIMESALE_FUTURES",
            Self::TimesaleOptions => "TIMESALE_OPTIONS",
            Self::ActivesNasdaq => "ACTIVES_NASDAQ",
            Self::ActivesNyse => "ACTIVES_NYSE",
            Self::ActivesOtcbb => "ACTIVES_OTCBB",
            Self::ActivesOptions => "ACTIVES_OPTIONS",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Command
// =============================================================================

/// Control verb sent alongside the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Command {
    /// Replace the current subscription for the service.
    #[default]
    Subs,
    /// Add keys to the current subscription.
    Add,
    /// Remove keys from the current subscription.
    Unsubs,
    /// Change the field set of the current subscription.
    View,
}

impl Command {
    /// Verb on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subs => "SUBS",
            Self::Add => "ADD",
            Self::Unsubs => "UNSUBS",
            Self::View => "VIEW",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Parameters
// =============================================================================

/// Ordered parameter map with unique keys.
///
/// Built only by the subscription factories, which fix the key set and
/// order per family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameters {
    entries: Vec<(&'static str, String)>,
}

impl Parameters {
    pub(crate) const FIELDS: &'static str = "fields";
    pub(crate) const KEYS: &'static str = "keys";

    /// `{"fields": .., "keys": ..}` for symbol/field requests.
    pub(crate) fn symbol_field(fields: String, keys: String) -> Self {
        Self {
            entries: Vec::with_capacity(2),
        }
        .with(Self::FIELDS, fields)
        .with(Self::KEYS, keys)
    }

    /// `{"keys": .., "fields": "0,1"}` for actives requests.
    pub(crate) fn actives(keys: String) -> Self {
        Self {
            entries: Vec::with_capacity(2),
        }
        .with(Self::KEYS, keys)
        .with(Self::FIELDS, "0,1".to_string())
    }

    fn with(mut self, key: &'static str, value: String) -> Self {
        debug_assert!(self.get(key).is_none(), "duplicate parameter key {key}");
        self.entries.push((key, value));
        self
    }

    /// Look up a parameter value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Parameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Request
// =============================================================================

/// Finished, immutable subscription request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionRequest {
    service: ServiceType,
    command: Command,
    parameters: Parameters,
}

impl SubscriptionRequest {
    pub(crate) const fn new(
        service: ServiceType,
        command: Command,
        parameters: Parameters,
    ) -> Self {
        Self {
            service,
            command,
            parameters,
        }
    }

    /// Target service.
    #[must_use]
    pub const fn service(&self) -> ServiceType {
        self.service
    }

    /// Command verb.
    #[must_use]
    pub const fn command(&self) -> Command {
        self.command
    }

    /// Parameter map.
    #[must_use]
    pub const fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Encode the request as a JSON payload for the transport.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Encode the request as a JSON value.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::subscription::SubscriptionKind;

    #[test]
    fn symbol_field_parameters_order() {
        let params = Parameters::symbol_field("0,1".to_string(), "SPY".to_string());
        let keys: Vec<_> = params.keys().collect();
        assert_eq!(keys, vec!["fields", "keys"]);
        assert_eq!(params.get("keys"), Some("SPY"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn actives_parameters_order() {
        let params = Parameters::actives("NYSE-ALL".to_string());
        let keys: Vec<_> = params.keys().collect();
        assert_eq!(keys, vec!["keys", "fields"]);
        assert_eq!(params.get("fields"), Some("0,1"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn request_json_keeps_parameter_order() {
        let request = SubscriptionRequest::new(
            ServiceType::ActivesNasdaq,
            Command::Subs,
            Parameters::actives("NASDAQ-60".to_string()),
        );

        let json = request.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"service":"ACTIVES_NASDAQ","command":"SUBS","parameters":{"keys":"NASDAQ-60","fields":"0,1"}}"#
        );
    }

    #[test]
    fn service_names_serialize_as_wire_strings() {
        let json = serde_json::to_string(&ServiceType::LevelOneFuturesOptions).unwrap();
        assert_eq!(json, r#""LEVELONE_FUTURES_OPTIONS""#);

        let parsed: ServiceType = serde_json::from_str(r#""LEVELONE_FOREX""#).unwrap();
        assert_eq!(parsed, ServiceType::LevelOneForex);

        let parsed: ServiceType = serde_json::from_str(r#""TIMESALE_EQUITY""#).unwrap();
        assert_eq!(parsed, ServiceType::TimesaleEquity);
    }

    #[test]
    fn serde_names_agree_with_display() {
        for kind in SubscriptionKind::ALL {
            let service = kind.service();
            let json = serde_json::to_string(&service).unwrap();
            assert_eq!(json, format!("\"{service}\""));

            let parsed: ServiceType = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, service);
        }
    }

    #[test]
    fn command_wire_strings() {
        assert_eq!(Command::default(), Command::Subs);
        assert_eq!(Command::Unsubs.to_string(), "UNSUBS");
        assert_eq!(serde_json::to_string(&Command::Add).unwrap(), r#""ADD""#);
    }
}
