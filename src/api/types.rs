//! Response bodies of the dashboard server.

use crate::api::error::ApiError;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One structured holding. Amounts arrive as numbers or numeric strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Holding {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub free: f64,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub locked: f64,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub usdc_value: f64,
}

impl Holding {
    pub fn total(&self) -> f64 {
        self.free + self.locked
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HoldingEntry {
    Structured(Holding),
    /// Anything that is not an object is shown as-is.
    Display(String),
}

impl<'de> Deserialize<'de> for HoldingEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(map) => serde_json::from_value(Value::Object(map))
                .map(HoldingEntry::Structured)
                .map_err(de::Error::custom),
            Value::String(s) => Ok(HoldingEntry::Display(s)),
            other => Ok(HoldingEntry::Display(other.to_string())),
        }
    }
}

/// Holdings keyed by asset symbol, in the order the server sent them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioSnapshot {
    entries: Vec<(String, HoldingEntry)>,
}

impl PortfolioSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a holding; a repeated symbol replaces the earlier entry in place.
    pub fn insert(&mut self, symbol: impl Into<String>, entry: HoldingEntry) {
        let symbol = symbol.into();
        if let Some(slot) = self.entries.iter_mut().find(|(s, _)| *s == symbol) {
            slot.1 = entry;
        } else {
            self.entries.push((symbol, entry));
        }
    }

    #[cfg(test)]
    pub fn with(mut self, symbol: impl Into<String>, entry: HoldingEntry) -> Self {
        self.insert(symbol, entry);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HoldingEntry)> {
        self.entries.iter().map(|(s, e)| (s.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of `usdc_value` over structured holdings.
    pub fn total_value(&self) -> f64 {
        self.entries
            .iter()
            .filter_map(|(_, entry)| match entry {
                HoldingEntry::Structured(h) => Some(h.usdc_value),
                HoldingEntry::Display(_) => None,
            })
            .sum()
    }
}

impl<'de> Deserialize<'de> for PortfolioSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = PortfolioSnapshot;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of asset symbols to holdings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut snapshot = PortfolioSnapshot::new();
                while let Some((symbol, entry)) = map.next_entry::<String, HoldingEntry>()? {
                    snapshot.insert(symbol, entry);
                }
                Ok(snapshot)
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}

fn lenient_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Body of the status endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    /// Seconds until the server's next rebalance; `null` means no update.
    #[serde(default)]
    pub remaining: Option<u64>,
    #[serde(default)]
    pub portfolio: Option<PortfolioSnapshot>,
    #[serde(default)]
    pub rebalance: Option<Value>,
    #[serde(default)]
    pub is_running: Option<bool>,
    #[serde(default)]
    pub dry_run_mode: Option<bool>,
}

impl StatusResponse {
    /// The last rebalance record, unless it is missing or an empty object.
    pub fn rebalance_log(&self) -> Option<&Value> {
        non_empty_record(self.rebalance.as_ref())
    }
}

fn non_empty_record(record: Option<&Value>) -> Option<&Value> {
    match record {
        Some(Value::Object(map)) if map.is_empty() => None,
        Some(Value::Null) | None => None,
        Some(value) => Some(value),
    }
}

fn application_error(status: &str, error: Option<String>) -> ApiError {
    log::debug!("server answered with status '{}'", status);
    ApiError::Application(error.unwrap_or_else(|| "Unknown error".to_string()))
}

/// Body of the portfolio refresh endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub status: String,
    #[serde(default)]
    pub portfolio: Option<PortfolioSnapshot>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RefreshResponse {
    /// Split into the refreshed portfolio or an application error.
    pub fn into_result(self) -> Result<PortfolioSnapshot, ApiError> {
        if self.status == "ok" {
            Ok(self.portfolio.unwrap_or_default())
        } else {
            Err(application_error(&self.status, self.error))
        }
    }
}

/// Body of the rebalance endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RebalanceResponse {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub rebalance: Option<Value>,
    #[serde(default)]
    pub dry_run: Option<bool>,
}

impl RebalanceResponse {
    #[cfg(test)]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            error: None,
            rebalance: None,
            dry_run: None,
        }
    }

    /// Record of the rebalance just performed, if the server sent one.
    pub fn rebalance_log(&self) -> Option<&Value> {
        non_empty_record(self.rebalance.as_ref())
    }

    pub fn into_result(self) -> Result<RebalanceResponse, ApiError> {
        if self.status == "ok" {
            Ok(self)
        } else {
            Err(application_error(&self.status, self.error))
        }
    }
}

/// Form body of the language switch endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SetLanguageForm {
    pub language: String,
    pub next: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_keeps_server_order() {
        let body = r#"{"ETH": {"free": "2", "locked": 0, "usdc_value": 6000},
                       "BTC": {"free": 1, "locked": "0.5", "usdc_value": "90000.5"},
                       "NOTE": "fetch pending"}"#;
        let snapshot: PortfolioSnapshot = serde_json::from_str(body).unwrap();

        let symbols: Vec<_> = snapshot.iter().map(|(s, _)| s).collect();
        assert_eq!(symbols, vec!["ETH", "BTC", "NOTE"]);
        assert_eq!(
            snapshot.iter().nth(1).unwrap().1,
            &HoldingEntry::Structured(Holding {
                free: 1.0,
                locked: 0.5,
                usdc_value: 90000.5,
            })
        );
        assert_eq!(
            snapshot.iter().nth(2).unwrap().1,
            &HoldingEntry::Display("fetch pending".to_string())
        );
        assert_eq!(snapshot.total_value(), 96000.5);
    }

    #[test]
    fn holding_defaults_missing_and_garbage_fields_to_zero() {
        let holding: Holding =
            serde_json::from_value(json!({"free": "abc", "usdc_value": null})).unwrap();
        assert_eq!(holding, Holding::default());
    }

    #[test]
    fn non_string_scalars_are_displayed_verbatim() {
        let snapshot: PortfolioSnapshot = serde_json::from_value(json!({"X": 12.5})).unwrap();
        assert_eq!(
            snapshot.iter().next().unwrap().1,
            &HoldingEntry::Display("12.5".to_string())
        );
    }

    #[test]
    fn status_with_null_remaining() {
        let status: StatusResponse = serde_json::from_value(json!({
            "is_running": false,
            "remaining": null,
            "portfolio": {},
            "rebalance": {},
            "dry_run_mode": true
        }))
        .unwrap();
        assert_eq!(status.remaining, None);
        assert!(status.rebalance_log().is_none());
        assert_eq!(status.dry_run_mode, Some(true));
        assert!(status.portfolio.unwrap().is_empty());
    }

    #[test]
    fn status_rebalance_log_kept_when_populated() {
        let status: StatusResponse =
            serde_json::from_value(json!({"remaining": 42, "rebalance": {"orders": []}})).unwrap();
        assert_eq!(status.remaining, Some(42));
        assert_eq!(status.rebalance_log(), Some(&json!({"orders": []})));
    }

    #[test]
    fn refresh_error_status_becomes_application_error() {
        let response: RefreshResponse =
            serde_json::from_value(json!({"status": "error", "error": "binance down"})).unwrap();
        match response.into_result() {
            Err(ApiError::Application(msg)) => assert_eq!(msg, "binance down"),
            other => panic!("unexpected {:?}", other),
        }

        let response: RebalanceResponse =
            serde_json::from_value(json!({"status": "error"})).unwrap();
        match response.into_result() {
            Err(ApiError::Application(msg)) => assert_eq!(msg, "Unknown error"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rebalance_record_is_kept_when_populated() {
        let response: RebalanceResponse =
            serde_json::from_value(json!({"status": "ok", "rebalance": {"orders": 1}})).unwrap();
        assert_eq!(response.rebalance_log(), Some(&json!({"orders": 1})));

        let empty: RebalanceResponse =
            serde_json::from_value(json!({"status": "ok", "rebalance": {}})).unwrap();
        assert_eq!(empty.rebalance_log(), None);
    }

    #[test]
    fn refresh_ok_without_portfolio_is_empty_snapshot() {
        let response: RefreshResponse = serde_json::from_value(json!({"status": "ok"})).unwrap();
        assert!(response.into_result().unwrap().is_empty());
    }
}
