//! Shared types for Market Data

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One index member as reported by a membership source, before any
/// capitalization or pricing is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constituent {
    pub ticker: String,
    /// Absent for placeholder entries generated to pad the fallback list
    pub name: Option<String>,
    pub sector: String,
}

impl Constituent {
    pub fn new(ticker: &str, name: Option<&str>, sector: &str) -> Self {
        Self {
            ticker: normalize_ticker(ticker),
            name: name.map(str::to_string),
            sector: sector.to_string(),
        }
    }
}

/// Where a whole snapshot's membership list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Scraped from the membership source
    Live,
    /// Static fallback list
    Fallback,
    /// Nothing could be built
    Error,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Live => "live",
            Provenance::Fallback => "fallback",
            Provenance::Error => "error",
        }
    }
}

/// Whether a record's price was looked up or generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceOrigin {
    Table,
    Synthetic,
}

/// A fully synthesized constituent as served by `/api/stocks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstituentRecord {
    pub ticker: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub sector: String,
    pub market_cap: u64,
    pub price: f64,
    pub change_percent: f64,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_origin: Option<PriceOrigin>,
}

/// The complete, internally consistent set of records at one point in time.
///
/// Never mutated in place: a refresh builds a new one and swaps it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub records: Vec<ConstituentRecord>,
    pub generated_at: DateTime<Utc>,
    pub source: Provenance,
}

impl Snapshot {
    pub fn new(records: Vec<ConstituentRecord>, source: Provenance) -> Self {
        let source = if records.is_empty() {
            Provenance::Error
        } else {
            source
        };

        Self {
            records,
            generated_at: Utc::now(),
            source,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by ticker (normalized before comparison).
    pub fn find(&self, ticker: &str) -> Option<&ConstituentRecord> {
        let ticker = normalize_ticker(ticker);
        self.records.iter().find(|r| r.ticker == ticker)
    }

    pub fn total_weight(&self) -> f64 {
        self.records.iter().map(|r| r.weight).sum()
    }
}

/// Canonical symbol form shared by the membership source, the static tables
/// and request parameters: trimmed, uppercase, `.` replaced by `-`.
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase().replace('.', "-")
}

/// Longest symbol accepted from a request.
pub const MAX_TICKER_LEN: usize = 10;

/// Whether a normalized ticker has the shape of an exchange symbol:
/// 1 to 10 characters of `A-Z`, `0-9` and `-`.
pub fn is_valid_ticker(ticker: &str) -> bool {
    (1..=MAX_TICKER_LEN).contains(&ticker.len())
        && ticker
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'-')
}

/// Round half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ticker: &str, weight: f64) -> ConstituentRecord {
        ConstituentRecord {
            ticker: ticker.to_string(),
            name: None,
            sector: "Energy".to_string(),
            market_cap: 10_000_000_000,
            price: 50.0,
            change_percent: 0.0,
            weight,
            price_origin: None,
        }
    }

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker("BRK.B"), "BRK-B");
        assert_eq!(normalize_ticker(" bf.b "), "BF-B");
        assert_eq!(normalize_ticker("AAPL"), "AAPL");
    }

    #[test]
    fn test_ticker_shape() {
        assert!(is_valid_ticker("BRK-B"));
        assert!(is_valid_ticker(&normalize_ticker("bf.b")));
        assert!(is_valid_ticker("STK010"));
        assert!(!is_valid_ticker(""));
        assert!(!is_valid_ticker("aapl"));
        assert!(!is_valid_ticker(&normalize_ticker("aapl?range=max&interval=1m#")));
        assert!(!is_valid_ticker("AAPL MSFT"));
        assert!(!is_valid_ticker("ABCDEFGHIJK"));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(1.23456, 4), 1.2346);
        assert_eq!(round_to(-0.125, 2), -0.13);
    }

    #[test]
    fn test_empty_snapshot_is_error() {
        let snapshot = Snapshot::new(Vec::new(), Provenance::Live);
        assert_eq!(snapshot.source, Provenance::Error);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_find_normalizes() {
        let snapshot = Snapshot::new(vec![record("BRK-B", 60.0), record("XOM", 40.0)], Provenance::Fallback);
        assert!(snapshot.find("brk.b").is_some());
        assert!(snapshot.find("MSFT").is_none());
        assert!((snapshot.total_weight() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_record_wire_format() {
        let json = serde_json::to_value(record("XOM", 1.5)).unwrap();

        assert_eq!(json["market_cap"], 10_000_000_000u64);
        assert_eq!(json["change_percent"], 0.0);
        assert!(json.get("name").is_none());
        assert!(json.get("price_origin").is_none());
    }
}
