//! Single-ticker quotes
//!
//! Resolution order: fresh cache entry, live provider, snapshot record,
//! static price table.

pub mod cache;
pub mod provider;
pub mod resolver;
pub mod yahoo;

use serde::{Deserialize, Serialize};

use crate::types::{round_to, ConstituentRecord, PriceOrigin};

pub use cache::QuoteCache;
pub use provider::{LiveQuote, LiveQuoteProvider};
pub use resolver::QuoteResolver;
pub use yahoo::YahooQuoteProvider;

/// Where a single-ticker answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteSource {
    Live,
    Cache,
    Fallback,
}

impl QuoteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteSource::Live => "live",
            QuoteSource::Cache => "cache",
            QuoteSource::Fallback => "fallback",
        }
    }
}

/// Body of the `stock` field in single-ticker responses.
///
/// Live quotes carry only price data; snapshot fallbacks carry the whole
/// record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub ticker: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    pub price: f64,
    pub change_percent: f64,
    pub market_cap: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_origin: Option<PriceOrigin>,
    pub is_live: bool,
}

impl StockQuote {
    pub fn live(ticker: &str, price: f64, change_percent: f64, market_cap: u64) -> Self {
        Self {
            ticker: ticker.to_string(),
            name: None,
            sector: None,
            price: round_to(price, 2),
            change_percent: round_to(change_percent, 2),
            market_cap,
            weight: None,
            price_origin: None,
            is_live: true,
        }
    }

    pub fn from_record(record: &ConstituentRecord) -> Self {
        Self {
            ticker: record.ticker.clone(),
            name: record.name.clone(),
            sector: Some(record.sector.clone()),
            price: record.price,
            change_percent: record.change_percent,
            market_cap: record.market_cap,
            weight: Some(record.weight),
            price_origin: record.price_origin,
            is_live: false,
        }
    }

    /// Last-known table price with no change.
    pub fn from_table(ticker: &str, price: f64, market_cap: u64) -> Self {
        Self {
            ticker: ticker.to_string(),
            name: None,
            sector: None,
            price,
            change_percent: 0.0,
            market_cap,
            weight: None,
            price_origin: None,
            is_live: false,
        }
    }
}

/// Outcome of a single-ticker lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteResult {
    /// Fetched just now or served from the TTL cache
    Live { quote: StockQuote, source: QuoteSource },
    Fallback(StockQuote),
    NotFound(String),
}

impl QuoteResult {
    pub fn source(&self) -> Option<QuoteSource> {
        match self {
            QuoteResult::Live { source, .. } => Some(*source),
            QuoteResult::Fallback(_) => Some(QuoteSource::Fallback),
            QuoteResult::NotFound(_) => None,
        }
    }

    pub fn quote(&self) -> Option<&StockQuote> {
        match self {
            QuoteResult::Live { quote, .. } | QuoteResult::Fallback(quote) => Some(quote),
            QuoteResult::NotFound(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_quote_wire_format() {
        let json = serde_json::to_value(StockQuote::live("AAPL", 231.456, 1.6999, 3_200_000_000_000)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "ticker": "AAPL",
                "price": 231.46,
                "change_percent": 1.7,
                "market_cap": 3_200_000_000_000u64,
                "is_live": true
            })
        );
    }

    #[test]
    fn test_record_quote_keeps_record_fields() {
        let record = ConstituentRecord {
            ticker: "XOM".to_string(),
            name: Some("Exxon Mobil".to_string()),
            sector: "Energy".to_string(),
            market_cap: 500_000_000_000,
            price: 105.1,
            change_percent: -0.42,
            weight: 0.8065,
            price_origin: None,
        };

        let quote = StockQuote::from_record(&record);
        let json = serde_json::to_value(&quote).unwrap();

        assert_eq!(json["name"], "Exxon Mobil");
        assert_eq!(json["sector"], "Energy");
        assert_eq!(json["weight"], 0.8065);
        assert_eq!(json["is_live"], false);
        assert_eq!(QuoteResult::Fallback(quote).source(), Some(QuoteSource::Fallback));
    }
}
