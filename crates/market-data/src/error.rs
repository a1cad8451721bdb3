//! Market data error types

use thiserror::Error;

/// Result type for market data operations.
pub type Result<T> = std::result::Result<T, MarketDataError>;

/// Errors raised by the membership scrape, the quote provider and the
/// snapshot cache file.
///
/// `Network` and `Parse` never reach the HTTP layer: each component turns
/// them into a fallback at a single decision point.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// Timeout or connection failure talking to an upstream collaborator
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream answered but the payload was unusable
    #[error("Parse error: {0}")]
    Parse(String),

    /// Ticker absent from every source
    #[error("Ticker {0} not found")]
    NotFound(String),

    /// Missing or malformed request parameter
    #[error("{0}")]
    Validation(String),

    /// Cache file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarketDataError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn not_found(ticker: impl Into<String>) -> Self {
        Self::NotFound(ticker.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<reqwest::Error> for MarketDataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for MarketDataError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
