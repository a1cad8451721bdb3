//! API request/response models.

use serde::{Deserialize, Serialize};

use crate::quote::{QuoteSource, StockQuote};
use crate::types::{ConstituentRecord, Provenance};

/// `GET /`
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub stocks: usize,
}

/// `GET /api/stocks`
#[derive(Debug, Serialize, Deserialize)]
pub struct StocksResponse {
    pub stocks: Vec<ConstituentRecord>,
    pub count: usize,
    /// RFC 3339 generation time of the snapshot
    pub last_updated: String,
    pub source: Provenance,
}

/// Query string for `GET /api/stock?ticker=`.
#[derive(Debug, Default, Deserialize)]
pub struct StockQuery {
    pub ticker: Option<String>,
}

/// `GET /api/stock/{ticker}`. `success: false` carries only `error`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StockResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<StockQuote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<QuoteSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StockResponse {
    pub fn found(stock: StockQuote, source: QuoteSource) -> Self {
        Self {
            success: true,
            stock: Some(stock),
            source: Some(source),
            error: None,
        }
    }

    pub fn not_found(error: String) -> Self {
        Self {
            success: false,
            stock: None,
            source: None,
            error: Some(error),
        }
    }
}

/// `POST /api/refresh`
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub count: usize,
}

/// `GET /api/health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub stocks: usize,
}

/// Body of every non-200 response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
