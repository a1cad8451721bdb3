//! HTTP request handlers for the market data API.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::SecondsFormat;
use tracing::info;

use crate::api::models::*;
use crate::error::MarketDataError;
use crate::quote::{QuoteResolver, QuoteResult, QuoteSource};
use crate::snapshot::SnapshotCache;
use crate::types::{is_valid_ticker, normalize_ticker};

const LIST_CACHE_CONTROL: &str = "public, max-age=300";

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Shared state for market data API handlers.
pub struct MarketDataApiState {
    pub snapshots: Arc<SnapshotCache>,
    pub quotes: Arc<QuoteResolver>,
}

impl MarketDataApiState {
    pub fn new(snapshots: Arc<SnapshotCache>, quotes: Arc<QuoteResolver>) -> Self {
        Self { snapshots, quotes }
    }
}

/// The only non-200 response: a malformed request.
fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            success: false,
            error: MarketDataError::validation(message).to_string(),
        }),
    )
}

fn missing_ticker() -> ApiError {
    bad_request("Missing ticker")
}

/// GET /
pub async fn root(State(state): State<Arc<MarketDataApiState>>) -> Json<RootResponse> {
    let snapshot = state.snapshots.get().await;

    Json(RootResponse {
        message: "S&P 500 API".to_string(),
        stocks: snapshot.len(),
    })
}

/// GET /api/stocks
pub async fn list_stocks(State(state): State<Arc<MarketDataApiState>>) -> impl IntoResponse {
    let snapshot = state.snapshots.get().await;

    let body = StocksResponse {
        stocks: snapshot.records.clone(),
        count: snapshot.len(),
        last_updated: snapshot
            .generated_at
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        source: snapshot.source,
    };

    ([(header::CACHE_CONTROL, LIST_CACHE_CONTROL)], Json(body))
}

/// GET /api/stock/{ticker}
pub async fn get_stock(
    State(state): State<Arc<MarketDataApiState>>,
    Path(ticker): Path<String>,
) -> Result<Json<StockResponse>, ApiError> {
    lookup(&state, &ticker).await
}

/// GET /api/stock?ticker=
pub async fn get_stock_by_query(
    State(state): State<Arc<MarketDataApiState>>,
    Query(params): Query<StockQuery>,
) -> Result<Json<StockResponse>, ApiError> {
    let ticker = params.ticker.unwrap_or_default();
    lookup(&state, &ticker).await
}

/// GET /api/stock/ (no ticker segment)
pub async fn missing_stock_ticker() -> ApiError {
    missing_ticker()
}

async fn lookup(state: &MarketDataApiState, ticker: &str) -> Result<Json<StockResponse>, ApiError> {
    if ticker.trim().is_empty() {
        return Err(missing_ticker());
    }
    if !is_valid_ticker(&normalize_ticker(ticker)) {
        return Err(bad_request("Invalid ticker"));
    }

    let result = state.quotes.resolve_quote(ticker).await;

    let response = match result {
        QuoteResult::Live { quote, source } => StockResponse::found(quote, source),
        QuoteResult::Fallback(quote) => StockResponse::found(quote, QuoteSource::Fallback),
        QuoteResult::NotFound(ticker) => {
            StockResponse::not_found(MarketDataError::not_found(ticker).to_string())
        }
    };

    Ok(Json(response))
}

/// POST /api/refresh
pub async fn refresh(State(state): State<Arc<MarketDataApiState>>) -> Json<RefreshResponse> {
    let snapshot = state.snapshots.refresh().await;
    info!(count = snapshot.len(), "Snapshot refreshed on request");

    Json(RefreshResponse {
        success: !snapshot.is_empty(),
        count: snapshot.len(),
    })
}

/// GET /api/health
///
/// Never triggers a build.
pub async fn health(State(state): State<Arc<MarketDataApiState>>) -> Json<HealthResponse> {
    let stocks = state.snapshots.peek().map(|s| s.len()).unwrap_or(0);

    Json(HealthResponse {
        status: "ok".to_string(),
        stocks,
    })
}

/// OPTIONS on any route; CORS headers are added by the router layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
