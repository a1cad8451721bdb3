//! Axum route definitions for the market data API.

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers::{self, MarketDataApiState};

/// Create all market data routes, with `Access-Control-Allow-Origin: *` on
/// every response.
///
/// # Routes
///
/// - `GET /` - Service banner and record count
/// - `GET /api/stocks` - Full constituent list
/// - `GET /api/stock/:ticker` - Single-ticker quote
/// - `GET /api/stock?ticker=` - Same, query-string form
/// - `GET /api/stock/` - Always 400, missing ticker
/// - `POST /api/refresh` - Rebuild the snapshot
/// - `GET /api/health` - Liveness and record count
pub fn market_data_routes(state: Arc<MarketDataApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(handlers::root).options(handlers::preflight))
        .route(
            "/api/stocks",
            get(handlers::list_stocks).options(handlers::preflight),
        )
        .route(
            "/api/stock",
            get(handlers::get_stock_by_query).options(handlers::preflight),
        )
        .route(
            "/api/stock/",
            get(handlers::missing_stock_ticker).options(handlers::preflight),
        )
        .route(
            "/api/stock/:ticker",
            get(handlers::get_stock).options(handlers::preflight),
        )
        .route(
            "/api/refresh",
            post(handlers::refresh).options(handlers::preflight),
        )
        .route(
            "/api/health",
            get(handlers::health).options(handlers::preflight),
        )
        .layer(cors)
        .with_state(state)
}
