//! HTTP API for the constituent list and single-ticker quotes.
//!
//! ## Modules
//!
//! - `handlers` - Axum handlers over the snapshot cache and quote resolver
//! - `routes` - Router with CORS applied
//! - `models` - Request/response types

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::MarketDataApiState;
pub use routes::market_data_routes;
