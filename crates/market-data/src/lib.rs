//! # Market Data
//!
//! Synthetic market data for the S&P 500 constituents.
//!
//! ## Pipeline
//!
//! ```text
//! membership (scrape | static list)
//!     → caps (table | generated) → prices (table | generated) → weights
//!     → snapshot cache (memory, optional JSON file)
//! ```
//!
//! Single-ticker quotes are resolved separately: TTL cache, live provider,
//! snapshot record, then the static price table.
//!
//! ## Quick Start
//!
//! ```ignore
//! use market_data::{QuoteResolver, ReferenceTables, SnapshotCache};
//! use std::sync::Arc;
//!
//! let tables = Arc::new(ReferenceTables::from_config(&config.synthesis));
//! let snapshots = Arc::new(SnapshotCache::from_config(&config, tables.clone()));
//! let quotes = QuoteResolver::from_config(&config.quotes, snapshots.clone(), tables);
//!
//! let snapshot = snapshots.warm_up().await;
//! let quote = quotes.resolve_quote("AAPL").await;
//! ```

pub mod error;
pub mod membership;
pub mod quote;
pub mod snapshot;
pub mod synthesis;
pub mod tables;
pub mod types;

#[cfg(feature = "api")]
pub mod api;

#[cfg(test)]
mod testing;

pub use error::{MarketDataError, Result};
pub use membership::{Membership, MembershipResolver, MembershipSource, WikipediaMembershipSource};
pub use quote::{
    LiveQuote, LiveQuoteProvider, QuoteCache, QuoteResolver, QuoteResult, QuoteSource, StockQuote,
    YahooQuoteProvider,
};
pub use snapshot::{SnapshotBuilder, SnapshotCache};
pub use synthesis::Synthesizer;
pub use tables::{CapTable, PriceTable, ReferenceTables};
pub use types::{
    is_valid_ticker, normalize_ticker, Constituent, ConstituentRecord, PriceOrigin, Provenance,
    Snapshot,
};
