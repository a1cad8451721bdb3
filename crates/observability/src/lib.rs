//! Observability infrastructure for Constellation
//!
//! This crate provides:
//! - Structured logging via tracing
//! - Prometheus metrics
//! - Metric helpers for the HTTP server and the market-data pipeline
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("constellation", LogFormat::Pretty)?;
//!
//! // Optional
//! observability::metrics::init_metrics(9090)?;
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{init_metrics, MarketDataMetrics, ServerMetrics};
