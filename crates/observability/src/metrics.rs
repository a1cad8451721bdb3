//! Prometheus metrics
//!
//! Without an installed recorder every handle below is a no-op, so the
//! helpers are safe to call from tests and from the `snapshot` command.

use metrics::{counter, gauge, histogram, Counter, Gauge, Histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Start the Prometheus exporter on `0.0.0.0:{port}/metrics`.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Request metrics for one HTTP server.
///
/// * `server_requests_total`
/// * `server_requests_by_status{status}`
/// * `server_request_duration_seconds`
#[derive(Clone)]
pub struct ServerMetrics {
    requests_total: Counter,
    request_duration: Histogram,
    server_name: String,
}

impl ServerMetrics {
    pub fn new(server_name: &str) -> Self {
        let name = server_name.to_string();

        Self {
            requests_total: counter!("server_requests_total", "server" => name.clone()),
            request_duration: histogram!("server_request_duration_seconds", "server" => name.clone()),
            server_name: name,
        }
    }

    pub fn record_request(&self, duration: Duration, status_code: u16) {
        self.requests_total.increment(1);
        counter!(
            "server_requests_by_status",
            "server" => self.server_name.clone(),
            "status" => status_code.to_string()
        )
        .increment(1);
        self.request_duration.record(duration.as_secs_f64());
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }
}

/// Counters for the snapshot pipeline and the quote resolver.
///
/// * `snapshot_builds_total{source}` - `live`, `fallback` or `error`
/// * `snapshot_records` - record count of the current snapshot
/// * `quote_resolutions_total{source}` - `live`, `cache`, `fallback`, `not_found`
/// * `membership_fallbacks_total`
#[derive(Clone)]
pub struct MarketDataMetrics {
    snapshot_records: Gauge,
    membership_fallbacks: Counter,
}

impl MarketDataMetrics {
    pub fn new() -> Self {
        Self {
            snapshot_records: gauge!("snapshot_records"),
            membership_fallbacks: counter!("membership_fallbacks_total"),
        }
    }

    pub fn record_snapshot_build(&self, source: &'static str, records: usize) {
        counter!("snapshot_builds_total", "source" => source).increment(1);
        self.snapshot_records.set(records as f64);
    }

    /// A snapshot restored from disk replaces the current one without a build.
    pub fn record_snapshot_restore(&self, records: usize) {
        self.snapshot_records.set(records as f64);
    }

    pub fn record_quote_resolution(&self, source: &'static str) {
        counter!("quote_resolutions_total", "source" => source).increment(1);
    }

    pub fn record_membership_fallback(&self) {
        self.membership_fallbacks.increment(1);
    }
}

impl Default for MarketDataMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_metrics_creation() {
        let metrics = ServerMetrics::new("http");
        metrics.record_request(Duration::from_millis(5), 200);
        assert_eq!(metrics.server_name(), "http");
    }

    #[test]
    fn test_market_metrics_without_recorder() {
        let metrics = MarketDataMetrics::default();
        metrics.record_snapshot_build("fallback", 500);
        metrics.record_snapshot_restore(480);
        metrics.record_quote_resolution("cache");
        metrics.record_membership_fallback();
    }
}
