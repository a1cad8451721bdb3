//! Single-ticker resolution with fallbacks

use std::sync::Arc;
use std::time::Duration;

use config::{QuoteProviderKind, QuotesConfig};
use observability::MarketDataMetrics;
use tracing::{debug, info, instrument, warn};

use super::cache::QuoteCache;
use super::provider::LiveQuoteProvider;
use super::yahoo::YahooQuoteProvider;
use super::{QuoteResult, QuoteSource, StockQuote};
use crate::error::{MarketDataError, Result};
use crate::snapshot::SnapshotCache;
use crate::tables::ReferenceTables;
use crate::types::{is_valid_ticker, normalize_ticker};

pub struct QuoteResolver {
    provider: Option<Arc<dyn LiveQuoteProvider>>,
    cache: QuoteCache,
    snapshots: Arc<SnapshotCache>,
    tables: Arc<ReferenceTables>,
    timeout: Duration,
    metrics: MarketDataMetrics,
}

impl QuoteResolver {
    pub fn new(
        provider: Option<Arc<dyn LiveQuoteProvider>>,
        cache: QuoteCache,
        snapshots: Arc<SnapshotCache>,
        tables: Arc<ReferenceTables>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            cache,
            snapshots,
            tables,
            timeout,
            metrics: MarketDataMetrics::new(),
        }
    }

    pub fn from_config(
        config: &QuotesConfig,
        snapshots: Arc<SnapshotCache>,
        tables: Arc<ReferenceTables>,
    ) -> Self {
        let provider: Option<Arc<dyn LiveQuoteProvider>> = match config.provider {
            QuoteProviderKind::Yahoo => match YahooQuoteProvider::from_config(config) {
                Ok(provider) => {
                    info!(provider = provider.name(), endpoint = %config.endpoint, "Live quote provider configured");
                    Some(Arc::new(provider))
                }
                Err(e) => {
                    warn!(error = %e, "Live quote provider unavailable, serving fallbacks only");
                    None
                }
            },
            QuoteProviderKind::None => None,
        };

        Self::new(
            provider,
            QuoteCache::new(Duration::from_secs(config.ttl_seconds), config.max_entries),
            snapshots,
            tables,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    #[instrument(skip(self))]
    pub async fn resolve_quote(&self, ticker: &str) -> QuoteResult {
        let ticker = normalize_ticker(ticker);

        if !is_valid_ticker(&ticker) {
            debug!(%ticker, "Rejecting malformed ticker");
            self.metrics.record_quote_resolution("not_found");
            return QuoteResult::NotFound(ticker);
        }

        if let Some(quote) = self.cache.get(&ticker) {
            debug!(%ticker, "Quote cache hit");
            self.metrics.record_quote_resolution("cache");
            return QuoteResult::Live {
                quote,
                source: QuoteSource::Cache,
            };
        }

        if let Some(provider) = &self.provider {
            match self.fetch_live(provider.as_ref(), &ticker).await {
                Ok(quote) => {
                    self.cache.insert(&ticker, quote.clone());
                    self.metrics.record_quote_resolution("live");
                    return QuoteResult::Live {
                        quote,
                        source: QuoteSource::Live,
                    };
                }
                Err(MarketDataError::NotFound(_)) => {
                    debug!(%ticker, "Live provider does not know ticker");
                }
                Err(e) => {
                    warn!(%ticker, error = %e, "Live quote failed, falling back");
                }
            }
        }

        self.fallback(&ticker).await
    }

    async fn fetch_live(&self, provider: &dyn LiveQuoteProvider, ticker: &str) -> Result<StockQuote> {
        let live = tokio::time::timeout(self.timeout, provider.fetch_quote(ticker))
            .await
            .map_err(|_| {
                MarketDataError::network(format!("quote fetch timed out after {:?}", self.timeout))
            })??;

        if !live.price.is_finite() || live.price <= 0.0 {
            return Err(MarketDataError::parse(format!(
                "provider returned non-positive price {}",
                live.price
            )));
        }

        let market_cap = match live.market_cap.filter(|cap| *cap > 0) {
            Some(cap) => cap,
            None => self
                .snapshots
                .get()
                .await
                .find(ticker)
                .map(|record| record.market_cap)
                .unwrap_or(0),
        };

        Ok(StockQuote::live(ticker, live.price, live.change_percent(), market_cap))
    }

    async fn fallback(&self, ticker: &str) -> QuoteResult {
        let snapshot = self.snapshots.get().await;

        if let Some(record) = snapshot.find(ticker) {
            self.metrics.record_quote_resolution("fallback");
            return QuoteResult::Fallback(StockQuote::from_record(record));
        }

        if let Some(price) = self.tables.prices.get(ticker) {
            self.metrics.record_quote_resolution("fallback");
            let market_cap = self.tables.caps.get(ticker).unwrap_or(0);
            return QuoteResult::Fallback(StockQuote::from_table(ticker, price, market_cap));
        }

        self.metrics.record_quote_resolution("not_found");
        QuoteResult::NotFound(ticker.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::provider::{LiveQuote, MockLiveQuoteProvider};
    use crate::testing::{constituents, snapshot_cache};
    use assert_matches::assert_matches;

    fn resolver(provider: Option<MockLiveQuoteProvider>) -> QuoteResolver {
        QuoteResolver::new(
            provider.map(|p| Arc::new(p) as Arc<dyn LiveQuoteProvider>),
            QuoteCache::new(Duration::from_secs(60), 100),
            snapshot_cache(constituents()),
            Arc::new(ReferenceTables::default()),
            Duration::from_secs(8),
        )
    }

    fn live(price: f64) -> LiveQuote {
        LiveQuote {
            price,
            previous_close: Some(200.0),
            market_cap: Some(3_300_000_000_000),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_lookup_within_ttl_hits_cache() {
        let mut provider = MockLiveQuoteProvider::new();
        provider
            .expect_fetch_quote()
            .times(1)
            .returning(|_| Ok(live(210.0)));
        let resolver = resolver(Some(provider));

        let first = resolver.resolve_quote("AAPL").await;
        assert_eq!(first.source(), Some(QuoteSource::Live));
        assert_eq!(first.quote().unwrap().change_percent, 5.0);

        tokio::time::advance(Duration::from_secs(30)).await;
        let second = resolver.resolve_quote("aapl").await;

        assert_matches!(second, QuoteResult::Live { source: QuoteSource::Cache, ref quote } if quote.price == 210.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_refetches() {
        let mut provider = MockLiveQuoteProvider::new();
        provider
            .expect_fetch_quote()
            .times(2)
            .returning(|_| Ok(live(210.0)));
        let resolver = resolver(Some(provider));

        resolver.resolve_quote("AAPL").await;
        tokio::time::advance(Duration::from_secs(61)).await;

        assert_eq!(resolver.resolve_quote("AAPL").await.source(), Some(QuoteSource::Live));
    }

    #[tokio::test]
    async fn test_zero_price_falls_through_to_snapshot() {
        let mut provider = MockLiveQuoteProvider::new();
        provider
            .expect_fetch_quote()
            .times(2)
            .returning(|_| Ok(live(0.0)));
        let resolver = resolver(Some(provider));

        let result = resolver.resolve_quote("XOM").await;
        assert_matches!(result, QuoteResult::Fallback(ref quote) if !quote.is_live && quote.name.as_deref() == Some("Exxon Mobil"));

        // nothing was cached, so the provider is asked again
        assert_matches!(resolver.resolve_quote("XOM").await, QuoteResult::Fallback(_));
    }

    #[tokio::test]
    async fn test_provider_error_uses_snapshot_record() {
        let mut provider = MockLiveQuoteProvider::new();
        provider
            .expect_fetch_quote()
            .returning(|_| Err(MarketDataError::network("connection reset")));
        let resolver = resolver(Some(provider));

        let result = resolver.resolve_quote("brk.b").await;

        assert_matches!(result, QuoteResult::Fallback(ref quote) if quote.ticker == "BRK-B" && quote.price == 482.79);
    }

    #[tokio::test]
    async fn test_price_table_fallback_outside_snapshot() {
        let resolver = resolver(None);

        let result = resolver.resolve_quote("SEDG").await;

        assert_matches!(result, QuoteResult::Fallback(ref quote) if quote.price == 23.45 && quote.market_cap == 0 && quote.change_percent == 0.0);
        assert_matches!(
            resolver.resolve_quote("MSFT").await,
            QuoteResult::Fallback(ref quote) if quote.market_cap == 3_100_000_000_000
        );
    }

    #[tokio::test]
    async fn test_unknown_ticker_not_found() {
        let mut provider = MockLiveQuoteProvider::new();
        provider
            .expect_fetch_quote()
            .returning(|t| Err(MarketDataError::not_found(t)));
        let resolver = resolver(Some(provider));

        assert_eq!(
            resolver.resolve_quote("NOPE").await,
            QuoteResult::NotFound("NOPE".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_market_cap_uses_snapshot() {
        let mut provider = MockLiveQuoteProvider::new();
        provider.expect_fetch_quote().returning(|_| {
            Ok(LiveQuote {
                price: 110.0,
                previous_close: None,
                market_cap: None,
            })
        });
        let resolver = resolver(Some(provider));

        let quote = resolver.resolve_quote("XOM").await.quote().cloned().unwrap();

        assert!(quote.is_live);
        assert_eq!(quote.market_cap, 500_000_000_000);
        assert_eq!(quote.change_percent, 0.0);
    }

    #[tokio::test]
    async fn test_malformed_ticker_never_reaches_provider() {
        let mut provider = MockLiveQuoteProvider::new();
        provider.expect_fetch_quote().times(0);
        let resolver = resolver(Some(provider));

        assert_matches!(
            resolver.resolve_quote("aapl?range=max&interval=1m#").await,
            QuoteResult::NotFound(_)
        );
        assert!(resolver.cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        struct Stalled;

        #[async_trait::async_trait]
        impl LiveQuoteProvider for Stalled {
            fn name(&self) -> &'static str {
                "stalled"
            }

            async fn fetch_quote(&self, _ticker: &str) -> Result<LiveQuote> {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(live(1.0))
            }
        }

        let resolver = QuoteResolver::new(
            Some(Arc::new(Stalled)),
            QuoteCache::new(Duration::from_secs(60), 100),
            snapshot_cache(constituents()),
            Arc::new(ReferenceTables::default()),
            Duration::from_secs(8),
        );

        assert_matches!(resolver.resolve_quote("AAPL").await, QuoteResult::Fallback(_));
    }
}
