//! Bounded TTL cache for live quotes

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::StockQuote;

#[derive(Debug, Clone)]
struct CachedQuote {
    quote: StockQuote,
    fetched_at: Instant,
}

/// Ticker → last live quote, valid for `ttl`.
///
/// Expired entries are swept on every insert; past `max_entries` the oldest
/// entry is evicted. The lock is never held across an await.
pub struct QuoteCache {
    entries: Mutex<HashMap<String, CachedQuote>>,
    ttl: Duration,
    max_entries: usize,
}

impl QuoteCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    /// Fresh entry for `ticker`, if any.
    pub fn get(&self, ticker: &str) -> Option<StockQuote> {
        let entries = self.entries.lock();
        entries
            .get(ticker)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.quote.clone())
    }

    pub fn insert(&self, ticker: &str, quote: StockQuote) {
        if self.ttl.is_zero() {
            return;
        }

        let now = Instant::now();
        let mut entries = self.entries.lock();

        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.fetched_at) < self.ttl);
        let swept = before - entries.len();

        entries.insert(
            ticker.to_string(),
            CachedQuote {
                quote,
                fetched_at: now,
            },
        );

        while entries.len() > self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.fetched_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    entries.remove(&key);
                }
                None => break,
            }
        }

        if swept > 0 {
            debug!(swept, size = entries.len(), "Expired quotes swept");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(ticker: &str, price: f64) -> StockQuote {
        StockQuote::live(ticker, price, 0.0, 0)
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = QuoteCache::new(Duration::from_secs(60), 10);
        cache.insert("AAPL", quote("AAPL", 231.5));

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("AAPL").map(|q| q.price), Some(231.5));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("AAPL").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_sweeps_expired() {
        let cache = QuoteCache::new(Duration::from_secs(60), 10);
        cache.insert("AAPL", quote("AAPL", 1.0));
        cache.insert("MSFT", quote("MSFT", 2.0));

        tokio::time::advance(Duration::from_secs(61)).await;
        cache.insert("NVDA", quote("NVDA", 3.0));

        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_oldest_evicted_past_capacity() {
        let cache = QuoteCache::new(Duration::from_secs(60), 2);
        cache.insert("AAPL", quote("AAPL", 1.0));
        tokio::time::advance(Duration::from_secs(1)).await;
        cache.insert("MSFT", quote("MSFT", 2.0));
        tokio::time::advance(Duration::from_secs(1)).await;
        cache.insert("NVDA", quote("NVDA", 3.0));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("AAPL").is_none());
        assert!(cache.get("MSFT").is_some());
        assert!(cache.get("NVDA").is_some());
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cache = QuoteCache::new(Duration::ZERO, 10);
        cache.insert("AAPL", quote("AAPL", 1.0));
        assert!(cache.is_empty());
    }
}
