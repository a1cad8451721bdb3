//! Index membership
//!
//! A [`MembershipSource`] produces the ordered constituent list. The
//! [`MembershipResolver`] is the one place where a failed source turns into
//! the static fallback list; callers always get a non-empty list back.

pub mod fallback;
pub mod wikipedia;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use config::MembershipConfig;
use observability::MarketDataMetrics;
use rand::Rng;
use tracing::{info, warn};

use crate::error::{MarketDataError, Result};
use crate::types::{Constituent, Provenance};

pub use fallback::{fallback_constituents, GICS_SECTORS};
pub use wikipedia::{parse_constituents_table, WikipediaMembershipSource};

/// Produces the ordered `(ticker, name, sector)` list for the index.
#[async_trait]
pub trait MembershipSource: Send + Sync {
    /// Short label for logs
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> Result<Vec<Constituent>>;
}

/// Resolved membership and where it came from.
#[derive(Debug, Clone)]
pub struct Membership {
    pub constituents: Vec<Constituent>,
    pub provenance: Provenance,
}

pub struct MembershipResolver {
    source: Option<Arc<dyn MembershipSource>>,
    timeout: Duration,
    target_count: usize,
    metrics: MarketDataMetrics,
}

impl MembershipResolver {
    pub fn new(source: Option<Arc<dyn MembershipSource>>, timeout: Duration, target_count: usize) -> Self {
        Self {
            source,
            timeout,
            target_count,
            metrics: MarketDataMetrics::new(),
        }
    }

    /// Wikipedia-backed resolver, or fallback-only when scraping is disabled
    /// or the HTTP client cannot be built.
    pub fn from_config(config: &MembershipConfig) -> Self {
        let source: Option<Arc<dyn MembershipSource>> = if config.scrape_enabled {
            match WikipediaMembershipSource::from_config(config) {
                Ok(source) => Some(Arc::new(source)),
                Err(e) => {
                    warn!(error = %e, "Membership source unavailable, using static list only");
                    None
                }
            }
        } else {
            None
        };

        Self::new(
            source,
            Duration::from_secs(config.timeout_seconds),
            config.target_count,
        )
    }

    /// Never fails and never returns an empty list.
    pub async fn resolve<R: Rng + Send + ?Sized>(&self, rng: &mut R) -> Membership {
        let Some(source) = &self.source else {
            return self.fallback(rng);
        };

        let fetched = match tokio::time::timeout(self.timeout, source.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(MarketDataError::network(format!(
                "membership fetch timed out after {:?}",
                self.timeout
            ))),
        };

        match fetched.map(dedup_tickers) {
            Ok(constituents) if !constituents.is_empty() => {
                info!(
                    source = source.name(),
                    count = constituents.len(),
                    "Membership resolved from live source"
                );
                Membership {
                    constituents,
                    provenance: Provenance::Live,
                }
            }
            Ok(_) => {
                warn!(source = source.name(), "Membership source returned no rows, using static list");
                self.fallback(rng)
            }
            Err(e) => {
                warn!(source = source.name(), error = %e, "Membership fetch failed, using static list");
                self.fallback(rng)
            }
        }
    }

    fn fallback<R: Rng + ?Sized>(&self, rng: &mut R) -> Membership {
        self.metrics.record_membership_fallback();
        Membership {
            constituents: fallback_constituents(self.target_count, rng),
            provenance: Provenance::Fallback,
        }
    }
}

/// First occurrence wins; tickers must be unique within a snapshot.
fn dedup_tickers(constituents: Vec<Constituent>) -> Vec<Constituent> {
    let mut seen = HashSet::new();
    constituents
        .into_iter()
        .filter(|c| seen.insert(c.ticker.clone()))
        .collect()
}
