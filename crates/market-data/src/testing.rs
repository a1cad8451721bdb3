//! Shared fixtures for unit tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use config::SynthesisConfig;

use crate::error::Result;
use crate::membership::{MembershipResolver, MembershipSource};
use crate::snapshot::{SnapshotBuilder, SnapshotCache};
use crate::synthesis::Synthesizer;
use crate::tables::ReferenceTables;
use crate::types::Constituent;

pub struct StaticMembership(pub Vec<Constituent>);

#[async_trait]
impl MembershipSource for StaticMembership {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch(&self) -> Result<Vec<Constituent>> {
        Ok(self.0.clone())
    }
}

pub fn constituents() -> Vec<Constituent> {
    vec![
        Constituent::new("AAPL", Some("Apple Inc."), "Information Technology"),
        Constituent::new("BRK.B", Some("Berkshire Hathaway"), "Financials"),
        Constituent::new("XOM", Some("Exxon Mobil"), "Energy"),
        Constituent::new("ZZTEST", Some("Synthetic Test Co"), "Utilities"),
    ]
}

/// Seeded snapshot cache over a fixed membership list, no cache file.
pub fn snapshot_cache(constituents: Vec<Constituent>) -> Arc<SnapshotCache> {
    let config = SynthesisConfig::default();
    let builder = SnapshotBuilder::new(
        MembershipResolver::new(
            Some(Arc::new(StaticMembership(constituents))),
            Duration::from_secs(5),
            500,
        ),
        Synthesizer::new(Arc::new(ReferenceTables::default()), &config),
        Some(7),
    );
    Arc::new(SnapshotCache::new(builder, None, 1))
}
