//! One full membership → synthesis pass.

use std::sync::Arc;

use config::MasterConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, instrument};

use crate::membership::MembershipResolver;
use crate::synthesis::Synthesizer;
use crate::tables::ReferenceTables;
use crate::types::Snapshot;

pub struct SnapshotBuilder {
    membership: MembershipResolver,
    synthesizer: Synthesizer,
    seed: Option<u64>,
}

impl SnapshotBuilder {
    pub fn new(membership: MembershipResolver, synthesizer: Synthesizer, seed: Option<u64>) -> Self {
        Self {
            membership,
            synthesizer,
            seed,
        }
    }

    pub fn from_config(config: &MasterConfig, tables: Arc<ReferenceTables>) -> Self {
        Self::new(
            MembershipResolver::from_config(&config.membership),
            Synthesizer::new(tables, &config.synthesis),
            config.synthesis.seed,
        )
    }

    /// Seeded when configured, otherwise fresh entropy per build.
    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    #[instrument(skip(self))]
    pub async fn build(&self) -> Snapshot {
        let mut rng = self.rng();

        let membership = self.membership.resolve(&mut rng).await;
        let records = self.synthesizer.synthesize(&membership.constituents, &mut rng);
        let snapshot = Snapshot::new(records, membership.provenance);

        info!(
            records = snapshot.len(),
            source = snapshot.source.as_str(),
            "Snapshot built"
        );
        snapshot
    }
}
