//! Capitalization, price and weight synthesis
//!
//! One pipeline shared by every endpoint: constituents go in, fully populated
//! records come out. All randomness comes from the caller's RNG.

pub mod caps;
pub mod prices;
pub mod weights;

use std::sync::Arc;

use config::SynthesisConfig;
use rand::Rng;

use crate::tables::ReferenceTables;
use crate::types::{round_to, Constituent, ConstituentRecord};

pub use caps::{synthesize_caps, CapParams};
pub use prices::{shares_factor, synthesize_price, PriceParams, PricePoint};
pub use weights::compute_weights;

pub struct Synthesizer {
    tables: Arc<ReferenceTables>,
    caps: CapParams,
    prices: PriceParams,
    tag_provenance: bool,
}

impl Synthesizer {
    pub fn new(tables: Arc<ReferenceTables>, config: &SynthesisConfig) -> Self {
        Self {
            tables,
            caps: CapParams {
                target_aggregate: config.target_aggregate_cap,
                min_cap: config.min_synthetic_cap,
                max_cap: config.max_synthetic_cap,
            },
            prices: PriceParams {
                min_price: config.min_synthetic_price,
                max_price: config.max_synthetic_price,
            },
            tag_provenance: config.tag_provenance,
        }
    }

    pub fn tables(&self) -> &Arc<ReferenceTables> {
        &self.tables
    }

    /// Records in the same order as `constituents`.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        constituents: &[Constituent],
        rng: &mut R,
    ) -> Vec<ConstituentRecord> {
        let market_caps = synthesize_caps(constituents, &self.tables.caps, &self.caps, rng);
        let weights = compute_weights(&market_caps);

        constituents
            .iter()
            .zip(market_caps)
            .zip(weights)
            .map(|((constituent, market_cap), weight)| {
                let point = synthesize_price(
                    &constituent.ticker,
                    market_cap,
                    &self.tables.prices,
                    &self.prices,
                    rng,
                );

                ConstituentRecord {
                    ticker: constituent.ticker.clone(),
                    name: constituent.name.clone(),
                    sector: constituent.sector.clone(),
                    market_cap,
                    price: round_to(point.price, 2),
                    change_percent: round_to(point.change_percent, 2),
                    weight,
                    price_origin: self.tag_provenance.then_some(point.origin),
                }
            })
            .collect()
    }
}
