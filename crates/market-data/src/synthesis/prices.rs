//! Price synthesis

use rand::Rng;

use crate::tables::PriceTable;
use crate::types::PriceOrigin;

/// Bounds for generated prices. Table prices are never clamped.
#[derive(Debug, Clone, Copy)]
pub struct PriceParams {
    pub min_price: f64,
    pub max_price: f64,
}

/// Unrounded price and daily change for one constituent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub price: f64,
    pub change_percent: f64,
    pub origin: PriceOrigin,
}

/// Heuristic shares outstanding by capitalization tier.
pub fn shares_factor(market_cap: u64) -> f64 {
    match market_cap {
        c if c > 500_000_000_000 => 15e9,
        c if c > 100_000_000_000 => 3e9,
        c if c > 50_000_000_000 => 1e9,
        _ => 500e6,
    }
}

pub fn synthesize_price<R: Rng + ?Sized>(
    ticker: &str,
    market_cap: u64,
    table: &PriceTable,
    params: &PriceParams,
    rng: &mut R,
) -> PricePoint {
    if let Some(price) = table.get(ticker) {
        return PricePoint {
            price,
            change_percent: rng.gen_range(-1.5..1.5),
            origin: PriceOrigin::Table,
        };
    }

    let raw = market_cap as f64 / shares_factor(market_cap) * rng.gen_range(0.95..1.05);

    PricePoint {
        price: raw.max(params.min_price).min(params.max_price),
        change_percent: rng.gen_range(-2.0..2.0),
        origin: PriceOrigin::Synthetic,
    }
}
