//! Market capitalization synthesis

use rand::Rng;

use crate::tables::CapTable;
use crate::types::Constituent;

/// Bounds for generated capitalizations.
#[derive(Debug, Clone, Copy)]
pub struct CapParams {
    /// Aggregate the whole list should roughly add up to
    pub target_aggregate: u64,
    pub min_cap: u64,
    pub max_cap: u64,
}

/// One capitalization per constituent, same order.
///
/// Known tickers take the table value verbatim. The rest share what is left
/// of the target aggregate: each draws `avg * U(0.3, 1.7)`, clamped to
/// `[min_cap, max_cap]`.
pub fn synthesize_caps<R: Rng + ?Sized>(
    constituents: &[Constituent],
    table: &CapTable,
    params: &CapParams,
    rng: &mut R,
) -> Vec<u64> {
    let known: Vec<Option<u64>> = constituents.iter().map(|c| table.get(&c.ticker)).collect();

    let known_total: u64 = known.iter().flatten().fold(0u64, |acc, cap| acc.saturating_add(*cap));
    let unknown_count = known.iter().filter(|cap| cap.is_none()).count();

    let remaining = params.target_aggregate.saturating_sub(known_total) as f64;
    let avg = remaining / unknown_count.max(1) as f64;

    let (min_cap, max_cap) = (params.min_cap as f64, params.max_cap as f64);

    known
        .into_iter()
        .map(|cap| match cap {
            Some(cap) => cap,
            None => {
                let drawn = avg * rng.gen_range(0.3..1.7);
                drawn.max(min_cap).min(max_cap) as u64
            }
        })
        .collect()
}
