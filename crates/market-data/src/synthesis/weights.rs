//! Index weights

use crate::types::round_to;

/// `cap / sum(caps) * 100`, rounded to 4 places. All zeros when the total is zero.
pub fn compute_weights(caps: &[u64]) -> Vec<f64> {
    let total: f64 = caps.iter().map(|cap| *cap as f64).sum();

    if total <= 0.0 {
        return vec![0.0; caps.len()];
    }

    caps.iter()
        .map(|cap| round_to(*cap as f64 / total * 100.0, 4))
        .collect()
}
