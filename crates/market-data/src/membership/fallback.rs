//! Static membership list used when the live source is unavailable.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::Constituent;

/// The eleven GICS sectors, used for placeholder entries.
pub const GICS_SECTORS: [&str; 11] = [
    "Information Technology",
    "Health Care",
    "Financials",
    "Consumer Discretionary",
    "Communication Services",
    "Industrials",
    "Consumer Staples",
    "Energy",
    "Utilities",
    "Real Estate",
    "Materials",
];

const TOP_CONSTITUENTS: [(&str, &str, &str); 10] = [
    ("AAPL", "Apple Inc.", "Information Technology"),
    ("MSFT", "Microsoft", "Information Technology"),
    ("GOOGL", "Alphabet", "Communication Services"),
    ("AMZN", "Amazon", "Consumer Discretionary"),
    ("NVDA", "NVIDIA", "Information Technology"),
    ("META", "Meta Platforms", "Communication Services"),
    ("TSLA", "Tesla", "Consumer Discretionary"),
    ("BRK-B", "Berkshire Hathaway", "Financials"),
    ("UNH", "UnitedHealth", "Health Care"),
    ("XOM", "Exxon Mobil", "Energy"),
];

/// Ten named companies followed by `STK010`, `STK011`, ... placeholders
/// (no name, random sector) until `target_count` entries exist.
///
/// A `target_count` below ten still returns the ten named companies.
pub fn fallback_constituents<R: Rng + ?Sized>(target_count: usize, rng: &mut R) -> Vec<Constituent> {
    let mut constituents: Vec<Constituent> = TOP_CONSTITUENTS
        .iter()
        .map(|(ticker, name, sector)| Constituent::new(ticker, Some(name), sector))
        .collect();

    while constituents.len() < target_count {
        let idx = constituents.len();
        let sector = GICS_SECTORS.choose(rng).copied().unwrap_or(GICS_SECTORS[0]);
        constituents.push(Constituent::new(&format!("STK{:03}", idx), None, sector));
    }

    constituents
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_padded_to_target() {
        let mut rng = StdRng::seed_from_u64(1);
        let list = fallback_constituents(500, &mut rng);

        assert_eq!(list.len(), 500);
        assert_eq!(list[0].ticker, "AAPL");
        assert_eq!(list[7].ticker, "BRK-B");
        assert_eq!(list[10].ticker, "STK010");
        assert_eq!(list[499].ticker, "STK499");
        assert!(list[10].name.is_none());
        assert!(list[..10].iter().all(|c| c.name.is_some()));
        assert!(list.iter().all(|c| GICS_SECTORS.contains(&c.sector.as_str())));

        let unique: HashSet<_> = list.iter().map(|c| &c.ticker).collect();
        assert_eq!(unique.len(), list.len());
    }

    #[test]
    fn test_small_target_keeps_named_companies() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(fallback_constituents(3, &mut rng).len(), 10);
    }
}
