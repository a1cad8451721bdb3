//! Static reference tables
//!
//! Last-known prices and market caps for the largest constituents. These are
//! the lowest-confidence layer of the fallback chain: used when no live quote
//! is available and before anything is generated.

use std::collections::HashMap;

use config::SynthesisConfig;
use tracing::debug;

use crate::types::normalize_ticker;

/// Known market capitalizations, whole dollars.
const BUILTIN_CAPS: &[(&str, u64)] = &[
    ("AAPL", 3_200_000_000_000),
    ("MSFT", 3_100_000_000_000),
    ("NVDA", 2_900_000_000_000),
    ("GOOGL", 2_100_000_000_000),
    ("GOOG", 2_100_000_000_000),
    ("AMZN", 2_000_000_000_000),
    ("META", 1_400_000_000_000),
    ("TSLA", 1_100_000_000_000),
    ("BRK-B", 900_000_000_000),
    ("AVGO", 850_000_000_000),
    ("JPM", 700_000_000_000),
    ("LLY", 700_000_000_000),
    ("V", 600_000_000_000),
    ("UNH", 550_000_000_000),
    ("XOM", 500_000_000_000),
    ("MA", 480_000_000_000),
    ("COST", 420_000_000_000),
    ("HD", 400_000_000_000),
    ("PG", 390_000_000_000),
    ("JNJ", 380_000_000_000),
    ("WMT", 370_000_000_000),
    ("NFLX", 350_000_000_000),
    ("CRM", 320_000_000_000),
    ("BAC", 310_000_000_000),
    ("ORCL", 300_000_000_000),
    ("CVX", 280_000_000_000),
    ("KO", 270_000_000_000),
    ("MRK", 260_000_000_000),
    ("ABBV", 250_000_000_000),
    ("PEP", 240_000_000_000),
    ("AMD", 230_000_000_000),
    ("TMO", 220_000_000_000),
    ("CSCO", 210_000_000_000),
    ("ACN", 200_000_000_000),
    ("LIN", 200_000_000_000),
    ("MCD", 195_000_000_000),
    ("ABT", 190_000_000_000),
    ("ADBE", 185_000_000_000),
    ("DHR", 180_000_000_000),
    ("WFC", 175_000_000_000),
    ("TXN", 170_000_000_000),
    ("PM", 165_000_000_000),
    ("VZ", 160_000_000_000),
    ("NEE", 155_000_000_000),
    ("INTC", 100_000_000_000),
];

/// Last-known closing prices.
const BUILTIN_PRICES: &[(&str, f64)] = &[
    ("AAPL", 278.00),
    ("MSFT", 409.04),
    ("NVDA", 185.00),
    ("GOOGL", 185.34),
    ("GOOG", 186.82),
    ("AMZN", 235.42),
    ("META", 719.76),
    ("TSLA", 361.62),
    ("BRK-B", 482.79),
    ("AVGO", 238.59),
    ("JPM", 276.00),
    ("LLY", 821.79),
    ("V", 344.26),
    ("UNH", 517.08),
    ("XOM", 105.10),
    ("MA", 553.08),
    ("COST", 1026.61),
    ("HD", 406.66),
    ("PG", 169.30),
    ("JNJ", 150.73),
    ("WMT", 102.38),
    ("NFLX", 982.54),
    ("CRM", 330.92),
    ("BAC", 46.67),
    ("ORCL", 174.59),
    ("CVX", 147.68),
    ("KO", 62.70),
    ("MRK", 89.91),
    ("ABBV", 181.35),
    ("PEP", 142.41),
    ("AMD", 112.58),
    ("TMO", 538.84),
    ("CSCO", 64.49),
    ("ACN", 360.59),
    ("LIN", 452.88),
    ("MCD", 294.50),
    ("ABT", 124.55),
    ("ADBE", 430.58),
    ("DHR", 233.43),
    ("WFC", 79.68),
    ("TXN", 192.47),
    ("PM", 132.99),
    ("VZ", 39.27),
    ("NEE", 69.56),
    ("INTC", 19.64),
    ("QCOM", 168.92),
    ("IBM", 248.55),
    ("GE", 199.87),
    ("CAT", 365.92),
    ("NOW", 1024.35),
    ("HON", 224.53),
    ("BA", 174.88),
    ("AMGN", 282.34),
    ("RTX", 127.45),
    ("GS", 635.22),
    ("BLK", 1015.67),
    ("ISRG", 585.43),
    ("SBUX", 102.89),
    ("MMM", 148.23),
    ("DIS", 111.34),
    ("NKE", 71.56),
    ("PYPL", 87.45),
    ("F", 9.87),
    ("GM", 52.34),
    ("T", 23.45),
    ("COP", 98.75),
    ("LOW", 245.32),
    ("SPGI", 498.21),
    ("UPS", 125.67),
    ("AXP", 312.45),
    ("DE", 412.88),
    ("PLD", 112.34),
    ("MDLZ", 68.92),
    ("SCHW", 78.45),
    ("ADI", 198.76),
    ("SO", 84.32),
    ("DUK", 105.67),
    ("CME", 234.89),
    ("ICE", 156.78),
    ("PGR", 267.34),
    ("CI", 312.45),
    ("ELV", 378.90),
    ("REGN", 756.23),
    ("CL", 92.45),
    ("PANW", 378.90),
    ("SNPS", 534.67),
    ("CDNS", 289.45),
    ("LRCX", 876.54),
    ("AMAT", 176.89),
    ("KLAC", 698.34),
    ("MCHP", 67.89),
    ("NXPI", 234.56),
    ("FTNT", 98.76),
    ("ENPH", 67.43),
    ("SEDG", 23.45),
];

/// Ticker → last-known price.
#[derive(Debug, Clone)]
pub struct PriceTable {
    prices: HashMap<String, f64>,
}

impl PriceTable {
    pub fn builtin() -> Self {
        Self {
            prices: BUILTIN_PRICES
                .iter()
                .map(|(ticker, price)| (ticker.to_string(), *price))
                .collect(),
        }
    }

    /// Builtin table with `overrides` merged on top. Keys are normalized,
    /// so `BRK.B` in a config file replaces `BRK-B`.
    pub fn with_overrides(overrides: &HashMap<String, f64>) -> Self {
        let mut table = Self::builtin();
        for (ticker, price) in overrides {
            table.prices.insert(normalize_ticker(ticker), *price);
        }
        table
    }

    pub fn get(&self, ticker: &str) -> Option<f64> {
        self.prices.get(ticker).copied()
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.prices.contains_key(ticker)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Ticker → known market capitalization.
#[derive(Debug, Clone)]
pub struct CapTable {
    caps: HashMap<String, u64>,
}

impl CapTable {
    pub fn builtin() -> Self {
        Self {
            caps: BUILTIN_CAPS
                .iter()
                .map(|(ticker, cap)| (ticker.to_string(), *cap))
                .collect(),
        }
    }

    pub fn with_overrides(overrides: &HashMap<String, u64>) -> Self {
        let mut table = Self::builtin();
        for (ticker, cap) in overrides {
            table.caps.insert(normalize_ticker(ticker), *cap);
        }
        table
    }

    pub fn get(&self, ticker: &str) -> Option<u64> {
        self.caps.get(ticker).copied()
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.caps.contains_key(ticker)
    }

    pub fn len(&self) -> usize {
        self.caps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caps.is_empty()
    }
}

impl Default for CapTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Both reference tables, shared by the synthesizer and the quote resolver.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    pub prices: PriceTable,
    pub caps: CapTable,
}

impl ReferenceTables {
    pub fn from_config(config: &SynthesisConfig) -> Self {
        let tables = Self {
            prices: PriceTable::with_overrides(&config.price_overrides),
            caps: CapTable::with_overrides(&config.cap_overrides),
        };
        debug!(
            prices = tables.prices.len(),
            caps = tables.caps.len(),
            "Reference tables loaded"
        );
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookups() {
        let tables = ReferenceTables::default();

        assert_eq!(tables.prices.get("BRK-B"), Some(482.79));
        assert_eq!(tables.prices.get("AAPL"), Some(278.00));
        assert_eq!(tables.caps.get("AAPL"), Some(3_200_000_000_000));
        assert_eq!(tables.caps.get("SEDG"), None);
        assert!(tables.prices.len() > tables.caps.len());
    }

    #[test]
    fn test_builtin_tables_have_no_duplicates() {
        assert_eq!(PriceTable::builtin().len(), BUILTIN_PRICES.len());
        assert_eq!(CapTable::builtin().len(), BUILTIN_CAPS.len());
    }

    #[test]
    fn test_overrides_are_normalized_and_merged() {
        let mut config = SynthesisConfig::default();
        config.price_overrides.insert("brk.b".to_string(), 500.0);
        config.price_overrides.insert("NEWCO".to_string(), 42.0);
        config.cap_overrides.insert("NEWCO".to_string(), 9_000_000_000);

        let tables = ReferenceTables::from_config(&config);

        assert_eq!(tables.prices.get("BRK-B"), Some(500.0));
        assert_eq!(tables.prices.get("NEWCO"), Some(42.0));
        assert_eq!(tables.caps.get("NEWCO"), Some(9_000_000_000));
        assert_eq!(tables.prices.get("MSFT"), Some(409.04));
    }
}
