//! Live quote provider seam

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::Result;

/// What a live provider reports for one ticker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveQuote {
    pub price: f64,
    pub previous_close: Option<f64>,
    pub market_cap: Option<u64>,
}

impl LiveQuote {
    /// Percent change against the previous close; a missing or non-positive
    /// close is treated as equal to the price.
    pub fn change_percent(&self) -> f64 {
        let previous = self
            .previous_close
            .filter(|close| *close > 0.0)
            .unwrap_or(self.price);

        if previous > 0.0 {
            (self.price - previous) / previous * 100.0
        } else {
            0.0
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait LiveQuoteProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_quote(&self, ticker: &str) -> Result<LiveQuote>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_percent() {
        let quote = LiveQuote {
            price: 110.0,
            previous_close: Some(100.0),
            market_cap: None,
        };
        assert!((quote.change_percent() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_change_percent_without_close() {
        for previous_close in [None, Some(0.0), Some(-3.0)] {
            let quote = LiveQuote {
                price: 42.0,
                previous_close,
                market_cap: None,
            };
            assert_eq!(quote.change_percent(), 0.0);
        }
    }
}
