//! Yahoo Finance v8 chart endpoint
//!
//! Only the `meta` block of the chart response is read: the regular market
//! price and the previous close. The endpoint carries no market cap.

use std::time::Duration;

use async_trait::async_trait;
use config::QuotesConfig;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::provider::{LiveQuote, LiveQuoteProvider};
use crate::error::{MarketDataError, Result};

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    chart_previous_close: Option<f64>,
    previous_close: Option<f64>,
}

pub struct YahooQuoteProvider {
    client: reqwest::Client,
    endpoint: Url,
}

impl YahooQuoteProvider {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .timeout(timeout)
            .build()?;

        let endpoint = Url::parse(endpoint).map_err(|e| {
            MarketDataError::validation(format!("invalid quote endpoint {}: {}", endpoint, e))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(MarketDataError::validation(format!(
                "quote endpoint {} cannot take a path",
                endpoint
            )));
        }

        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &QuotesConfig) -> Result<Self> {
        Self::new(&config.endpoint, Duration::from_secs(config.timeout_seconds))
    }

    /// The ticker is a single percent-encoded path segment.
    fn chart_url(&self, ticker: &str) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(ticker);
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("interval", "1d")
            .append_pair("range", "1d");
        url
    }
}

#[async_trait]
impl LiveQuoteProvider for YahooQuoteProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    #[instrument(skip(self))]
    async fn fetch_quote(&self, ticker: &str) -> Result<LiveQuote> {
        let response = self.client.get(self.chart_url(ticker)).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MarketDataError::not_found(ticker));
        }

        let body: ChartResponse = response.error_for_status()?.json().await?;
        let quote = parse_chart(ticker, body)?;

        debug!(ticker, price = quote.price, "Live quote fetched");
        Ok(quote)
    }
}

fn parse_chart(ticker: &str, body: ChartResponse) -> Result<LiveQuote> {
    if let Some(error) = body.chart.error {
        return Err(if error.code == "Not Found" {
            MarketDataError::not_found(ticker)
        } else {
            MarketDataError::parse(format!(
                "{}: {}",
                error.code,
                error.description.unwrap_or_default()
            ))
        });
    }

    let meta = body
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .map(|result| result.meta)
        .ok_or_else(|| MarketDataError::parse("chart response has no result"))?;

    let price = meta
        .regular_market_price
        .ok_or_else(|| MarketDataError::parse("chart meta has no regularMarketPrice"))?;

    Ok(LiveQuote {
        price,
        previous_close: meta.chart_previous_close.or(meta.previous_close),
        market_cap: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn parse(json: &str) -> Result<LiveQuote> {
        parse_chart("AAPL", serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_parse_meta() {
        let quote = parse(
            r#"{"chart":{"result":[{"meta":{"symbol":"AAPL","regularMarketPrice":231.5,
                "chartPreviousClose":227.63},"timestamp":[1]}],"error":null}}"#,
        )
        .unwrap();

        assert_eq!(quote.price, 231.5);
        assert_eq!(quote.previous_close, Some(227.63));
        assert_eq!(quote.market_cap, None);
    }

    #[test]
    fn test_parse_error_block() {
        assert_matches!(
            parse(r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#),
            Err(MarketDataError::NotFound(t)) if t == "AAPL"
        );
        assert_matches!(
            parse(r#"{"chart":{"result":[],"error":null}}"#),
            Err(MarketDataError::Parse(_))
        );
        assert_matches!(
            parse(r#"{"chart":{"result":[{"meta":{}}],"error":null}}"#),
            Err(MarketDataError::Parse(_))
        );
    }

    #[test]
    fn test_chart_url() {
        let provider = YahooQuoteProvider::new(
            "https://query1.finance.yahoo.com/v8/finance/chart/",
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(
            provider.chart_url("BRK-B").as_str(),
            "https://query1.finance.yahoo.com/v8/finance/chart/BRK-B?interval=1d&range=1d"
        );
    }

    #[test]
    fn test_chart_url_escapes_reserved_characters() {
        let provider = YahooQuoteProvider::new(
            "https://query1.finance.yahoo.com/v8/finance/chart",
            Duration::from_secs(1),
        )
        .unwrap();

        let url = provider.chart_url("AAPL?RANGE=MAX&INTERVAL=1M#");

        assert_eq!(url.path_segments().unwrap().last(), Some("AAPL%3FRANGE=MAX&INTERVAL=1M%23"));
        assert_eq!(url.query(), Some("interval=1d&range=1d"));
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_rejects_unusable_endpoint() {
        for endpoint in ["not a url", "mailto:quotes@example.com"] {
            assert!(
                matches!(
                    YahooQuoteProvider::new(endpoint, Duration::from_secs(1)),
                    Err(MarketDataError::Validation(_))
                ),
                "endpoint {}",
                endpoint
            );
        }
    }
}
