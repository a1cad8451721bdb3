//! Membership scraped from the Wikipedia "List of S&P 500 companies" page.

use std::time::Duration;

use async_trait::async_trait;
use config::MembershipConfig;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use super::MembershipSource;
use crate::error::{MarketDataError, Result};
use crate::types::Constituent;

const SYMBOL_HEADER: &str = "Symbol";
const SECURITY_HEADER: &str = "Security";
const SECTOR_HEADER: &str = "GICS Sector";

pub struct WikipediaMembershipSource {
    client: reqwest::Client,
    url: String,
}

impl WikipediaMembershipSource {
    pub fn new(url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn from_config(config: &MembershipConfig) -> Result<Self> {
        Self::new(
            &config.source_url,
            &config.user_agent,
            Duration::from_secs(config.timeout_seconds),
        )
    }
}

#[async_trait]
impl MembershipSource for WikipediaMembershipSource {
    fn name(&self) -> &'static str {
        "wikipedia"
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<Constituent>> {
        let html = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        debug!(bytes = html.len(), "Fetched membership page");
        parse_constituents_table(&html)
    }
}

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static CSS selector is valid")
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Column positions of the three fields we need, located by header text.
struct Columns {
    symbol: usize,
    security: usize,
    sector: usize,
}

impl Columns {
    fn locate(headers: &[String]) -> Option<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Some(Self {
            symbol: find(SYMBOL_HEADER)?,
            security: find(SECURITY_HEADER)?,
            sector: find(SECTOR_HEADER)?,
        })
    }
}

/// Parse the first table on the page carrying `Symbol`, `Security` and
/// `GICS Sector` headers into constituents, in document order.
///
/// No such table, or a table without data rows, is a parse error.
pub fn parse_constituents_table(html: &str) -> Result<Vec<Constituent>> {
    let document = Html::parse_document(html);
    let table_sel = selector("table");
    let row_sel = selector("tr");
    let header_sel = selector("th");
    let cell_sel = selector("td");

    for table in document.select(&table_sel) {
        let mut rows = table.select(&row_sel);

        let Some(header_row) = rows.next() else {
            continue;
        };
        let headers: Vec<String> = header_row.select(&header_sel).map(cell_text).collect();
        let Some(columns) = Columns::locate(&headers) else {
            continue;
        };

        let constituents: Vec<Constituent> = rows
            .filter_map(|row| {
                let cells: Vec<String> = row.select(&cell_sel).map(cell_text).collect();
                let ticker = cells.get(columns.symbol)?;
                if ticker.is_empty() {
                    return None;
                }
                Some(Constituent::new(
                    ticker,
                    cells.get(columns.security).map(String::as_str),
                    cells.get(columns.sector).map(String::as_str).unwrap_or_default(),
                ))
            })
            .collect();

        if constituents.is_empty() {
            return Err(MarketDataError::parse("constituents table has no rows"));
        }

        return Ok(constituents);
    }

    Err(MarketDataError::parse("no constituents table found"))
}
