//! Snapshot cache file
//!
//! Format: `{"stocks": [...], "updated": "<rfc3339>", "source": "live"}`.
//! `source` is optional when reading; files without it are treated as
//! fallback data. `updated` may also be a naive ISO 8601 timestamp (no
//! offset), which is read as UTC.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::error::{MarketDataError, Result};
use crate::types::{ConstituentRecord, Provenance, Snapshot};

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    stocks: Vec<ConstituentRecord>,
    #[serde(deserialize_with = "deserialize_updated")]
    updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<Provenance>,
}

fn deserialize_updated<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_updated(&raw).map_err(serde::de::Error::custom)
}

fn parse_updated(raw: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(timestamp) => Ok(timestamp.with_timezone(&Utc)),
        Err(_) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Utc.from_utc_datetime(&naive)),
    }
}

/// Write `snapshot` to `path` via a sibling temp file and a rename, so a
/// reader never sees a half-written file.
pub async fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let file = SnapshotFile {
        stocks: snapshot.records.clone(),
        updated: snapshot.generated_at,
        source: Some(snapshot.source),
    };
    let body = serde_json::to_vec(&file)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");

    tokio::fs::write(&tmp, &body).await?;
    tokio::fs::rename(&tmp, path).await?;

    info!(path = %path.display(), records = snapshot.len(), "Snapshot persisted");
    Ok(())
}

/// Read a snapshot back, rejecting files with fewer than `min_records`
/// records.
pub async fn read_snapshot(path: &Path, min_records: usize) -> Result<Snapshot> {
    let body = tokio::fs::read(path).await?;
    debug!(path = %path.display(), bytes = body.len(), "Read snapshot file");

    let file: SnapshotFile = serde_json::from_slice(&body)?;

    if file.stocks.len() < min_records || file.stocks.is_empty() {
        return Err(MarketDataError::validation(format!(
            "snapshot file holds {} records, at least {} required",
            file.stocks.len(),
            min_records
        )));
    }

    Ok(Snapshot {
        records: file.stocks,
        generated_at: file.updated,
        source: file.source.unwrap_or(Provenance::Fallback),
    })
}
