//! Snapshot cache with atomic swap-on-refresh
//!
//! Readers clone an `Arc<Snapshot>` out of a short read lock and never see a
//! partially built list. Builds are serialized by an async mutex so concurrent
//! first requests trigger exactly one build.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::MasterConfig;
use observability::MarketDataMetrics;
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::builder::SnapshotBuilder;
use super::persist::{read_snapshot, write_snapshot};
use crate::error::{MarketDataError, Result};
use crate::tables::ReferenceTables;
use crate::types::Snapshot;

pub struct SnapshotCache {
    builder: SnapshotBuilder,
    current: RwLock<Option<Arc<Snapshot>>>,
    build_lock: Mutex<()>,
    cache_file: Option<PathBuf>,
    min_records: usize,
    metrics: MarketDataMetrics,
}

impl SnapshotCache {
    pub fn new(builder: SnapshotBuilder, cache_file: Option<PathBuf>, min_records: usize) -> Self {
        Self {
            builder,
            current: RwLock::new(None),
            build_lock: Mutex::new(()),
            cache_file,
            min_records,
            metrics: MarketDataMetrics::new(),
        }
    }

    pub fn from_config(config: &MasterConfig, tables: Arc<ReferenceTables>) -> Self {
        Self::new(
            SnapshotBuilder::from_config(config, tables),
            config.snapshot.cache_file.as_ref().map(PathBuf::from),
            config.snapshot.min_records,
        )
    }

    pub fn cache_file(&self) -> Option<&Path> {
        self.cache_file.as_deref()
    }

    /// Current snapshot without triggering a build.
    pub fn peek(&self) -> Option<Arc<Snapshot>> {
        self.current.read().clone()
    }

    /// Current snapshot. The first call restores from the cache file when
    /// one is configured and valid, otherwise builds.
    pub async fn get(&self) -> Arc<Snapshot> {
        if let Some(snapshot) = self.peek() {
            return snapshot;
        }

        let _guard = self.build_lock.lock().await;
        if let Some(snapshot) = self.peek() {
            return snapshot;
        }

        if let Some(path) = &self.cache_file {
            match self.load_from(path).await {
                Ok(snapshot) => return snapshot,
                Err(MarketDataError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                    debug!(path = %path.display(), "No snapshot file yet");
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Discarding snapshot file, rebuilding");
                }
            }
        }

        self.rebuild_locked().await
    }

    /// Rebuild unconditionally and swap the result in.
    pub async fn refresh(&self) -> Arc<Snapshot> {
        let _guard = self.build_lock.lock().await;
        self.rebuild_locked().await
    }

    /// Start-up warm-up; same as the first `get()`.
    pub async fn warm_up(&self) -> Arc<Snapshot> {
        let snapshot = self.get().await;
        info!(
            records = snapshot.len(),
            source = snapshot.source.as_str(),
            "Snapshot cache warm"
        );
        snapshot
    }

    pub async fn persist(&self, path: &Path) -> Result<()> {
        let snapshot = self
            .peek()
            .ok_or_else(|| MarketDataError::validation("no snapshot to persist"))?;
        write_snapshot(path, &snapshot).await
    }

    /// Replace the current snapshot with the one stored at `path`.
    ///
    /// Files that fail to parse or hold fewer than the minimum record count
    /// are rejected and leave the current snapshot untouched.
    pub async fn restore(&self, path: &Path) -> Result<Arc<Snapshot>> {
        let _guard = self.build_lock.lock().await;
        self.load_from(path).await
    }

    async fn load_from(&self, path: &Path) -> Result<Arc<Snapshot>> {
        let snapshot = Arc::new(read_snapshot(path, self.min_records).await?);

        info!(
            path = %path.display(),
            records = snapshot.len(),
            generated_at = %snapshot.generated_at,
            "Snapshot restored from file"
        );
        self.metrics.record_snapshot_restore(snapshot.len());
        *self.current.write() = Some(snapshot.clone());
        Ok(snapshot)
    }

    async fn rebuild_locked(&self) -> Arc<Snapshot> {
        let snapshot = Arc::new(self.builder.build().await);

        self.metrics
            .record_snapshot_build(snapshot.source.as_str(), snapshot.len());
        *self.current.write() = Some(snapshot.clone());

        if let Some(path) = &self.cache_file {
            if !snapshot.is_empty() {
                if let Err(e) = write_snapshot(path, &snapshot).await {
                    warn!(path = %path.display(), error = %e, "Failed to persist snapshot");
                }
            }
        }

        snapshot
    }
}
