//! In-memory snapshot of every synthesized record, optionally mirrored to a
//! JSON file.

pub mod builder;
pub mod cache;
pub mod persist;

pub use builder::SnapshotBuilder;
pub use cache::SnapshotCache;
pub use persist::{read_snapshot, write_snapshot};
