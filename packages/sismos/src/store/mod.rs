//! Durable snapshot storage.
//!
//! The storage layer sits behind one trait so the purge-then-load replace
//! strategy can be swapped (compare-and-swap, double-buffered table)
//! without touching the handler.

mod memory;
mod sqlite;

pub use memory::{FailPhase, MemoryStore};
pub use sqlite::SqliteStore;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::SeismicRecord;

/// Items handled per batched write, matching the original batch-writer
/// granularity.
pub const WRITE_BATCH_SIZE: usize = 25;

/// Counts reported by a completed replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceSummary {
    /// Items removed during the purge phase.
    pub purged: usize,
    /// Items written during the load phase.
    pub loaded: usize,
}

/// Replace-all semantics over the durable table.
///
/// `replace_all` is purge-then-load and deliberately not transactional:
/// a reader between the phases sees an empty table, and a failure during
/// the load phase leaves the snapshot lost or partial, with no rollback.
/// The seam exists so a safer strategy can be substituted later.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Delete every stored item, then insert the given records.
    async fn replace_all(&self, records: &[SeismicRecord]) -> StoreResult<ReplaceSummary>;

    /// Read back the full snapshot, in no particular order.
    async fn fetch_all(&self) -> StoreResult<Vec<SeismicRecord>>;
}
