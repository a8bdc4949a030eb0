//! In-memory snapshot store for tests and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::{ReplaceSummary, SnapshotStore};
use crate::types::SeismicRecord;

/// Replace phase at which [`MemoryStore`] should fail, for exercising the
/// purge/load consistency gap in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPhase {
    Scan,
    Purge,
    Load,
}

impl FailPhase {
    fn as_error(self) -> StoreError {
        let source = "injected failure".into();
        match self {
            FailPhase::Scan => StoreError::Scan(source),
            FailPhase::Purge => StoreError::Purge(source),
            FailPhase::Load => StoreError::Load(source),
        }
    }
}

/// In-memory store. Data is lost on drop; not for production use.
///
/// Tracks how many times `replace_all` was called so tests can assert the
/// store was never touched on early pipeline failures.
pub struct MemoryStore {
    items: RwLock<HashMap<Uuid, SeismicRecord>>,
    replace_calls: AtomicUsize,
    fail_phase: Option<FailPhase>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            replace_calls: AtomicUsize::new(0),
            fail_phase: None,
        }
    }

    /// A store that fails at the given replace phase.
    pub fn failing_at(phase: FailPhase) -> Self {
        Self {
            fail_phase: Some(phase),
            ..Self::new()
        }
    }

    /// Number of `replace_all` invocations so far.
    pub fn replace_calls(&self) -> usize {
        self.replace_calls.load(Ordering::SeqCst)
    }

    /// Number of items currently held.
    pub fn len(&self) -> usize {
        self.items.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn replace_all(&self, records: &[SeismicRecord]) -> StoreResult<ReplaceSummary> {
        self.replace_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_phase == Some(FailPhase::Scan) {
            return Err(FailPhase::Scan.as_error());
        }

        let mut items = self.items.write().unwrap();
        let purged = items.len();

        if self.fail_phase == Some(FailPhase::Purge) {
            return Err(FailPhase::Purge.as_error());
        }
        items.clear();

        // Failing here leaves the store empty, reproducing the gap a real
        // backend exhibits when the load phase dies after the purge.
        if self.fail_phase == Some(FailPhase::Load) {
            return Err(FailPhase::Load.as_error());
        }

        for record in records {
            items.insert(record.id, record.clone());
        }
        Ok(ReplaceSummary {
            purged,
            loaded: records.len(),
        })
    }

    async fn fetch_all(&self) -> StoreResult<Vec<SeismicRecord>> {
        if self.fail_phase == Some(FailPhase::Scan) {
            return Err(FailPhase::Scan.as_error());
        }
        Ok(self.items.read().unwrap().values().cloned().collect())
    }
}
