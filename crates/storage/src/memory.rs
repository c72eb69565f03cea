//! MemoryStore: in-memory transactional table store
//!
//! This module implements the [`Store`] trait using:
//! - An `Arc<TableSnapshot>` per commit, swapped under a `parking_lot::RwLock`
//! - Copy-on-write batches: a commit clones the current snapshot, applies the
//!   batch, and publishes the result
//! - An `AtomicUsize` counting live read transactions
//!
//! # Design Notes
//!
//! - **Snapshot reads**: a read transaction never observes a batch partially
//! - **Single writer path**: [`MemoryStore::apply`] serializes commits
//! - **O(data) commits**: acceptable for an index that fits in memory

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cipherdex_core::{ReadTransaction, Store, StoreError, Table};
use parking_lot::{Mutex, RwLock};

use crate::batch::WriteBatch;
use crate::snapshot::TableSnapshot;
use crate::transaction::{MemoryReadTxn, ReadControls, ScopeGuard};

/// In-memory transactional store
///
/// # Examples
///
/// ```
/// use cipherdex_core::Table;
/// use cipherdex_storage::{MemoryStore, WriteBatch};
///
/// let store = MemoryStore::new();
/// let mut batch = WriteBatch::new();
/// batch.append(Table::SearchIndex, b"key".to_vec(), b"posting".to_vec());
/// assert_eq!(store.apply(&batch).unwrap(), 1);
/// assert_eq!(store.version(), 1);
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    current: RwLock<Arc<TableSnapshot>>,
    commit_lock: Mutex<()>,
    open: Arc<AtomicUsize>,
    controls: Arc<ReadControls>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store at version 0
    pub fn new() -> Self {
        MemoryStore {
            current: RwLock::new(Arc::new(TableSnapshot::empty())),
            commit_lock: Mutex::new(()),
            open: Arc::new(AtomicUsize::new(0)),
            controls: Arc::new(ReadControls::default()),
        }
    }

    /// Commit a batch atomically
    ///
    /// Returns the new commit version.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShapeMismatch`] if the batch appends to a key
    /// holding a single value; nothing is committed in that case.
    pub fn apply(&self, batch: &WriteBatch) -> Result<u64, StoreError> {
        let _commit = self.commit_lock.lock();
        let base = Arc::clone(&*self.current.read());
        let next = base.apply(batch)?;
        let version = next.version();
        *self.current.write() = Arc::new(next);
        tracing::debug!(
            target: "cipherdex::storage",
            version,
            ops = batch.len(),
            "Batch committed"
        );
        Ok(version)
    }

    /// Latest commit version
    pub fn version(&self) -> u64 {
        self.current.read().version()
    }

    /// The current committed snapshot
    pub fn snapshot(&self) -> Arc<TableSnapshot> {
        Arc::clone(&*self.current.read())
    }

    /// Number of read transactions whose scope has not been released
    pub fn open_transactions(&self) -> usize {
        self.open.load(Ordering::Acquire)
    }

    /// Make every subsequent read fail with [`StoreError::Unavailable`]
    pub fn fail_reads(&self, fail: bool) {
        self.controls.fail_reads.store(fail, Ordering::Release);
    }

    /// Delay every subsequent read by `delay`
    pub fn set_read_delay(&self, delay: Duration) {
        let micros = u64::try_from(delay.as_micros()).unwrap_or(u64::MAX);
        self.controls
            .read_delay_micros
            .store(micros, Ordering::Release);
    }

    /// Open a concrete read transaction
    ///
    /// Same as [`Store::begin_read`] without boxing.
    pub fn read_txn(&self, tables: &[Table]) -> Result<MemoryReadTxn, StoreError> {
        self.controls.check()?;
        let snapshot = self.snapshot();
        let guard = ScopeGuard::enter(Arc::clone(&self.open), snapshot.version());
        let scope: BTreeSet<Table> = tables.iter().copied().collect();
        Ok(MemoryReadTxn::new(
            snapshot,
            scope,
            Arc::clone(&self.controls),
            guard,
        ))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin_read(&self, tables: &[Table]) -> Result<Box<dyn ReadTransaction>, StoreError> {
        Ok(Box::new(self.read_txn(tables)?))
    }
}
