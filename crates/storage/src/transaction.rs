//! Read transactions over a committed snapshot
//!
//! A [`MemoryReadTxn`] pins the snapshot that was current when it began and
//! may only read the tables it was opened over. Its scope is tracked by a
//! [`ScopeGuard`]: the store's open-transaction count drops back as soon as
//! the transaction value is dropped, whether the caller finished, failed or
//! abandoned the future that owned it.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cipherdex_core::{ReadTransaction, StoreError, Table};

use crate::snapshot::TableSnapshot;

/// Shared knobs the store exposes for fault injection
#[derive(Debug, Default)]
pub(crate) struct ReadControls {
    pub(crate) fail_reads: AtomicBool,
    /// Artificial latency per read, in microseconds (0 = none)
    pub(crate) read_delay_micros: AtomicU64,
}

impl ReadControls {
    pub(crate) fn check(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        Ok(())
    }

    pub(crate) async fn delay(&self) {
        let micros = self.read_delay_micros.load(Ordering::Acquire);
        if micros > 0 {
            tokio::time::sleep(Duration::from_micros(micros)).await;
        }
    }
}

/// Counts a transaction scope for as long as it lives
#[derive(Debug)]
pub(crate) struct ScopeGuard {
    open: Arc<AtomicUsize>,
    version: u64,
}

impl ScopeGuard {
    pub(crate) fn enter(open: Arc<AtomicUsize>, version: u64) -> Self {
        let now_open = open.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::trace!(
            target: "cipherdex::storage",
            version,
            open = now_open,
            "Read transaction opened"
        );
        ScopeGuard { open, version }
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        let now_open = self.open.fetch_sub(1, Ordering::AcqRel) - 1;
        tracing::trace!(
            target: "cipherdex::storage",
            version = self.version,
            open = now_open,
            "Read transaction released"
        );
    }
}

/// Read-only transaction returned by [`MemoryStore::begin_read`](crate::MemoryStore)
#[derive(Debug)]
pub struct MemoryReadTxn {
    snapshot: Arc<TableSnapshot>,
    scope: BTreeSet<Table>,
    controls: Arc<ReadControls>,
    _guard: ScopeGuard,
}

impl MemoryReadTxn {
    pub(crate) fn new(
        snapshot: Arc<TableSnapshot>,
        scope: BTreeSet<Table>,
        controls: Arc<ReadControls>,
        guard: ScopeGuard,
    ) -> Self {
        MemoryReadTxn {
            snapshot,
            scope,
            controls,
            _guard: guard,
        }
    }

    /// Commit version this transaction reads at
    pub fn version(&self) -> u64 {
        self.snapshot.version()
    }

    fn check_scope(&self, table: Table) -> Result<(), StoreError> {
        if self.scope.contains(&table) {
            Ok(())
        } else {
            Err(StoreError::TableNotInScope(table))
        }
    }
}

#[async_trait]
impl ReadTransaction for MemoryReadTxn {
    async fn get(&self, table: Table, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.check_scope(table)?;
        self.controls.delay().await;
        self.controls.check()?;
        match self.snapshot.entry(table, key) {
            Some(entry) => Ok(Some(entry.as_value(table)?.to_vec())),
            None => Ok(None),
        }
    }

    async fn get_list(&self, table: Table, key: &[u8]) -> Result<Vec<Vec<u8>>, StoreError> {
        self.check_scope(table)?;
        self.controls.delay().await;
        self.controls.check()?;
        match self.snapshot.entry(table, key) {
            Some(entry) => Ok(entry.as_list(table)?.to_vec()),
            None => Ok(Vec::new()),
        }
    }
}
