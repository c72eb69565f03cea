//! Immutable committed snapshots
//!
//! The store publishes a new [`TableSnapshot`] on every commit and never
//! mutates a published one. A read transaction holds an `Arc` to the
//! snapshot current at `begin_read`, which gives it:
//!
//! - Committed data only (no partial batches)
//! - Repeatable reads for its whole lifetime
//! - No blocking of, or by, writers

use std::collections::BTreeMap;

use cipherdex_core::{StoreError, Table};

use crate::batch::{WriteBatch, WriteOp};
use crate::stored_value::StoredEntry;

/// Point-in-time contents of every table
#[derive(Debug, Clone, Default)]
pub struct TableSnapshot {
    version: u64,
    tables: BTreeMap<Table, BTreeMap<Vec<u8>, StoredEntry>>,
}

impl TableSnapshot {
    /// Empty snapshot at version 0
    pub fn empty() -> Self {
        Self::default()
    }

    /// Commit version this snapshot reflects
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Entry stored under `key`
    pub fn entry(&self, table: Table, key: &[u8]) -> Option<&StoredEntry> {
        self.tables.get(&table).and_then(|t| t.get(key))
    }

    /// Number of keys in a table
    pub fn table_len(&self, table: Table) -> usize {
        self.tables.get(&table).map_or(0, BTreeMap::len)
    }

    /// Produce the successor snapshot with `batch` applied
    ///
    /// The batch is all-or-nothing: on error `self` is untouched and no
    /// successor exists.
    pub(crate) fn apply(&self, batch: &WriteBatch) -> Result<TableSnapshot, StoreError> {
        let mut next = self.clone();
        for op in batch.ops() {
            match op {
                WriteOp::Put { table, key, value } => {
                    next.table_mut(*table)
                        .insert(key.clone(), StoredEntry::Value(value.clone()));
                }
                WriteOp::Append { table, key, value } => {
                    let entry = next
                        .table_mut(*table)
                        .entry(key.clone())
                        .or_insert_with(|| StoredEntry::List(Vec::new()));
                    match entry {
                        StoredEntry::List(items) => items.push(value.clone()),
                        other => {
                            return Err(StoreError::ShapeMismatch {
                                table: *table,
                                expected: "list",
                                found: other.shape(),
                            })
                        }
                    }
                }
                WriteOp::Delete { table, key } => {
                    next.table_mut(*table).remove(key);
                }
            }
        }
        next.version = self.version + 1;
        Ok(next)
    }

    fn table_mut(&mut self, table: Table) -> &mut BTreeMap<Vec<u8>, StoredEntry> {
        self.tables.entry(table).or_default()
    }
}
