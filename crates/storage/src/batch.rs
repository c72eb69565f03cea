//! Write batches
//!
//! The store's only write path. The index build pipeline collects operations
//! into a [`WriteBatch`] and commits it with
//! [`MemoryStore::apply`](crate::MemoryStore::apply); readers observe either
//! none or all of a batch.

use cipherdex_core::Table;

/// One buffered write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Set a single value
    Put {
        /// Target table
        table: Table,
        /// Key
        key: Vec<u8>,
        /// Value
        value: Vec<u8>,
    },
    /// Append to a list, creating it if absent
    Append {
        /// Target table
        table: Table,
        /// Key
        key: Vec<u8>,
        /// Appended item
        value: Vec<u8>,
    },
    /// Remove a key of either shape
    Delete {
        /// Target table
        table: Table,
        /// Key
        key: Vec<u8>,
    },
}

/// Ordered set of writes committed atomically
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer a put
    pub fn put(&mut self, table: Table, key: Vec<u8>, value: Vec<u8>) -> &mut Self {
        self.ops.push(WriteOp::Put { table, key, value });
        self
    }

    /// Buffer a list append
    pub fn append(&mut self, table: Table, key: Vec<u8>, value: Vec<u8>) -> &mut Self {
        self.ops.push(WriteOp::Append { table, key, value });
        self
    }

    /// Buffer a delete
    pub fn delete(&mut self, table: Table, key: Vec<u8>) -> &mut Self {
        self.ops.push(WriteOp::Delete { table, key });
        self
    }

    /// Buffered operations in order
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Number of buffered operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True if nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
