//! Stored entry shapes
//!
//! A key either holds a single value (metadata rows) or an append-only list
//! of values (posting lists). Reading a key with the wrong accessor is a
//! [`StoreError::ShapeMismatch`].

use cipherdex_core::{StoreError, Table};

/// What a key holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredEntry {
    /// Single value
    Value(Vec<u8>),
    /// Ordered list of values
    List(Vec<Vec<u8>>),
}

impl StoredEntry {
    /// Shape name used in error messages
    pub fn shape(&self) -> &'static str {
        match self {
            StoredEntry::Value(_) => "value",
            StoredEntry::List(_) => "list",
        }
    }

    /// Borrow as a single value
    pub fn as_value(&self, table: Table) -> Result<&[u8], StoreError> {
        match self {
            StoredEntry::Value(v) => Ok(v),
            other => Err(StoreError::ShapeMismatch {
                table,
                expected: "value",
                found: other.shape(),
            }),
        }
    }

    /// Borrow as a list
    pub fn as_list(&self, table: Table) -> Result<&[Vec<u8>], StoreError> {
        match self {
            StoredEntry::List(items) => Ok(items),
            other => Err(StoreError::ShapeMismatch {
                table,
                expected: "list",
                found: other.shape(),
            }),
        }
    }
}
