//! Storage layer for cipherdex
//!
//! This crate implements the transactional table store the query engine
//! reads from:
//! - MemoryStore: snapshot-per-commit store implementing `Store`
//! - MemoryReadTxn: table-scoped read transaction over one snapshot
//! - WriteBatch: atomic write path used by the index build pipeline
//! - TableSnapshot: immutable committed state
//!
//! Read transactions observe committed snapshots only, so a posting list is
//! never seen half-written while the index is being updated.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod memory;
pub mod snapshot;
pub mod stored_value;
pub mod transaction;

pub use batch::{WriteBatch, WriteOp};
pub use memory::MemoryStore;
pub use snapshot::TableSnapshot;
pub use stored_value::StoredEntry;
pub use transaction::MemoryReadTxn;
