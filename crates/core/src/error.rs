//! Error types for cipherdex
//!
//! This module defines the error hierarchy used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! # Layers
//!
//! - [`StoreError`]: raised by a [`Store`](crate::traits::Store) or one of its transactions
//! - [`CryptoError`]: raised by an [`IndexCrypto`](crate::traits::IndexCrypto) implementation
//! - [`RegistryError`]: raised by a [`TypeRegistry`](crate::traits::TypeRegistry)
//! - [`SearchError`]: the only error a caller of `search` ever sees
//!
//! Collaborator errors are classified into a [`SearchError`] by the engine at
//! the call site that produced them. A store failure is always a retrieval
//! error; a crypto failure is always an integrity error.

use crate::entity::TypeRef;
use crate::types::Table;
use thiserror::Error;

/// Result type alias for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors surfaced by the search engine
///
/// Every variant aborts the whole search call. Nothing is retried internally
/// and no partial result is returned alongside an error.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The initial index build did not complete within the configured wait
    #[error("Search index not ready after {waited_ms}ms")]
    NotReady {
        /// How long the engine waited before giving up
        waited_ms: u64,
    },

    /// The store failed to serve a read
    #[error("Retrieval from {table} failed: {reason}")]
    Retrieval {
        /// Table being read
        table: Table,
        /// Underlying store failure
        reason: String,
    },

    /// Index content could not be decrypted or decoded
    #[error("Index integrity violation: {0}")]
    Integrity(String),

    /// The caller supplied a restriction the registry cannot satisfy
    #[error("Invalid restriction on {type_ref}: {reason}")]
    InvalidRestriction {
        /// The offending type reference
        type_ref: TypeRef,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration could not be loaded or is incomplete
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Payload-free classification of a [`SearchError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchErrorKind {
    /// See [`SearchError::NotReady`]
    NotReady,
    /// See [`SearchError::Retrieval`]
    Retrieval,
    /// See [`SearchError::Integrity`]
    Integrity,
    /// See [`SearchError::InvalidRestriction`]
    InvalidRestriction,
    /// See [`SearchError::Config`]
    Config,
}

impl SearchError {
    /// Classify this error without inspecting its payload
    pub fn kind(&self) -> SearchErrorKind {
        match self {
            SearchError::NotReady { .. } => SearchErrorKind::NotReady,
            SearchError::Retrieval { .. } => SearchErrorKind::Retrieval,
            SearchError::Integrity(_) => SearchErrorKind::Integrity,
            SearchError::InvalidRestriction { .. } => SearchErrorKind::InvalidRestriction,
            SearchError::Config(_) => SearchErrorKind::Config,
        }
    }

    /// Wrap a store failure that happened while reading `table`
    pub fn retrieval(table: Table, err: StoreError) -> Self {
        SearchError::Retrieval {
            table,
            reason: err.to_string(),
        }
    }

    /// Build an integrity error from anything displayable
    pub fn integrity(reason: impl Into<String>) -> Self {
        SearchError::Integrity(reason.into())
    }
}

/// Errors raised by a transactional store
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store cannot serve requests
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A transaction read a table it was not opened over
    #[error("table {0} is not in transaction scope")]
    TableNotInScope(Table),

    /// The key holds a value where a list was expected, or vice versa
    #[error("key in {table} holds a {found}, expected a {expected}")]
    ShapeMismatch {
        /// Table the key lives in
        table: Table,
        /// Shape the caller asked for
        expected: &'static str,
        /// Shape actually stored
        found: &'static str,
    },

    /// The transaction was used after its scope ended
    #[error("transaction closed")]
    Closed,
}

/// Errors raised by keyed index crypto
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Authentication failed: wrong key or tampered ciphertext
    #[error("decryption failed: {0}")]
    Decrypt(String),

    /// Ciphertext or plaintext is structurally malformed
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Encryption failed
    #[error("encryption failed: {0}")]
    Encrypt(String),
}

/// Errors raised by an entity type registry
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No type is registered under the reference
    #[error("type {0} is not registered")]
    NotFound(TypeRef),
}
