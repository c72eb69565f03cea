//! Collaborator traits
//!
//! The query engine depends on four collaborators it does not implement
//! itself. This module defines their interfaces so that implementations can
//! be swapped without touching the engine:
//!
//! - [`Tokenizer`]: text to normalized tokens
//! - [`IndexCrypto`]: token to index key, posting decryption
//! - [`Store`] / [`ReadTransaction`]: scoped read-only access to tables
//! - [`TypeRegistry`]: type reference to numeric ids
//!
//! Thread safety: all traits require `Send + Sync` so a single engine can
//! serve concurrent searches.

use async_trait::async_trait;

use crate::entity::{TypeInfo, TypeRef};
use crate::error::{CryptoError, RegistryError, StoreError};
use crate::types::{EncryptedPosting, IndexKey, Posting, Table};

/// Splits text into normalized tokens
///
/// Must be deterministic: identical input yields identical tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenize `text` in order of appearance
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Keyed transform and decryption for index records
///
/// Both operations use the same key material, so a posting written under
/// index key `k` decrypts with the crypto instance that derives `k`.
pub trait IndexCrypto: Send + Sync {
    /// Derive the index key for a token. Deterministic.
    fn index_key(&self, token: &str) -> IndexKey;

    /// Decrypt a stored posting
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError`] on key mismatch, tampering or a malformed body.
    fn decrypt_posting(&self, posting: &EncryptedPosting) -> Result<Posting, CryptoError>;
}

/// Read-only transaction over a fixed set of tables
///
/// The transaction's scope is released when the value is dropped, on every
/// exit path.
#[async_trait]
pub trait ReadTransaction: Send + Sync {
    /// Single value stored under `key`, if any
    async fn get(&self, table: Table, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// List stored under `key`; empty if absent
    async fn get_list(&self, table: Table, key: &[u8]) -> Result<Vec<Vec<u8>>, StoreError>;
}

/// Transactional key-value store
///
/// Transactions must see at least read-committed data: a list is observed
/// either entirely before or entirely after a concurrent write.
#[async_trait]
pub trait Store: Send + Sync {
    /// Open a read-only transaction scoped to `tables`
    async fn begin_read(&self, tables: &[Table]) -> Result<Box<dyn ReadTransaction>, StoreError>;
}

/// Resolves type references to numeric ids
pub trait TypeRegistry: Send + Sync {
    /// Look up a type
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for unregistered references.
    fn lookup(&self, type_ref: &TypeRef) -> Result<TypeInfo, RegistryError>;
}
