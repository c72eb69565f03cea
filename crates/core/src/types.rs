//! Index record types
//!
//! This module defines the records stored in and decoded from the search
//! index:
//! - IndexKey: deterministic encrypted form of a token
//! - EncId: encrypted entity identifier
//! - EncryptedPosting: posting as stored, opaque until decrypted
//! - Posting: decrypted posting
//! - IndexMetadata: per-entity metadata row keyed by `EncId`
//! - Table: the logical tables the engine reads
//!
//! Stored records are encoded with MessagePack (`rmp-serde`).

use crate::entity::{AppId, AttributeId, TypeId};
use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical table in the transactional store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Table {
    /// IndexKey -> list of encoded [`EncryptedPosting`]
    SearchIndex,
    /// EncId -> encoded [`IndexMetadata`]
    IndexMetadata,
}

impl Table {
    /// Stable table name
    pub const fn as_str(self) -> &'static str {
        match self {
            Table::SearchIndex => "search_index",
            Table::IndexMetadata => "index_metadata",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic keyed transform of a token, used as the index lookup key
///
/// Identical tokens under the same key always yield identical index keys.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexKey(pub Vec<u8>);

impl IndexKey {
    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndexKey({})", hex_prefix(&self.0))
    }
}

/// Encrypted entity identifier
///
/// Equality is byte equality. Only meaningful as a store key and as the
/// identity for the first intersection pass.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EncId(pub Vec<u8>);

impl EncId {
    /// Raw id bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for EncId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncId({})", hex_prefix(&self.0))
    }
}

fn hex_prefix(bytes: &[u8]) -> String {
    let mut out: String = bytes.iter().take(6).map(|b| format!("{:02x}", b)).collect();
    if bytes.len() > 6 {
        out.push_str("..");
    }
    out
}

/// Posting as stored in the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPosting {
    /// Encrypted id of the entity the posting points at
    pub enc_id: EncId,
    /// Encrypted posting body
    pub payload: Vec<u8>,
}

impl EncryptedPosting {
    /// Encode for storage
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec(self)
            .map_err(|e| SearchError::integrity(format!("cannot encode posting: {}", e)))
    }

    /// Decode a stored posting
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Integrity`] if the bytes are not a posting.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        rmp_serde::from_slice(bytes)
            .map_err(|e| SearchError::integrity(format!("undecodable posting: {}", e)))
    }
}

/// Decrypted posting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Logical entity id; the authoritative identity
    pub id: String,
    /// Encrypted entity id; foreign key into the metadata table
    pub enc_id: EncId,
    /// Namespace id of the entity's type
    pub app: AppId,
    /// Type id of the entity's type
    pub type_id: TypeId,
    /// Attribute the token was indexed from
    pub attribute: AttributeId,
}

/// Per-entity metadata row
///
/// Opaque to the engine except for `list_id`, which is surfaced in results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMetadata {
    /// Id of the list (folder, address book) containing the entity
    pub list_id: String,
    /// Owning group of the entity
    pub owner_group: String,
}

impl IndexMetadata {
    /// Encode for storage
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec(self)
            .map_err(|e| SearchError::integrity(format!("cannot encode metadata: {}", e)))
    }

    /// Decode a stored metadata row
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Integrity`] if the bytes are not a metadata row.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        rmp_serde::from_slice(bytes)
            .map_err(|e| SearchError::integrity(format!("undecodable metadata: {}", e)))
    }
}
