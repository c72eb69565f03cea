//! Core types and traits for cipherdex
//!
//! This crate defines the foundational types used throughout the system:
//! - Entity model: AppId, TypeId, AttributeId, TypeRef, TypeInfo, EntityKind
//! - Index records: IndexKey, EncId, EncryptedPosting, Posting, IndexMetadata, Table
//! - Search types: Restriction, SearchHit, Buckets, SearchStats, SearchResult
//! - Error: SearchError and the collaborator error types
//! - Traits: Tokenizer, IndexCrypto, Store, ReadTransaction, TypeRegistry

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entity;
pub mod error;
pub mod search_types;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use entity::{AppId, AttributeId, EntityKind, TypeId, TypeInfo, TypeRef};
pub use error::{CryptoError, RegistryError, Result, SearchError, SearchErrorKind, StoreError};
pub use search_types::{Buckets, Restriction, SearchHit, SearchResult, SearchStats};
pub use traits::{IndexCrypto, ReadTransaction, Store, Tokenizer, TypeRegistry};
pub use types::{EncId, EncryptedPosting, IndexKey, IndexMetadata, Posting, Table};
