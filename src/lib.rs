//! cipherdex - client-side search over a per-user encrypted index
//!
//! cipherdex answers AND queries over an inverted index whose postings are
//! encrypted under a user's key. Only postings that survive intersection on
//! encrypted ids are decrypted; survivors are filtered by an optional type
//! restriction, intersected again on logical ids, hydrated with metadata and
//! grouped into mails and contacts.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use cipherdex::entity::mail_attributes;
//! use cipherdex::{EntityKind, IndexDocument, IndexWriter, MemoryStore, SearchEngine, SearchKey};
//!
//! let key = SearchKey::generate().unwrap();
//! let store = Arc::new(MemoryStore::new());
//!
//! let doc = IndexDocument::new(EntityKind::Mail, "m1", "inbox")
//!     .field(mail_attributes::SUBJECT, "Invoice for March");
//! IndexWriter::new(key.clone()).commit(&store, [&doc]).unwrap();
//!
//! let engine = SearchEngine::builder()
//!     .store(store)
//!     .crypto(Arc::new(key))
//!     .build()
//!     .unwrap();
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let result = rt.block_on(engine.search("march invoice", None)).unwrap();
//! assert_eq!(result.buckets.ids(EntityKind::Mail), vec!["m1"]);
//! ```
//!
//! # Architecture
//!
//! - `cipherdex-core`: data model, errors, collaborator traits
//! - `cipherdex-storage`: in-memory transactional table store
//! - `cipherdex-security`: keyed index crypto
//! - `cipherdex-search`: the query engine
//!
//! This crate re-exports all four and adds [`IndexWriter`], a minimal write
//! path for populating a store.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod writer;

pub use cipherdex_core::{entity, error, search_types, traits, types};
pub use cipherdex_core::{
    AppId, AttributeId, Buckets, CryptoError, EncId, EncryptedPosting, EntityKind, IndexCrypto,
    IndexKey, IndexMetadata, Posting, ReadTransaction, RegistryError, Restriction, Result,
    SearchError, SearchErrorKind, SearchHit, SearchResult, SearchStats, Store, StoreError, Table,
    Tokenizer, TypeId, TypeInfo, TypeRef, TypeRegistry,
};
pub use cipherdex_search::{
    EntityModel, IndexReadiness, SearchConfig, SearchEngine, SearchEngineBuilder, SimpleTokenizer,
    CONFIG_FILE_NAME,
};
pub use cipherdex_security::SearchKey;
pub use cipherdex_storage::{MemoryStore, WriteBatch};
pub use writer::{IndexDocument, IndexWriter};
