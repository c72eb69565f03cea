//! Shared test utilities for all integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from any test's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::{Arc, Once};

pub use cipherdex::entity::{contact_attributes, mail_attributes};
pub use cipherdex::{
    AppId, AttributeId, EntityKind, IndexDocument, IndexReadiness, IndexWriter, MemoryStore,
    Restriction, SearchConfig, SearchEngine, SearchError, SearchErrorKind, SearchKey,
    SearchResult, TypeId, TypeRef,
};

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Install a test-writer subscriber once per binary.
///
/// Set `RUST_LOG=cipherdex=debug` to see pipeline stages.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Fixed master key so runs are reproducible.
pub fn test_key() -> SearchKey {
    SearchKey::from_bytes([0x42; 32]).unwrap()
}

// ============================================================================
// TestIndex - store + writer + engine
// ============================================================================

/// A populated store with a writer and engine over it.
pub struct TestIndex {
    pub store: Arc<MemoryStore>,
    pub key: SearchKey,
    pub writer: IndexWriter,
    pub readiness: IndexReadiness,
}

impl TestIndex {
    /// Empty index that is already ready.
    pub fn new() -> Self {
        init_tracing();
        let key = test_key();
        TestIndex {
            store: Arc::new(MemoryStore::new()),
            writer: IndexWriter::new(key.clone()),
            key,
            readiness: IndexReadiness::ready(),
        }
    }

    /// Empty index whose initial build has not completed.
    pub fn pending() -> Self {
        TestIndex {
            readiness: IndexReadiness::new(),
            ..Self::new()
        }
    }

    /// Commit documents as one batch.
    pub fn add(&self, docs: &[IndexDocument]) -> &Self {
        self.writer.commit(&self.store, docs).unwrap();
        self
    }

    /// Engine with default configuration.
    pub fn engine(&self) -> SearchEngine {
        self.engine_with_config(SearchConfig::default())
    }

    /// Engine with custom configuration.
    pub fn engine_with_config(&self, config: SearchConfig) -> SearchEngine {
        self.engine_with_key(self.key.clone(), config)
    }

    /// Engine decrypting with a different key.
    pub fn engine_with_key(&self, key: SearchKey, config: SearchConfig) -> SearchEngine {
        SearchEngine::builder()
            .store(self.store.clone())
            .crypto(Arc::new(key))
            .readiness(self.readiness.clone())
            .config(config)
            .build()
            .unwrap()
    }
}

impl Default for TestIndex {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Document helpers
// ============================================================================

/// Mail with a subject.
pub fn mail(id: &str, subject: &str) -> IndexDocument {
    IndexDocument::new(EntityKind::Mail, id, "inbox").field(mail_attributes::SUBJECT, subject)
}

/// Contact with first and last name.
pub fn contact(id: &str, first: &str, last: &str) -> IndexDocument {
    IndexDocument::new(EntityKind::Contact, id, "contacts")
        .field(contact_attributes::FIRST_NAME, first)
        .field(contact_attributes::LAST_NAME, last)
}

/// Ids in a result's mail bucket.
pub fn mail_ids(result: &SearchResult) -> Vec<String> {
    result.buckets.mails.iter().map(|h| h.id.clone()).collect()
}

/// Ids in a result's contact bucket.
pub fn contact_ids(result: &SearchResult) -> Vec<String> {
    result.buckets.contacts.iter().map(|h| h.id.clone()).collect()
}

/// Assert two results serialize to identical bytes.
pub fn assert_same_bytes(a: &SearchResult, b: &SearchResult) {
    assert_eq!(
        serde_json::to_vec(a).unwrap(),
        serde_json::to_vec(b).unwrap()
    );
}
