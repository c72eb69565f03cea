//! Minimal index write path
//!
//! [`IndexWriter`] turns plaintext entities into sealed postings and metadata
//! rows, using the same tokenizer and key as the engine reads with. It exists
//! so a store can be populated for embedding and testing; a production build
//! pipeline would maintain the index incrementally.

use std::collections::BTreeSet;
use std::sync::Arc;

use cipherdex_core::{
    AppId, AttributeId, EntityKind, IndexCrypto, IndexMetadata, Result, SearchError, Table,
    Tokenizer, TypeId,
};
use cipherdex_search::{tokenize_unique, SimpleTokenizer};
use cipherdex_security::SearchKey;
use cipherdex_storage::{MemoryStore, WriteBatch};

/// One entity to index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDocument {
    /// Logical entity id
    pub id: String,
    /// Namespace id of the entity's type
    pub app: AppId,
    /// Type id of the entity's type
    pub type_id: TypeId,
    /// Metadata row stored for the entity
    pub metadata: IndexMetadata,
    /// Indexed text per attribute
    pub fields: Vec<(AttributeId, String)>,
}

impl IndexDocument {
    /// Document of a known kind
    pub fn new(kind: EntityKind, id: impl Into<String>, list_id: impl Into<String>) -> Self {
        Self::with_type(kind.app(), kind.type_id(), id, list_id)
    }

    /// Document of an arbitrary type
    pub fn with_type(
        app: AppId,
        type_id: TypeId,
        id: impl Into<String>,
        list_id: impl Into<String>,
    ) -> Self {
        IndexDocument {
            id: id.into(),
            app,
            type_id,
            metadata: IndexMetadata {
                list_id: list_id.into(),
                owner_group: String::new(),
            },
            fields: Vec::new(),
        }
    }

    /// Builder: set the owning group
    pub fn owner_group(mut self, group: impl Into<String>) -> Self {
        self.metadata.owner_group = group.into();
        self
    }

    /// Builder: add text indexed under `attribute`
    pub fn field(mut self, attribute: AttributeId, text: impl Into<String>) -> Self {
        self.fields.push((attribute, text.into()));
        self
    }
}

/// Writes sealed postings for a user's index
#[derive(Clone)]
pub struct IndexWriter {
    key: SearchKey,
    tokenizer: Arc<dyn Tokenizer>,
}

impl std::fmt::Debug for IndexWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexWriter").finish_non_exhaustive()
    }
}

impl IndexWriter {
    /// Writer using [`SimpleTokenizer`]
    pub fn new(key: SearchKey) -> Self {
        Self::with_tokenizer(key, Arc::new(SimpleTokenizer::default()))
    }

    /// Writer using a custom tokenizer
    ///
    /// Must match the tokenizer the engine searches with.
    pub fn with_tokenizer(key: SearchKey, tokenizer: Arc<dyn Tokenizer>) -> Self {
        IndexWriter { key, tokenizer }
    }

    /// Stage one document into `batch`
    ///
    /// Appends one posting per distinct (token, attribute) pair, in field
    /// order, and puts the metadata row under the encrypted id.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Integrity`] if a posting or metadata row cannot
    /// be sealed or encoded.
    pub fn add(&self, batch: &mut WriteBatch, doc: &IndexDocument) -> Result<()> {
        let mut written: BTreeSet<(String, AttributeId)> = BTreeSet::new();
        for (attribute, text) in &doc.fields {
            for token in tokenize_unique(self.tokenizer.as_ref(), text) {
                if !written.insert((token.clone(), *attribute)) {
                    continue;
                }
                let sealed = self
                    .key
                    .seal_posting(&doc.id, doc.app, doc.type_id, *attribute)
                    .map_err(|e| SearchError::integrity(e.to_string()))?;
                batch.append(
                    Table::SearchIndex,
                    self.key.index_key(&token).0,
                    sealed.to_bytes()?,
                );
            }
        }

        batch.put(
            Table::IndexMetadata,
            self.key.encrypt_id(&doc.id).0,
            doc.metadata.to_bytes()?,
        );
        Ok(())
    }

    /// Index `docs` into `store` as one atomic commit
    ///
    /// Returns the commit version.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Integrity`] if staging fails, or
    /// [`SearchError::Retrieval`] if the store rejects the batch. Nothing is
    /// committed in either case.
    pub fn commit<'a>(
        &self,
        store: &MemoryStore,
        docs: impl IntoIterator<Item = &'a IndexDocument>,
    ) -> Result<u64> {
        let mut batch = WriteBatch::new();
        for doc in docs {
            self.add(&mut batch, doc)?;
        }
        let version = store
            .apply(&batch)
            .map_err(|e| SearchError::retrieval(Table::SearchIndex, e))?;
        tracing::debug!(
            target: "cipherdex::writer",
            version,
            ops = batch.len(),
            "Index batch committed"
        );
        Ok(version)
    }
}
