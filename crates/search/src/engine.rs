//! Search engine
//!
//! [`SearchEngine`] turns query text into grouped, hydrated matches over one
//! user's encrypted index.
//!
//! # Pipeline
//!
//! ```text
//! query ──tokenize──▶ tokens
//!                       │  (concurrent, one read txn per token)
//!                       ▼
//!          per-token encrypted posting lists
//!                       │  intersect on encrypted id
//!                       ▼
//!          surviving encrypted postings ──decrypt──▶ postings
//!                                                      │  restriction filter
//!                                                      ▼
//!                                   intersect on logical id
//!                                                      │  dedup + hydrate
//!                                                      ▼
//!                                               mails / contacts
//! ```
//!
//! Only postings that survive the encrypted-id intersection are decrypted.
//!
//! # Stateless
//!
//! The engine holds only shared handles to its collaborators. Every search
//! allocates its own working state, so concurrent searches are independent.
//! Any store transaction a search opens is owned by the search future and
//! released when that future completes, fails or is dropped.

use std::sync::Arc;
use std::time::Instant;

use cipherdex_core::{
    Buckets, EncId, EncryptedPosting, IndexCrypto, IndexKey, IndexMetadata, Posting, Restriction,
    Result, SearchError, SearchResult, SearchStats, Store, Table, Tokenizer, TypeRegistry,
};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::grouping::{Admission, Grouper};
use crate::intersect::{prune_by_encrypted_id, surviving_by_logical_id};
use crate::readiness::IndexReadiness;
use crate::registry::EntityModel;
use crate::restriction::{is_included, ResolvedRestriction};
use crate::tokenizer::{tokenize_unique, SimpleTokenizer};

const TARGET: &str = "cipherdex::search";

// ============================================================================
// SearchEngine
// ============================================================================

/// Query engine over an encrypted inverted index
///
/// Build one with [`SearchEngine::builder`].
#[derive(Clone)]
pub struct SearchEngine {
    store: Arc<dyn Store>,
    crypto: Arc<dyn IndexCrypto>,
    tokenizer: Arc<dyn Tokenizer>,
    registry: Arc<dyn TypeRegistry>,
    readiness: IndexReadiness,
    config: SearchConfig,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("ready", &self.readiness.is_ready())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SearchEngine {
    /// Start building an engine
    pub fn builder() -> SearchEngineBuilder {
        SearchEngineBuilder::default()
    }

    /// Active configuration
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Readiness handle the engine waits on
    pub fn readiness(&self) -> &IndexReadiness {
        &self.readiness
    }

    /// Search for entities matching every token of `query`
    ///
    /// # Flow
    ///
    /// 1. Resolve the restriction, if any
    /// 2. Tokenize; no tokens means an empty result without touching the store
    /// 3. Wait for the initial index build
    /// 4. Fetch, intersect, decrypt, filter, re-intersect
    /// 5. Deduplicate, hydrate and group in walk order
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidRestriction`] if the restriction cannot be resolved
    /// - [`SearchError::NotReady`] if a readiness timeout is configured and elapses
    /// - [`SearchError::Retrieval`] if the store fails a read
    /// - [`SearchError::Integrity`] if a posting or metadata row cannot be
    ///   decrypted or decoded, or a surviving entity has no metadata row
    ///
    /// No partial result is returned alongside an error.
    pub async fn search(
        &self,
        query: &str,
        restriction: Option<Restriction>,
    ) -> Result<SearchResult> {
        let start = Instant::now();

        match self.run(query, restriction.as_ref()).await {
            Ok((buckets, mut stats)) => {
                stats.elapsed_micros =
                    u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
                info!(
                    target: TARGET,
                    tokens = stats.tokens,
                    mails = buckets.mails.len(),
                    contacts = buckets.contacts.len(),
                    elapsed_us = stats.elapsed_micros,
                    "Search completed"
                );
                Ok(SearchResult {
                    query: query.to_string(),
                    restriction,
                    buckets,
                    stats,
                })
            }
            Err(e) => {
                warn!(target: TARGET, kind = ?e.kind(), error = %e, "Search failed");
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        query: &str,
        restriction: Option<&Restriction>,
    ) -> Result<(Buckets, SearchStats)> {
        let resolved = restriction
            .map(|r| ResolvedRestriction::resolve(r, self.registry.as_ref()))
            .transpose()?;

        let tokens = tokenize_unique(self.tokenizer.as_ref(), query);
        let mut stats = SearchStats {
            tokens: tokens.len(),
            ..SearchStats::default()
        };
        if tokens.is_empty() {
            debug!(target: TARGET, "Query has no tokens");
            return Ok((Buckets::new(), stats));
        }

        self.wait_until_ready().await?;

        // Fetch
        let keys: Vec<IndexKey> = tokens.iter().map(|t| self.crypto.index_key(t)).collect();
        let fetched: Vec<Vec<EncryptedPosting>> = stream::iter(keys)
            .map(|key| self.fetch_postings(key))
            .buffered(self.config.effective_concurrency())
            .try_collect()
            .await?;
        stats.postings_fetched = fetched.iter().map(Vec::len).sum();

        // Intersect on encrypted id
        let pruned = prune_by_encrypted_id(fetched);
        stats.encrypted_candidates = pruned.candidates;
        debug!(
            target: TARGET,
            tokens = stats.tokens,
            fetched = stats.postings_fetched,
            candidates = stats.encrypted_candidates,
            "Encrypted intersection done"
        );

        // Decrypt survivors, then filter
        let mut restricted = Vec::with_capacity(pruned.lists.len());
        for list in &pruned.lists {
            let mut kept = Vec::with_capacity(list.len());
            for encrypted in list {
                let posting = self.decrypt(encrypted)?;
                stats.decrypted += 1;
                if is_included(resolved.as_ref(), &posting) {
                    kept.push(posting);
                }
            }
            stats.restricted += kept.len();
            restricted.push(kept);
        }

        // Intersect on logical id
        let walk = surviving_by_logical_id(restricted);
        debug!(
            target: TARGET,
            decrypted = stats.decrypted,
            restricted = stats.restricted,
            surviving = walk.len(),
            "Logical intersection done"
        );

        let (buckets, dropped) = self.group(&walk).await?;
        stats.hits = buckets.total();
        stats.dropped_unrecognized = dropped;
        Ok((buckets, stats))
    }

    async fn wait_until_ready(&self) -> Result<()> {
        match self.config.ready_timeout() {
            None => {
                self.readiness.wait().await;
                Ok(())
            }
            Some(limit) => tokio::time::timeout(limit, self.readiness.wait())
                .await
                .map_err(|_| SearchError::NotReady {
                    waited_ms: self.config.ready_timeout_ms.unwrap_or_default(),
                }),
        }
    }

    async fn fetch_postings(&self, key: IndexKey) -> Result<Vec<EncryptedPosting>> {
        let txn = self
            .store
            .begin_read(&[Table::SearchIndex])
            .await
            .map_err(|e| SearchError::retrieval(Table::SearchIndex, e))?;
        let raw = txn
            .get_list(Table::SearchIndex, key.as_bytes())
            .await
            .map_err(|e| SearchError::retrieval(Table::SearchIndex, e))?;
        raw.iter()
            .map(|bytes| EncryptedPosting::from_bytes(bytes))
            .collect()
    }

    fn decrypt(&self, encrypted: &EncryptedPosting) -> Result<Posting> {
        let posting = self
            .crypto
            .decrypt_posting(encrypted)
            .map_err(|e| SearchError::integrity(format!("posting {:?}: {}", encrypted.enc_id, e)))?;
        if posting.enc_id != encrypted.enc_id {
            return Err(SearchError::integrity(format!(
                "posting stored under {:?} decrypted to {:?}",
                encrypted.enc_id, posting.enc_id
            )));
        }
        Ok(posting)
    }

    async fn group(&self, walk: &[Posting]) -> Result<(Buckets, usize)> {
        let mut grouper = Grouper::new();
        for posting in walk {
            match grouper.admit(posting) {
                Admission::Accepted(kind) => {
                    let metadata = self.hydrate(&posting.enc_id).await?;
                    grouper.place(kind, &metadata, &posting.id);
                }
                Admission::Unrecognized => {
                    debug!(
                        target: TARGET,
                        app = posting.app.0,
                        type_id = posting.type_id.0,
                        "Dropping match of unrecognized kind"
                    );
                }
                Admission::Duplicate => {}
            }
        }
        Ok(grouper.finish())
    }

    async fn hydrate(&self, enc_id: &EncId) -> Result<IndexMetadata> {
        let txn = self
            .store
            .begin_read(&[Table::IndexMetadata])
            .await
            .map_err(|e| SearchError::retrieval(Table::IndexMetadata, e))?;
        let bytes = txn
            .get(Table::IndexMetadata, enc_id.as_bytes())
            .await
            .map_err(|e| SearchError::retrieval(Table::IndexMetadata, e))?
            .ok_or_else(|| SearchError::integrity(format!("no metadata for {:?}", enc_id)))?;
        IndexMetadata::from_bytes(&bytes)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`SearchEngine`]
///
/// Store and crypto are required. Everything else defaults:
/// [`SimpleTokenizer`], [`EntityModel::builtin`], an already-ready
/// [`IndexReadiness`] and [`SearchConfig::default`].
#[derive(Default)]
pub struct SearchEngineBuilder {
    store: Option<Arc<dyn Store>>,
    crypto: Option<Arc<dyn IndexCrypto>>,
    tokenizer: Option<Arc<dyn Tokenizer>>,
    registry: Option<Arc<dyn TypeRegistry>>,
    readiness: Option<IndexReadiness>,
    config: Option<SearchConfig>,
}

impl SearchEngineBuilder {
    /// Set the store
    pub fn store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the index crypto
    pub fn crypto(mut self, crypto: Arc<dyn IndexCrypto>) -> Self {
        self.crypto = Some(crypto);
        self
    }

    /// Set the tokenizer
    pub fn tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// Set the type registry
    pub fn registry(mut self, registry: Arc<dyn TypeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the readiness handle
    pub fn readiness(mut self, readiness: IndexReadiness) -> Self {
        self.readiness = Some(readiness);
        self
    }

    /// Set the configuration
    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the engine
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the store or crypto is missing.
    pub fn build(self) -> Result<SearchEngine> {
        let store = self
            .store
            .ok_or_else(|| SearchError::Config("search engine requires a store".to_string()))?;
        let crypto = self
            .crypto
            .ok_or_else(|| SearchError::Config("search engine requires index crypto".to_string()))?;

        Ok(SearchEngine {
            store,
            crypto,
            tokenizer: self
                .tokenizer
                .unwrap_or_else(|| Arc::new(SimpleTokenizer::default())),
            registry: self
                .registry
                .unwrap_or_else(|| Arc::new(EntityModel::builtin())),
            readiness: self.readiness.unwrap_or_else(IndexReadiness::ready),
            config: self.config.unwrap_or_default(),
        })
    }
}
