//! Core search types
//!
//! This module defines the request and response types of the query engine:
//! - Restriction: optional type/attribute filter supplied by the caller
//! - SearchHit: one hydrated match
//! - Buckets: matches grouped by entity kind
//! - SearchStats: execution statistics for debugging/monitoring
//! - SearchResult: everything a search returns

use crate::entity::{AttributeId, EntityKind, TypeRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// Restriction
// ============================================================================

/// Caller-supplied filter narrowing results to one type
///
/// An empty attribute set places no constraint on the matched attribute.
///
/// # Examples
///
/// ```
/// use cipherdex_core::entity::{contact_attributes, TypeRef};
/// use cipherdex_core::search_types::Restriction;
///
/// let r = Restriction::new(TypeRef::CONTACT).with_attributes([contact_attributes::LAST_NAME]);
/// assert!(r.attributes.contains(&contact_attributes::LAST_NAME));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    /// Type every result must have
    pub type_ref: TypeRef,
    /// Attributes a posting must have matched in (any of)
    pub attributes: BTreeSet<AttributeId>,
}

impl Restriction {
    /// Restrict to a type, any attribute
    pub fn new(type_ref: TypeRef) -> Self {
        Restriction {
            type_ref,
            attributes: BTreeSet::new(),
        }
    }

    /// Builder: restrict to a set of attributes
    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = AttributeId>) -> Self {
        self.attributes.extend(attributes);
        self
    }
}

// ============================================================================
// SearchHit
// ============================================================================

/// A hydrated match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// List containing the entity, from the metadata row
    pub list_id: String,
    /// Logical entity id
    pub id: String,
}

impl SearchHit {
    /// Create a hit
    pub fn new(list_id: impl Into<String>, id: impl Into<String>) -> Self {
        SearchHit {
            list_id: list_id.into(),
            id: id.into(),
        }
    }
}

// ============================================================================
// Buckets
// ============================================================================

/// Matches grouped by entity kind, in first-encounter order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buckets {
    /// Mail matches
    pub mails: Vec<SearchHit>,
    /// Contact matches
    pub contacts: Vec<SearchHit>,
}

impl Buckets {
    /// Create empty buckets
    pub fn new() -> Self {
        Self::default()
    }

    /// Hits of one kind
    pub fn get(&self, kind: EntityKind) -> &[SearchHit] {
        match kind {
            EntityKind::Mail => &self.mails,
            EntityKind::Contact => &self.contacts,
        }
    }

    /// Append a hit to a kind's bucket
    pub fn push(&mut self, kind: EntityKind, hit: SearchHit) {
        match kind {
            EntityKind::Mail => self.mails.push(hit),
            EntityKind::Contact => self.contacts.push(hit),
        }
    }

    /// Iterate `(kind, hits)` in bucket order
    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, &[SearchHit])> {
        EntityKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    /// Total hits across buckets
    pub fn total(&self) -> usize {
        self.mails.len() + self.contacts.len()
    }

    /// True if every bucket is empty
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Ids of one kind, in order
    pub fn ids(&self, kind: EntityKind) -> Vec<&str> {
        self.get(kind).iter().map(|hit| hit.id.as_str()).collect()
    }
}

// ============================================================================
// SearchStats
// ============================================================================

/// Execution statistics
///
/// Tracks how many candidates survived each pipeline stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Distinct tokens queried
    pub tokens: usize,
    /// Encrypted postings fetched across all tokens
    pub postings_fetched: usize,
    /// Encrypted ids present for every token
    pub encrypted_candidates: usize,
    /// Postings decrypted
    pub decrypted: usize,
    /// Postings passing the restriction
    pub restricted: usize,
    /// Distinct entities grouped into buckets
    pub hits: usize,
    /// Distinct entities dropped for having no bucket
    pub dropped_unrecognized: usize,
    /// Wall time in microseconds
    #[serde(skip)]
    pub elapsed_micros: u64,
}

// ============================================================================
// SearchResult
// ============================================================================

/// Result of a search call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Query text as supplied
    pub query: String,
    /// Restriction as supplied
    pub restriction: Option<Restriction>,
    /// Grouped matches
    pub buckets: Buckets,
    /// Execution statistics
    pub stats: SearchStats,
}

impl SearchResult {
    /// A result with every bucket empty
    pub fn empty(query: impl Into<String>, restriction: Option<Restriction>) -> Self {
        SearchResult {
            query: query.into(),
            restriction,
            buckets: Buckets::new(),
            stats: SearchStats::default(),
        }
    }

    /// True if no bucket holds a hit
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
