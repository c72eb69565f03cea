//! Result grouping
//!
//! Surviving postings are walked in order and placed into per-kind buckets.
//! The walk is split in two so the engine can hydrate in between:
//! [`Grouper::admit`] decides whether a posting is new and has a bucket,
//! and [`Grouper::place`] appends the hydrated hit.

use cipherdex_core::{Buckets, EntityKind, IndexMetadata, Posting, SearchHit};
use std::collections::HashSet;

/// Outcome of offering a posting to the grouper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First occurrence of an entity with a bucket; hydrate and place it
    Accepted(EntityKind),
    /// Entity already seen in this search
    Duplicate,
    /// Entity type has no bucket; dropped
    Unrecognized,
}

/// Accumulates hits for one search
#[derive(Debug, Default)]
pub struct Grouper {
    seen: HashSet<String>,
    buckets: Buckets,
    dropped: usize,
}

impl Grouper {
    /// Create an empty grouper
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer the next posting in walk order
    ///
    /// An entity counts as seen on first offer, whether or not it gets a
    /// bucket, so later postings for it are duplicates.
    pub fn admit(&mut self, posting: &Posting) -> Admission {
        if !self.seen.insert(posting.id.clone()) {
            return Admission::Duplicate;
        }
        match EntityKind::from_ids(posting.app, posting.type_id) {
            Some(kind) => Admission::Accepted(kind),
            None => {
                self.dropped += 1;
                Admission::Unrecognized
            }
        }
    }

    /// Append a hydrated hit to its bucket
    pub fn place(&mut self, kind: EntityKind, metadata: &IndexMetadata, id: &str) {
        self.buckets
            .push(kind, SearchHit::new(metadata.list_id.clone(), id));
    }

    /// Distinct entities dropped for having no bucket
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Consume the grouper, returning buckets and the dropped count
    pub fn finish(self) -> (Buckets, usize) {
        (self.buckets, self.dropped)
    }
}
