//! Posting list intersection
//!
//! Search is conjunctive: an entity matches only if every query token has a
//! posting for it. Intersection runs twice:
//!
//! 1. On encrypted ids, before anything is decrypted. Postings for entities
//!    missing from some token's list are discarded without paying for
//!    decryption.
//! 2. On logical ids, after the restriction filter, since a restriction can
//!    remove an entity's only admissible posting for one token.
//!
//! Both passes keep the per-token list order; ordering of the final result is
//! decided by the caller walking the lists in token order.

use cipherdex_core::{EncId, EncryptedPosting, Posting};
use std::collections::HashSet;
use std::hash::Hash;

// ============================================================================
// Candidates
// ============================================================================

/// Running intersection of per-list key sets
///
/// Starts unconstrained; each narrowing step keeps only keys also present in
/// the next list. Narrowing never grows the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidates<K: Eq + Hash> {
    /// No list seen yet
    Unconstrained,
    /// Keys present in every list seen so far
    Constrained(HashSet<K>),
}

impl<K: Eq + Hash> Default for Candidates<K> {
    fn default() -> Self {
        Candidates::Unconstrained
    }
}

impl<K: Eq + Hash> Candidates<K> {
    /// Intersect with the keys of one more list
    pub fn narrow(self, keys: impl IntoIterator<Item = K>) -> Self {
        let next: HashSet<K> = keys.into_iter().collect();
        match self {
            Candidates::Unconstrained => Candidates::Constrained(next),
            Candidates::Constrained(current) => {
                Candidates::Constrained(current.into_iter().filter(|k| next.contains(k)).collect())
            }
        }
    }

    /// True if no key can survive further narrowing
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Candidates::Constrained(set) if set.is_empty())
    }

    /// Final key set; zero lists intersect to nothing
    pub fn finish(self) -> HashSet<K> {
        match self {
            Candidates::Unconstrained => HashSet::new(),
            Candidates::Constrained(set) => set,
        }
    }
}

// ============================================================================
// Encrypted-id pass
// ============================================================================

/// Per-token lists reduced to entities present for every token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrunedLists {
    /// One list per token, same order as the input
    pub lists: Vec<Vec<EncryptedPosting>>,
    /// Distinct encrypted ids present in every list
    pub candidates: usize,
}

impl PrunedLists {
    /// Total postings left across lists
    pub fn postings(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }
}

/// Drop every posting whose encrypted id is missing from some list
///
/// Postings of surviving ids are all kept, including several for the same
/// entity in one list (one per matched attribute).
pub fn prune_by_encrypted_id(lists: Vec<Vec<EncryptedPosting>>) -> PrunedLists {
    let mut candidates = Candidates::Unconstrained;
    for list in &lists {
        candidates = candidates.narrow(list.iter().map(|p| &p.enc_id));
        if candidates.is_exhausted() {
            break;
        }
    }
    let survivors: HashSet<EncId> = candidates.finish().into_iter().cloned().collect();

    let lists = lists
        .into_iter()
        .map(|list| {
            list.into_iter()
                .filter(|p| survivors.contains(&p.enc_id))
                .collect()
        })
        .collect();

    PrunedLists {
        lists,
        candidates: survivors.len(),
    }
}

// ============================================================================
// Logical-id pass
// ============================================================================

/// Postings whose logical id appears in every list, in token order
///
/// Walks the lists first to last, each in its own order, keeping postings of
/// ids present in all of them. An id may appear more than once; callers
/// deduplicate.
pub fn surviving_by_logical_id(lists: Vec<Vec<Posting>>) -> Vec<Posting> {
    let survivors: HashSet<String> = lists
        .iter()
        .fold(Candidates::Unconstrained, |acc, list| {
            acc.narrow(list.iter().map(|p| p.id.clone()))
        })
        .finish();

    lists
        .into_iter()
        .flatten()
        .filter(|p| survivors.contains(&p.id))
        .collect()
}
