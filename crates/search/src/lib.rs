//! Query engine for cipherdex
//!
//! This crate provides:
//! - SearchEngine: AND search over an encrypted inverted index
//! - SimpleTokenizer: default query tokenizer
//! - EntityModel: built-in type registry
//! - ResolvedRestriction: type/attribute filter resolved to numeric ids
//! - Intersection on encrypted ids and on logical ids
//! - Grouper: dedup and bucketing of surviving matches
//! - IndexReadiness: wait for the initial index build
//! - SearchConfig: `cipherdex.toml` configuration
//!
//! # Usage
//!
//! ```ignore
//! use cipherdex_search::SearchEngine;
//!
//! let engine = SearchEngine::builder().store(store).crypto(key).build()?;
//! let result = engine.search("invoice march", None).await?;
//! for hit in &result.buckets.mails {
//!     println!("{} in {}", hit.id, hit.list_id);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod engine;
pub mod grouping;
pub mod intersect;
pub mod readiness;
pub mod registry;
pub mod restriction;
pub mod tokenizer;

// Re-export commonly used types
pub use config::{SearchConfig, CONFIG_FILE_NAME, DEFAULT_FETCH_CONCURRENCY};
pub use engine::{SearchEngine, SearchEngineBuilder};
pub use grouping::{Admission, Grouper};
pub use intersect::{prune_by_encrypted_id, surviving_by_logical_id, Candidates, PrunedLists};
pub use readiness::IndexReadiness;
pub use registry::EntityModel;
pub use restriction::{is_included, ResolvedRestriction};
pub use tokenizer::{tokenize_unique, SimpleTokenizer};
