//! Basic tokenizer for search queries
//!
//! This module provides simple text tokenization for search operations.
//! The index build pipeline must tokenize with the same rules, otherwise
//! query tokens and indexed tokens derive different index keys.

use cipherdex_core::Tokenizer;
use std::collections::HashSet;

/// Lowercasing, punctuation-splitting tokenizer
///
/// - Lowercase
/// - Split on non-alphanumeric characters
/// - Drop tokens shorter than `min_len` characters
///
/// # Example
///
/// ```
/// use cipherdex_core::Tokenizer;
/// use cipherdex_search::tokenizer::SimpleTokenizer;
///
/// let tokens = SimpleTokenizer::default().tokenize("Invoice, March!");
/// assert_eq!(tokens, vec!["invoice", "march"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleTokenizer {
    min_len: usize,
}

impl Default for SimpleTokenizer {
    fn default() -> Self {
        SimpleTokenizer { min_len: 1 }
    }
}

impl SimpleTokenizer {
    /// Tokenizer dropping tokens shorter than `min_len` characters
    pub fn with_min_len(min_len: usize) -> Self {
        SimpleTokenizer { min_len }
    }
}

impl Tokenizer for SimpleTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty() && s.chars().count() >= self.min_len)
            .map(String::from)
            .collect()
    }
}

/// Tokenize and deduplicate for query processing
///
/// Keeps the first occurrence of each token. AND over a repeated token is
/// the same as AND over it once, so later copies only cost a fetch.
///
/// # Example
///
/// ```
/// use cipherdex_search::tokenizer::{tokenize_unique, SimpleTokenizer};
///
/// let tokens = tokenize_unique(&SimpleTokenizer::default(), "test test TEST");
/// assert_eq!(tokens, vec!["test"]);
/// ```
pub fn tokenize_unique(tokenizer: &dyn Tokenizer, text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenizer
        .tokenize(text)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
