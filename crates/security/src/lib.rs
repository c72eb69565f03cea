//! Keyed index crypto for cipherdex
//!
//! This crate provides [`SearchKey`], the [`IndexCrypto`] implementation
//! used for a user's search index. The engine uses it to derive index keys
//! from tokens and to decrypt postings; the index build pipeline uses the
//! same key to derive encrypted entity ids and seal postings.
//!
//! [`IndexCrypto`]: cipherdex_core::IndexCrypto

#![warn(missing_docs)]

pub mod key;

pub use key::{SearchKey, KEY_LEN, NONCE_LEN};
