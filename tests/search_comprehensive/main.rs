//! Search Comprehensive Test Suite
//!
//! End-to-end tests of the query engine over a keyed, encrypted index.
//!
//! ## Test Tier Structure
//!
//! - **Tier 1: Query Semantics** (AND matching, tokens, buckets)
//! - **Tier 2: Restrictions** (type/attribute filtering, invalid restrictions)
//! - **Tier 3: Dedup & Determinism** (first-encounter order, byte-identical results)
//! - **Tier 4: Failure Classification** (retrieval vs integrity errors)
//! - **Tier 5: Readiness & Cancellation** (waiting, timeouts, scope release)
//! - **Tier 6: Configuration** (`cipherdex.toml` driven engines)
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test search_comprehensive
//!
//! # Run specific tier
//! cargo test --test search_comprehensive tier2
//! ```

#[path = "../common/mod.rs"]
mod common;


// Tier 2: Restrictions
mod tier2_restrictions;

// Tier 3: Dedup & Determinism
mod tier3_dedup_determinism;


// Tier 5: Readiness & Cancellation
mod tier5_readiness_cancellation;

// Tier 6: Configuration
mod tier6_config;
