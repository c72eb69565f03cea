//! Tier 3: Dedup & Determinism
//!
//! Validates that each entity appears once, at its first-encounter position,
//! and that repeated searches produce identical bytes.

use crate::common::*;

/// An entity matching in several attributes appears once
#[tokio::test]
async fn test_tier3_dedup_across_attributes() {
    let index = TestIndex::new();
    index.add(&[IndexDocument::new(EntityKind::Mail, "m1", "inbox")
        .field(mail_attributes::SUBJECT, "budget")
        .field(mail_attributes::BODY, "budget budget")
        .field(mail_attributes::ATTACHMENTS, "budget.xlsx")]);

    let result = index.engine().search("budget", None).await.unwrap();
    assert_eq!(mail_ids(&result), vec!["m1"]);
    assert_eq!(result.stats.decrypted, 3);
    assert_eq!(result.stats.hits, 1);
}

/// Buckets follow the first token's posting order
#[tokio::test]
async fn test_tier3_first_encounter_order() {
    let index = TestIndex::new();
    index.add(&[mail("m3", "alpha beta"), mail("m1", "alpha")]);
    index.add(&[mail("m2", "beta alpha")]);

    let result = index.engine().search("alpha beta", None).await.unwrap();
    assert_eq!(mail_ids(&result), vec!["m3", "m2"]);

    let reversed = index.engine().search("beta alpha", None).await.unwrap();
    assert_eq!(mail_ids(&reversed), vec!["m3", "m2"]);
}

/// Same query, same store: byte-identical results
#[tokio::test]
async fn test_tier3_deterministic_bytes() {
    let index = TestIndex::new();
    let docs: Vec<IndexDocument> = (0..40)
        .map(|i| {
            if i % 3 == 0 {
                contact(&format!("c{}", i), "sam", &format!("project{}", i % 4))
            } else {
                mail(&format!("m{}", i), &format!("sam project{} status", i % 4))
            }
        })
        .collect();
    index.add(&docs);
    let engine = index.engine();

    let first = engine.search("sam project1", None).await.unwrap();
    assert!(!first.is_empty());
    for _ in 0..10 {
        let again = engine.search("sam project1", None).await.unwrap();
        assert_same_bytes(&first, &again);
    }
}

/// Determinism holds regardless of fetch concurrency
#[tokio::test]
async fn test_tier3_concurrency_does_not_change_result() {
    let index = TestIndex::new();
    let docs: Vec<IndexDocument> = (0..25)
        .map(|i| mail(&format!("m{}", i), &format!("q{} w{} e{}", i % 2, i % 3, i % 5)))
        .collect();
    index.add(&docs);

    let serial = index
        .engine_with_config(SearchConfig {
            fetch_concurrency: 1,
            ..SearchConfig::default()
        })
        .search("q0 w0 e0", None)
        .await
        .unwrap();
    let parallel = index
        .engine_with_config(SearchConfig {
            fetch_concurrency: 16,
            ..SearchConfig::default()
        })
        .search("q0 w0 e0", None)
        .await
        .unwrap();

    assert_eq!(mail_ids(&serial), vec!["m0"]);
    assert_same_bytes(&serial, &parallel);
}

/// Concurrent searches do not interfere
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_tier3_concurrent_searches_independent() {
    let index = TestIndex::new();
    let docs: Vec<IndexDocument> = (0..30)
        .map(|i| mail(&format!("m{}", i), &format!("topic{} shared", i % 6)))
        .collect();
    index.add(&docs);
    let engine = index.engine();

    let mut expected = Vec::new();
    for t in 0..6 {
        let query = format!("topic{} shared", t);
        expected.push(engine.search(&query, None).await.unwrap());
    }

    let handles: Vec<_> = (0..24)
        .map(|i| {
            let engine = engine.clone();
            tokio::spawn(async move {
                let query = format!("topic{} shared", i % 6);
                (i % 6, engine.search(&query, None).await.unwrap())
            })
        })
        .collect();

    for handle in handles {
        let (t, result) = handle.await.unwrap();
        assert_same_bytes(&expected[t], &result);
        assert_eq!(result.buckets.mails.len(), 5);
    }
    assert_eq!(index.store.open_transactions(), 0);
}
