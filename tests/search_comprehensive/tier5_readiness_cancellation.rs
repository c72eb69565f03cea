//! Tier 5: Readiness & Cancellation
//!
//! Validates waiting for the initial index build and that abandoned or
//! concurrent searches release every store transaction.

use crate::common::*;
use std::time::Duration;

/// A search waits until the index is marked ready
#[tokio::test]
async fn test_tier5_waits_for_initial_build() {
    let index = TestIndex::pending();
    index.add(&[mail("m1", "invoice")]);
    let engine = index.engine();

    let pending = tokio::spawn(async move { engine.search("invoice", None).await });
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(!pending.is_finished());
    assert_eq!(index.store.open_transactions(), 0);

    index.readiness.mark_ready();
    let result = tokio::time::timeout(Duration::from_secs(5), pending)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(mail_ids(&result), vec!["m1"]);
}

/// With a timeout configured, an unready index fails with NotReady
#[tokio::test]
async fn test_tier5_not_ready_timeout() {
    let index = TestIndex::pending();
    index.add(&[mail("m1", "invoice")]);
    let engine = index.engine_with_config(SearchConfig {
        ready_timeout_ms: Some(25),
        ..SearchConfig::default()
    });

    let err = engine.search("invoice", None).await.unwrap_err();
    assert_eq!(err.kind(), SearchErrorKind::NotReady);
    assert!(err.to_string().contains("25ms"));

    index.readiness.mark_ready();
    assert!(!engine.search("invoice", None).await.unwrap().is_empty());
}

/// Empty queries do not wait for readiness
#[tokio::test]
async fn test_tier5_empty_query_does_not_wait() {
    let index = TestIndex::pending();
    let result = tokio::time::timeout(Duration::from_secs(5), index.engine().search("", None))
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_empty());
}

/// Dropping a search mid-fetch releases its transactions
#[tokio::test]
async fn test_tier5_cancellation_releases_scopes() {
    let index = TestIndex::new();
    index.add(&[mail("m1", "alpha beta gamma")]);
    let engine = index.engine();

    index.store.set_read_delay(Duration::from_millis(500));
    let abandoned =
        tokio::time::timeout(Duration::from_millis(30), engine.search("alpha beta gamma", None))
            .await;
    assert!(abandoned.is_err());
    assert_eq!(index.store.open_transactions(), 0);

    index.store.set_read_delay(Duration::ZERO);
    let result = engine.search("alpha beta gamma", None).await.unwrap();
    assert_eq!(mail_ids(&result), vec!["m1"]);
    assert_eq!(index.store.open_transactions(), 0);
}

/// Aborting a spawned search releases its transactions
#[tokio::test]
async fn test_tier5_abort_releases_scopes() {
    let index = TestIndex::new();
    index.add(&[mail("m1", "alpha beta")]);
    let engine = index.engine();
    index.store.set_read_delay(Duration::from_millis(500));

    let handle = tokio::spawn(async move { engine.search("alpha beta", None).await });
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(index.store.open_transactions() > 0);

    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());
    assert_eq!(index.store.open_transactions(), 0);
}

/// A commit racing a search never surfaces a partial list as an error
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tier5_search_during_commit() {
    let index = TestIndex::new();
    index.add(&[mail("m1", "release notes")]);
    let engine = index.engine();
    index.store.set_read_delay(Duration::from_millis(20));

    let search = tokio::spawn({
        let engine = engine.clone();
        async move { engine.search("release notes", None).await }
    });
    index.add(&[mail("m2", "release notes draft")]);

    let result = search.await.unwrap().unwrap();
    let ids = mail_ids(&result);
    assert_eq!(ids[0], "m1");
    assert!(ids.len() <= 2);

    index.store.set_read_delay(Duration::ZERO);
    let after = engine.search("release notes", None).await.unwrap();
    assert_eq!(mail_ids(&after), vec!["m1", "m2"]);
}
