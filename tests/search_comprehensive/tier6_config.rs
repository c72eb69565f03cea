//! Tier 6: Configuration
//!
//! Validates engines built from `cipherdex.toml`.

use crate::common::*;
use cipherdex::CONFIG_FILE_NAME;
use tempfile::TempDir;

/// Default config file yields a working engine
#[tokio::test]
async fn test_tier6_engine_from_default_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    SearchConfig::write_default_if_missing(&path).unwrap();

    let config = SearchConfig::from_file(&path).unwrap();
    assert_eq!(config, SearchConfig::default());

    let index = TestIndex::new();
    index.add(&[mail("m1", "status update")]);
    let result = index
        .engine_with_config(config)
        .search("status", None)
        .await
        .unwrap();
    assert_eq!(mail_ids(&result), vec!["m1"]);
}

/// Timeout from the file applies to the engine
#[tokio::test]
async fn test_tier6_timeout_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "fetch_concurrency = 2\nready_timeout_ms = 10\n").unwrap();

    let config = SearchConfig::from_file(&path).unwrap();
    let index = TestIndex::pending();
    let engine = index.engine_with_config(config);
    assert_eq!(engine.config().fetch_concurrency, 2);

    let err = engine.search("status", None).await.unwrap_err();
    assert!(matches!(err, SearchError::NotReady { waited_ms: 10 }));
}

/// Malformed file is a config error
#[test]
fn test_tier6_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "fetch_concurrency = [").unwrap();

    let err = SearchConfig::from_file(&path).unwrap_err();
    assert_eq!(err.kind(), SearchErrorKind::Config);
}
