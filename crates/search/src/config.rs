//! Engine configuration via `cipherdex.toml`
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration. Edit the file and rebuild the engine to change
//! settings.

use cipherdex_core::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Config file name placed next to the index.
pub const CONFIG_FILE_NAME: &str = "cipherdex.toml";

/// Default number of per-token fetches in flight.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 8;

/// Search engine configuration loaded from `cipherdex.toml`.
///
/// # Example
///
/// ```toml
/// # Max per-token posting fetches in flight (0 is treated as 1)
/// fetch_concurrency = 8
///
/// # Fail with "not ready" after waiting this long for the initial build
/// # ready_timeout_ms = 30000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Max per-token posting fetches in flight.
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
    /// Give up waiting for the index after this many milliseconds.
    /// Absent means wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_timeout_ms: Option<u64>,
}

fn default_fetch_concurrency() -> usize {
    DEFAULT_FETCH_CONCURRENCY
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fetch_concurrency: default_fetch_concurrency(),
            ready_timeout_ms: None,
        }
    }
}

impl SearchConfig {
    /// Fetch concurrency actually used; never zero.
    pub fn effective_concurrency(&self) -> usize {
        self.fetch_concurrency.max(1)
    }

    /// Readiness timeout as a duration, if configured.
    pub fn ready_timeout(&self) -> Option<Duration> {
        self.ready_timeout_ms.map(Duration::from_millis)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# cipherdex search configuration
#
# Maximum number of per-token posting fetches in flight (default: 8).
# 0 is treated as 1.
fetch_concurrency = 8

# Wait at most this many milliseconds for the initial index build before a
# search fails with "not ready". Leave unset to wait indefinitely.
# ready_timeout_ms = 30000
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the text is not valid config TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| SearchError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SearchError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            SearchError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                SearchError::Config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SearchError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            SearchError::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
