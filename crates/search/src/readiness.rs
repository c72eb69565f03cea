//! Index readiness signal
//!
//! The initial index build runs elsewhere. Searches must not read the index
//! before it finishes, so each search waits on an [`IndexReadiness`] handle
//! that the build pipeline flips once. The flag is sticky.

use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable handle on the "initial build complete" flag
#[derive(Debug, Clone)]
pub struct IndexReadiness {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for IndexReadiness {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexReadiness {
    /// Handle that is not yet ready
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        IndexReadiness { tx: Arc::new(tx) }
    }

    /// Handle that is already ready
    pub fn ready() -> Self {
        let handle = Self::new();
        handle.mark_ready();
        handle
    }

    /// Signal that the initial build completed
    ///
    /// Wakes every waiter. Calling it again is a no-op.
    pub fn mark_ready(&self) {
        self.tx.send_if_modified(|ready| !std::mem::replace(ready, true));
    }

    /// Whether the build has completed
    pub fn is_ready(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the build has completed
    ///
    /// Returns immediately if it already has.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|ready| *ready).await;
    }
}
