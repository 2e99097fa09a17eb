//! Background expired-entry sweep.
//!
//! Lazy expiry on `get` already guarantees that no expired value is ever
//! served; the sweep only bounds memory growth from entries that are
//! never re-read. The embedding application aborts the returned handle
//! on shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::store::Store;

/// Spawn a task that evicts expired entries every `interval`.
pub fn spawn_sweeper(store: Arc<Store>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await; // Skip the first immediate tick
        loop {
            ticker.tick().await;
            let evicted = store.sweep_expired();
            if evicted > 0 {
                debug!(evicted, "Expired cache entries swept");
            }
        }
    })
}
