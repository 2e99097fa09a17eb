//! TTL key/value storage.
//!
//! A single process-wide map of namespace-prefixed string keys to
//! JSON-shaped query results. Entries expire lazily on read and are
//! additionally evicted by the background sweep (see `sweep.rs`).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use metrics::counter;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::lock::{rw_read, rw_write};
use crate::telemetry::{
    METRIC_EXPIRED_TOTAL, METRIC_HIT_TOTAL, METRIC_MISS_TOTAL, METRIC_PURGED_TOTAL,
    METRIC_SWEPT_TOTAL,
};

const SOURCE: &str = "cache::store";

struct Entry {
    value: Value,
    expires_at: OffsetDateTime,
}

/// In-memory TTL store.
///
/// All operations are total: absent and expired keys read as `None`,
/// deletes of absent keys are no-ops, and `set` overwrites silently
/// (last write wins).
pub struct Store {
    entries: RwLock<HashMap<String, Entry>>,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl Store {
    /// Create a store that reads wall-clock time.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a store with an explicit time source.
    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl: config.default_ttl(),
            clock,
        }
    }

    /// Insert or overwrite an entry with the configured default TTL.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Insert or overwrite an entry with an explicit TTL.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: Value, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        rw_write(&self.entries, SOURCE, "set").insert(key.into(), Entry { value, expires_at });
    }

    /// Look up a live entry.
    ///
    /// An expired entry found here is dropped on the spot and reads as
    /// absent.
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        let mut entries = rw_write(&self.entries, SOURCE, "get");

        let expired = match entries.get(key) {
            Some(entry) if entry.expires_at > now => {
                counter!(METRIC_HIT_TOTAL).increment(1);
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.remove(key);
            counter!(METRIC_EXPIRED_TOTAL).increment(1);
        }
        counter!(METRIC_MISS_TOTAL).increment(1);
        None
    }

    /// Remove an entry; no-op when absent.
    pub fn del(&self, key: &str) {
        if rw_write(&self.entries, SOURCE, "del").remove(key).is_some() {
            counter!(METRIC_PURGED_TOTAL).increment(1);
        }
    }

    /// Remove a batch of entries; absent keys are skipped.
    pub fn del_many<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = rw_write(&self.entries, SOURCE, "del_many");
        let mut removed: u64 = 0;
        for key in keys {
            if entries.remove(key.as_ref()).is_some() {
                removed += 1;
            }
        }
        if removed > 0 {
            counter!(METRIC_PURGED_TOTAL).increment(removed);
        }
    }

    /// Remove every entry whose key starts with `prefix`.
    ///
    /// Returns the number of entries removed.
    pub fn del_by_prefix(&self, prefix: &str) -> usize {
        let mut entries = rw_write(&self.entries, SOURCE, "del_by_prefix");
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();
        if removed > 0 {
            counter!(METRIC_PURGED_TOTAL).increment(removed as u64);
            debug!(prefix, removed, "Cache prefix purged");
        }
        removed
    }

    /// Remove all entries. Administrative resets only; write paths purge
    /// through the invalidation pipeline instead.
    pub fn flush(&self) {
        let mut entries = rw_write(&self.entries, SOURCE, "flush");
        let removed = entries.len();
        entries.clear();
        if removed > 0 {
            counter!(METRIC_PURGED_TOTAL).increment(removed as u64);
        }
        debug!(removed, "Cache flushed");
    }

    /// All live (unexpired) key strings.
    pub fn keys(&self) -> Vec<String> {
        let now = self.clock.now();
        rw_read(&self.entries, SOURCE, "keys")
            .iter()
            .filter(|(_, entry)| entry.expires_at > now)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        rw_read(&self.entries, SOURCE, "len")
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    /// Check whether the store holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evict every expired entry, returning the eviction count.
    ///
    /// Lazy expiry on `get` already guarantees correctness; this bounds
    /// memory growth from entries that are never re-read.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = rw_write(&self.entries, SOURCE, "sweep_expired");
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        let evicted = before - entries.len();
        if evicted > 0 {
            counter!(METRIC_SWEPT_TOTAL).increment(evicted as u64);
        }
        evicted
    }
}
