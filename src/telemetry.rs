//! Metric registration for the cache.
//!
//! Metrics are emitted through the `metrics` facade; the embedding
//! application decides which recorder to install. Descriptions are
//! registered once per process.

use std::sync::Once;

use metrics::{Unit, describe_counter, describe_gauge, describe_histogram};

pub const METRIC_HIT_TOTAL: &str = "foglio_cache_hit_total";
pub const METRIC_MISS_TOTAL: &str = "foglio_cache_miss_total";
pub const METRIC_EXPIRED_TOTAL: &str = "foglio_cache_expired_total";
pub const METRIC_SWEPT_TOTAL: &str = "foglio_cache_swept_total";
pub const METRIC_PURGED_TOTAL: &str = "foglio_cache_purged_total";
pub const METRIC_EVENT_QUEUE_LEN: &str = "foglio_cache_event_queue_len";
pub const METRIC_EVENT_DROPPED_TOTAL: &str = "foglio_cache_event_dropped_total";
pub const METRIC_CONSUME_MS: &str = "foglio_cache_consume_ms";

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Register metric descriptions with the installed recorder.
pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_HIT_TOTAL,
            Unit::Count,
            "Total number of cache hits."
        );
        describe_counter!(
            METRIC_MISS_TOTAL,
            Unit::Count,
            "Total number of cache misses."
        );
        describe_counter!(
            METRIC_EXPIRED_TOTAL,
            Unit::Count,
            "Total number of entries dropped lazily on read after their TTL elapsed."
        );
        describe_counter!(
            METRIC_SWEPT_TOTAL,
            Unit::Count,
            "Total number of expired entries evicted by the background sweep."
        );
        describe_counter!(
            METRIC_PURGED_TOTAL,
            Unit::Count,
            "Total number of entries removed by invalidation purges."
        );
        describe_gauge!(
            METRIC_EVENT_QUEUE_LEN,
            Unit::Count,
            "Current number of pending cache events in the queue."
        );
        describe_counter!(
            METRIC_EVENT_DROPPED_TOTAL,
            Unit::Count,
            "Total number of cache events dropped due to queue overflow."
        );
        describe_histogram!(
            METRIC_CONSUME_MS,
            Unit::Milliseconds,
            "Cache event consumption latency in milliseconds."
        );
    });
}
