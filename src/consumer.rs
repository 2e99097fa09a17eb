//! Cache consumer for executing invalidation plans.
//!
//! Drains events from the queue, merges them into a plan, and applies
//! the plan to the store. Everything here is synchronous in-memory work;
//! write paths call it inline so a mutation is never followed by a stale
//! read from the same handler.

use std::sync::Arc;
use std::time::Instant;

use metrics::histogram;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::CacheConfig;
use crate::events::EventQueue;
use crate::planner::InvalidationPlan;
use crate::store::Store;
use crate::telemetry::METRIC_CONSUME_MS;

/// Applies pending cache events to the store.
pub struct CacheConsumer {
    config: CacheConfig,
    store: Arc<Store>,
    queue: Arc<EventQueue>,
}

impl CacheConsumer {
    pub fn new(config: CacheConfig, store: Arc<Store>, queue: Arc<EventQueue>) -> Self {
        Self {
            config,
            store,
            queue,
        }
    }

    /// Consume one batch of pending events.
    ///
    /// Returns true if any events were processed. Infallible: in-process
    /// map deletion has no failure path.
    #[instrument(skip(self))]
    pub fn consume(&self) -> bool {
        let started_at = Instant::now();
        let events = self.queue.drain(self.config.consume_batch_limit);
        if events.is_empty() {
            return false;
        }

        let event_count = events.len();
        let event_ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();
        let plan = InvalidationPlan::from_events(events);

        info!(
            event_count,
            event_ids = ?event_ids,
            plan = %plan,
            "Cache invalidation starting"
        );

        if plan.flush_all {
            self.store.flush();
        } else {
            self.store.del_many(&plan.keys);
            for prefix in &plan.prefixes {
                self.store.del_by_prefix(prefix);
            }
        }

        info!(
            event_count,
            purged_keys = plan.keys.len(),
            purged_prefixes = plan.prefixes.len(),
            "Cache invalidation complete"
        );

        histogram!(METRIC_CONSUME_MS).record(started_at.elapsed().as_secs_f64() * 1000.0);

        true
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::events::EventKind;
    use crate::keys;

    fn setup() -> (Arc<Store>, Arc<EventQueue>, CacheConsumer) {
        let config = CacheConfig::default();
        let store = Arc::new(Store::new(&config));
        let queue = Arc::new(EventQueue::new(config.event_queue_limit));
        let consumer = CacheConsumer::new(config, store.clone(), queue.clone());
        (store, queue, consumer)
    }

    #[test]
    fn consume_with_empty_queue_is_a_no_op() {
        let (_, _, consumer) = setup();
        assert!(!consumer.consume());
    }

    #[test]
    fn post_event_purges_entity_and_aggregate_entries() {
        let (store, queue, consumer) = setup();

        store.set(keys::post_by_cid(5), json!({"title": "x"}));
        store.set(keys::post_by_slug("foo"), json!({"title": "x"}));
        store.set(keys::post_list(1, 10, None), json!([5]));
        store.set(keys::hot_list(10), json!([5]));
        store.set(keys::post_by_cid(99), json!({"title": "other"}));

        queue.publish(EventKind::PostSaved {
            cid: 5,
            slug: "foo".to_string(),
        });
        assert!(consumer.consume());

        assert!(store.get(&keys::post_by_cid(5)).is_none());
        assert!(store.get(&keys::post_by_slug("foo")).is_none());
        assert!(store.get(&keys::post_list(1, 10, None)).is_none());
        assert!(store.get(&keys::hot_list(10)).is_none());
        // Unrelated posts stay cached.
        assert!(store.get(&keys::post_by_cid(99)).is_some());
    }

    #[test]
    fn flush_all_event_empties_the_store() {
        let (store, queue, consumer) = setup();

        store.set(keys::links(), json!([]));
        store.set(keys::tags(), json!([]));

        queue.publish(EventKind::FlushAll);
        assert!(consumer.consume());

        assert!(store.is_empty());
    }

    #[test]
    fn consume_respects_batch_limit() {
        let config = CacheConfig {
            consume_batch_limit: 1,
            ..Default::default()
        };
        let store = Arc::new(Store::new(&config));
        let queue = Arc::new(EventQueue::new(config.event_queue_limit));
        let consumer = CacheConsumer::new(config, store, queue.clone());

        queue.publish(EventKind::LinksChanged);
        queue.publish(EventKind::TagsChanged);

        assert!(consumer.consume());
        assert_eq!(queue.len(), 1);
        assert!(consumer.consume());
        assert!(queue.is_empty());
    }
}
