//! Cache event system.
//!
//! Write-side mutations publish events; the consumer turns them into
//! store purges. The queue is in-memory and capacity-bounded: on
//! overflow the oldest event is dropped and counted, trading a possible
//! over-purge later for bounded memory.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use metrics::{counter, gauge};
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::lock::mutex_lock;
use crate::telemetry::{METRIC_EVENT_DROPPED_TOTAL, METRIC_EVENT_QUEUE_LEN};

const SOURCE: &str = "cache::events";

/// Monotonic ordering number assigned per process.
pub type Epoch = u64;

/// A single write-side mutation, as seen by the cache.
#[derive(Debug, Clone)]
pub struct CacheEvent {
    /// Unique identifier for idempotency (UUIDv4).
    pub id: Uuid,
    /// Monotonic epoch for ordering within this process.
    pub epoch: Epoch,
    /// The mutation that occurred.
    pub kind: EventKind,
    /// When the event was published.
    pub timestamp: OffsetDateTime,
}

impl CacheEvent {
    pub fn new(kind: EventKind, epoch: Epoch) -> Self {
        Self {
            id: Uuid::new_v4(),
            epoch,
            kind,
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

/// Mutations that require cache invalidation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A post draft was created or an existing post edited.
    PostSaved { cid: u32, slug: String },
    /// A post was deleted.
    PostDeleted { cid: u32, slug: String },
    /// A post transitioned from draft to published.
    PostPublished { cid: u32, slug: String },
    /// A comment was created under a post.
    CommentCreated { post_cid: u32, post_slug: String },
    /// A comment was edited or its moderation state changed.
    CommentUpdated { post_cid: u32, post_slug: String },
    /// The blogroll changed.
    LinksChanged,
    /// Tags were created, renamed, or removed.
    TagsChanged,
    /// Categories were created, renamed, or removed.
    CategoriesChanged,
    /// Administrative full reset.
    FlushAll,
}

/// In-memory FIFO queue of pending cache events.
///
/// A mutex suffices: publishers are request handlers and contention is
/// expected to be low.
pub struct EventQueue {
    queue: Mutex<VecDeque<CacheEvent>>,
    limit: usize,
    epoch_counter: AtomicU64,
}

impl EventQueue {
    /// Create a queue holding at most `limit` pending events.
    pub fn new(limit: usize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            limit: limit.max(1),
            epoch_counter: AtomicU64::new(0),
        }
    }

    /// Next monotonic epoch number.
    pub fn next_epoch(&self) -> Epoch {
        self.epoch_counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Publish an event to the queue.
    pub fn publish(&self, kind: EventKind) {
        let epoch = self.next_epoch();
        let event = CacheEvent::new(kind.clone(), epoch);

        info!(
            event_id = %event.id,
            event_epoch = event.epoch,
            event_kind = ?kind,
            "Cache event enqueued"
        );

        let mut queue = mutex_lock(&self.queue, SOURCE, "publish");
        if queue.len() >= self.limit {
            let dropped = queue.pop_front();
            counter!(METRIC_EVENT_DROPPED_TOTAL).increment(1);
            warn!(
                dropped_event_id = ?dropped.map(|e| e.id),
                limit = self.limit,
                "Cache event queue full; oldest event dropped"
            );
        }
        queue.push_back(event);
        gauge!(METRIC_EVENT_QUEUE_LEN).set(queue.len() as f64);
    }

    /// Drain up to `limit` events in FIFO order.
    pub fn drain(&self, limit: usize) -> Vec<CacheEvent> {
        let mut queue = mutex_lock(&self.queue, SOURCE, "drain");
        let count = limit.min(queue.len());
        let events: Vec<CacheEvent> = queue.drain(..count).collect();
        gauge!(METRIC_EVENT_QUEUE_LEN).set(queue.len() as f64);
        events
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        mutex_lock(&self.queue, SOURCE, "len").len()
    }

    /// Check whether no events are pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard all pending events.
    pub fn clear(&self) {
        let mut queue = mutex_lock(&self.queue, SOURCE, "clear");
        queue.clear();
        gauge!(METRIC_EVENT_QUEUE_LEN).set(0.0);
    }
}
