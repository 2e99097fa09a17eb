//! Cache trigger service.
//!
//! The write-path facade: one convenience method per mutation. Each
//! publishes an event and consumes it immediately, so invalidation is
//! synchronous with the mutation that caused it.

use std::sync::Arc;

use tracing::debug;

use crate::config::CacheConfig;
use crate::consumer::CacheConsumer;
use crate::events::{EventKind, EventQueue};

/// Publishes cache events from write operations.
///
/// # Usage
///
/// ```ignore
/// // After a successful post update:
/// trigger.post_saved(post.cid, &post.slug);
/// ```
pub struct CacheTrigger {
    config: CacheConfig,
    queue: Arc<EventQueue>,
    consumer: Arc<CacheConsumer>,
}

impl CacheTrigger {
    pub fn new(config: CacheConfig, queue: Arc<EventQueue>, consumer: Arc<CacheConsumer>) -> Self {
        Self {
            config,
            queue,
            consumer,
        }
    }

    /// Publish an event and optionally consume immediately.
    ///
    /// The convenience methods below always consume immediately; deferred
    /// consumption is available for callers batching several mutations.
    pub fn trigger(&self, kind: EventKind, consume_now: bool) {
        if !self.config.enabled {
            debug!(event_kind = ?kind, "Cache trigger skipped: cache disabled");
            return;
        }

        self.queue.publish(kind);

        if consume_now {
            self.consumer.consume();
        }
    }

    /// A post was created or edited.
    pub fn post_saved(&self, cid: u32, slug: &str) {
        self.trigger(
            EventKind::PostSaved {
                cid,
                slug: slug.to_string(),
            },
            true,
        );
    }

    /// A post was deleted.
    pub fn post_deleted(&self, cid: u32, slug: &str) {
        self.trigger(
            EventKind::PostDeleted {
                cid,
                slug: slug.to_string(),
            },
            true,
        );
    }

    /// A post went from draft to published.
    pub fn post_published(&self, cid: u32, slug: &str) {
        self.trigger(
            EventKind::PostPublished {
                cid,
                slug: slug.to_string(),
            },
            true,
        );
    }

    /// A comment was created under the given post.
    pub fn comment_created(&self, post_cid: u32, post_slug: &str) {
        self.trigger(
            EventKind::CommentCreated {
                post_cid,
                post_slug: post_slug.to_string(),
            },
            true,
        );
    }

    /// A comment was edited or moderated.
    pub fn comment_updated(&self, post_cid: u32, post_slug: &str) {
        self.trigger(
            EventKind::CommentUpdated {
                post_cid,
                post_slug: post_slug.to_string(),
            },
            true,
        );
    }

    /// The blogroll changed.
    pub fn links_changed(&self) {
        self.trigger(EventKind::LinksChanged, true);
    }

    /// Tags were created, renamed, or removed.
    pub fn tags_changed(&self) {
        self.trigger(EventKind::TagsChanged, true);
    }

    /// Categories were created, renamed, or removed.
    pub fn categories_changed(&self) {
        self.trigger(EventKind::CategoriesChanged, true);
    }

    /// Administrative full reset.
    pub fn flush_all(&self) {
        self.trigger(EventKind::FlushAll, true);
    }

    /// Get the underlying config.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get the underlying event queue.
    pub fn queue(&self) -> &Arc<EventQueue> {
        &self.queue
    }

    /// Get the underlying consumer.
    pub fn consumer(&self) -> &Arc<CacheConsumer> {
        &self.consumer
    }
}
