//! Invalidation planning.
//!
//! Merges a batch of cache events into the set of store purges that make
//! every subsequent read observe the mutations. The policy is coarse on
//! purpose: aggregates that *could* contain a mutated entity are purged
//! by whole namespace. A false-positive purge costs a re-fetch; a stale
//! leftover would serve wrong content.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::events::{CacheEvent, EventKind};
use crate::keys::{self, Namespace};

/// Purge actions derived from a batch of events.
///
/// Pure data: building a plan touches no store state.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InvalidationPlan {
    /// Exact entity keys to delete.
    pub keys: HashSet<String>,
    /// Whole namespaces to purge by prefix.
    pub prefixes: BTreeSet<&'static str>,
    /// Whether to reset the entire store.
    pub flush_all: bool,
}

impl fmt::Display for InvalidationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InvalidationPlan {{ keys: {}, prefixes: {:?}, flush_all: {} }}",
            self.keys.len(),
            self.prefixes,
            self.flush_all,
        )
    }
}

impl InvalidationPlan {
    /// Merge a batch of events into a single plan.
    ///
    /// Events are deduplicated by id, so re-delivery of the same event
    /// never widens the purge set.
    pub fn from_events(events: Vec<CacheEvent>) -> Self {
        let mut plan = Self::default();
        let mut seen_ids = HashSet::new();

        for event in events {
            if !seen_ids.insert(event.id) {
                continue;
            }
            plan.apply(&event.kind);
        }

        plan
    }

    fn apply(&mut self, kind: &EventKind) {
        match kind {
            EventKind::PostSaved { cid, slug }
            | EventKind::PostDeleted { cid, slug }
            | EventKind::PostPublished { cid, slug } => {
                // The post may be cached under either lookup form.
                self.keys.insert(keys::post_by_cid(*cid));
                self.keys.insert(keys::post_by_slug(slug));
                // Any aggregate that lists posts could include this one.
                self.prefixes.insert(Namespace::PostList.prefix());
                self.prefixes.insert(Namespace::HotList.prefix());
                self.prefixes.insert(Namespace::Archive.prefix());
            }
            EventKind::CommentCreated {
                post_cid,
                post_slug,
            }
            | EventKind::CommentUpdated {
                post_cid,
                post_slug,
            } => {
                // Comment threads are cached with their parent post.
                self.keys.insert(keys::post_by_cid(*post_cid));
                self.keys.insert(keys::post_by_slug(post_slug));
                self.prefixes.insert(Namespace::RecentComments.prefix());
                // The hot ranking orders posts by comment count.
                self.prefixes.insert(Namespace::HotList.prefix());
            }
            EventKind::LinksChanged => {
                self.prefixes.insert(Namespace::Links.prefix());
            }
            EventKind::TagsChanged => {
                self.prefixes.insert(Namespace::Tags.prefix());
            }
            EventKind::CategoriesChanged => {
                self.prefixes.insert(Namespace::Categories.prefix());
            }
            EventKind::FlushAll => {
                self.flush_all = true;
            }
        }
    }

    /// Check whether the plan has any purge to execute.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.prefixes.is_empty() && !self.flush_all
    }
}
