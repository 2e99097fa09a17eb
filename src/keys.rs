//! Cache key registry.
//!
//! Every cached read path owns a [`Namespace`] with a fixed string prefix,
//! and builds its keys through the helpers below. Two logically distinct
//! queries never collide on a key; two identical queries always produce
//! the same key.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Logical cache namespaces.
///
/// Prefix purges operate on whole namespaces, so no prefix may be a
/// string prefix of another (checked by `prefixes_do_not_overlap`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Single posts, cached by cid and by slug.
    Post,
    /// Paginated post listings, including search results.
    PostList,
    /// Most-commented posts ranking.
    HotList,
    /// Archive pages grouped by month.
    Archive,
    /// Sidebar list of latest comments.
    RecentComments,
    /// Blogroll links.
    Links,
    /// Tag list with usage counts.
    Tags,
    /// Category list with usage counts.
    Categories,
}

impl Namespace {
    pub const ALL: [Namespace; 8] = [
        Namespace::Post,
        Namespace::PostList,
        Namespace::HotList,
        Namespace::Archive,
        Namespace::RecentComments,
        Namespace::Links,
        Namespace::Tags,
        Namespace::Categories,
    ];

    /// Fixed key prefix for this namespace.
    pub const fn prefix(self) -> &'static str {
        match self {
            Namespace::Post => "post:",
            Namespace::PostList => "postList:",
            Namespace::HotList => "hotList:",
            Namespace::Archive => "archive:",
            Namespace::RecentComments => "recentComments:",
            Namespace::Links => "links:",
            Namespace::Tags => "tags:",
            Namespace::Categories => "categories:",
        }
    }

    /// Build a key in this namespace from an arbitrary suffix.
    pub fn key(self, suffix: impl fmt::Display) -> String {
        format!("{}{}", self.prefix(), suffix)
    }
}

// ============================================================================
// Key builders
// ============================================================================

/// Key for a single post looked up by its cid.
pub fn post_by_cid(cid: u32) -> String {
    Namespace::Post.key(format_args!("cid:{cid}"))
}

/// Key for a single post looked up by its slug.
pub fn post_by_slug(slug: &str) -> String {
    Namespace::Post.key(format_args!("slug:{slug}"))
}

/// Key for one page of the post listing.
///
/// A free-text search term is collapsed to a hash so arbitrary user input
/// never leaks into key structure.
pub fn post_list(page: u32, page_size: u32, search: Option<&str>) -> String {
    match search {
        Some(term) => Namespace::PostList.key(format_args!(
            "p{page}:n{page_size}:q{:016x}",
            hash_query(term)
        )),
        None => Namespace::PostList.key(format_args!("p{page}:n{page_size}")),
    }
}

/// Key for the most-commented ranking limited to `limit` posts.
pub fn hot_list(limit: u32) -> String {
    Namespace::HotList.key(limit)
}

/// Key for one page of the archive listing.
pub fn archive(page: u32) -> String {
    Namespace::Archive.key(format_args!("p{page}"))
}

/// Key for the latest-comments sidebar limited to `limit` entries.
pub fn recent_comments(limit: u32) -> String {
    Namespace::RecentComments.key(limit)
}

/// Key for the blogroll.
pub fn links() -> String {
    Namespace::Links.key("all")
}

/// Key for the tag list with counts.
pub fn tags() -> String {
    Namespace::Tags.key("all")
}

/// Key for the category list with counts.
pub fn categories() -> String {
    Namespace::Categories.key("all")
}

/// Compute a hash for any hashable value.
pub fn hash_value<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Hash a search/query string for list cache keys.
pub fn hash_query(query: &str) -> u64 {
    hash_value(&query)
}
