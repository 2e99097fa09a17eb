//! End-to-end invalidation scenarios: mutate through the trigger, then
//! assert what the read path would observe.

use std::sync::Arc;
use std::time::Duration;

use foglio_cache::{
    CacheConfig, CacheConsumer, CacheTrigger, EventKind, EventQueue, ManualClock, Namespace,
    Store, keys,
};
use serde_json::json;

fn build_cache(config: CacheConfig) -> (Arc<Store>, CacheTrigger) {
    let store = Arc::new(Store::new(&config));
    let queue = Arc::new(EventQueue::new(config.event_queue_limit));
    let consumer = Arc::new(CacheConsumer::new(
        config.clone(),
        store.clone(),
        queue.clone(),
    ));
    let trigger = CacheTrigger::new(config, queue, consumer);
    (store, trigger)
}

#[test]
fn hot_list_prefix_purge_scenario() {
    let (store, _) = build_cache(CacheConfig::default());

    store.set_with_ttl(
        keys::hot_list(5),
        json!(["a", "b", "c"]),
        Duration::from_secs(600),
    );
    assert_eq!(
        store.get(&keys::hot_list(5)).expect("entry should be live"),
        json!(["a", "b", "c"])
    );

    store.del_by_prefix(Namespace::HotList.prefix());

    assert!(store.get(&keys::hot_list(5)).is_none());
}

#[test]
fn post_save_invalidates_both_entity_keys_but_not_other_posts() {
    let (store, trigger) = build_cache(CacheConfig::default());

    store.set(keys::post_by_cid(42), json!({"title": "x"}));
    store.set(keys::post_by_slug("x-marks-the-spot"), json!({"title": "x"}));
    store.set(keys::post_by_cid(99), json!({"title": "unrelated"}));

    trigger.post_saved(42, "x-marks-the-spot");

    assert!(store.get(&keys::post_by_cid(42)).is_none());
    assert!(store.get(&keys::post_by_slug("x-marks-the-spot")).is_none());
    assert!(store.get(&keys::post_by_cid(99)).is_some());
}

#[test]
fn post_publish_purges_every_aggregate_listing() {
    let (store, trigger) = build_cache(CacheConfig::default());

    store.set(keys::post_list(1, 10, None), json!([1, 2, 3]));
    store.set(keys::post_list(2, 10, Some("rust")), json!([4]));
    store.set(keys::hot_list(10), json!([1]));
    store.set(keys::archive(1), json!({"2026-08": 3}));
    store.set(keys::links(), json!(["https://example.org"]));

    trigger.post_published(7, "new-post");

    assert!(store.get(&keys::post_list(1, 10, None)).is_none());
    assert!(store.get(&keys::post_list(2, 10, Some("rust"))).is_none());
    assert!(store.get(&keys::hot_list(10)).is_none());
    assert!(store.get(&keys::archive(1)).is_none());
    // The blogroll does not list posts.
    assert!(store.get(&keys::links()).is_some());
}

#[test]
fn comment_create_purges_post_and_comment_aggregates_only() {
    let (store, trigger) = build_cache(CacheConfig::default());

    store.set(keys::post_by_cid(5), json!({"comments": 2}));
    store.set(keys::post_by_slug("foo"), json!({"comments": 2}));
    store.set(keys::recent_comments(5), json!(["hi"]));
    store.set(keys::hot_list(10), json!([5]));
    store.set(keys::post_list(1, 10, None), json!([5]));

    trigger.comment_created(5, "foo");

    assert!(store.get(&keys::post_by_cid(5)).is_none());
    assert!(store.get(&keys::post_by_slug("foo")).is_none());
    assert!(store.get(&keys::recent_comments(5)).is_none());
    assert!(store.get(&keys::hot_list(10)).is_none());
    // The set of listed posts is unchanged by a comment.
    assert!(store.get(&keys::post_list(1, 10, None)).is_some());
}

#[test]
fn ttl_expiry_observed_through_the_read_path() {
    let config = CacheConfig::default();
    let clock = Arc::new(ManualClock::starting_now());
    let store = Store::with_clock(&config, clock.clone());

    store.set_with_ttl(keys::tags(), json!(["rust"]), Duration::from_secs(600));
    assert!(store.get(&keys::tags()).is_some());

    clock.advance(Duration::from_secs(601));

    assert!(store.get(&keys::tags()).is_none());
    assert!(store.keys().is_empty());
}

#[test]
fn disabled_cache_never_invalidates_anything() {
    let (store, trigger) = build_cache(CacheConfig {
        enabled: false,
        ..Default::default()
    });

    // A read path that ignored the master switch would still find this.
    store.set(keys::post_by_cid(1), json!({"title": "stale"}));

    trigger.post_saved(1, "stale");

    assert!(trigger.queue().is_empty());
    assert!(store.get(&keys::post_by_cid(1)).is_some());
}

#[test]
fn flush_all_resets_every_namespace() {
    let (store, trigger) = build_cache(CacheConfig::default());

    store.set(keys::post_by_cid(1), json!(1));
    store.set(keys::links(), json!(2));
    store.set(keys::categories(), json!(3));

    trigger.flush_all();

    assert!(store.is_empty());
}

#[test]
fn batched_mutations_consume_in_one_pass() {
    let (store, trigger) = build_cache(CacheConfig::default());

    store.set(keys::post_by_cid(1), json!(1));
    store.set(keys::post_by_cid(2), json!(2));
    store.set(keys::links(), json!(3));

    // Defer consumption across a multi-entity admin operation, then
    // consume once.
    trigger.trigger(
        EventKind::PostSaved {
            cid: 1,
            slug: "one".to_string(),
        },
        false,
    );
    trigger.trigger(
        EventKind::PostSaved {
            cid: 2,
            slug: "two".to_string(),
        },
        false,
    );
    assert_eq!(trigger.queue().len(), 2);

    assert!(trigger.consumer().consume());

    assert!(store.get(&keys::post_by_cid(1)).is_none());
    assert!(store.get(&keys::post_by_cid(2)).is_none());
    assert!(store.get(&keys::links()).is_some());
    assert!(trigger.queue().is_empty());
}
