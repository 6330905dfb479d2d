mod support;

use chrono::Duration;
use llmsh_db::{CacheDb, DbError};
use support::{fingerprints, insert_entries, setup_cache};

const DAY: i64 = 24 * 60 * 60;

#[test]
fn set_then_get_returns_command() {
    let mut test_cache = setup_cache();
    let db = &mut test_cache.db;
    db.set("k1", "ls -la").expect("set");
    let entry = db.get("k1").expect("get").expect("hit");
    assert_eq!(entry.command, "ls -la");
    assert_eq!(entry.fingerprint, "k1");
    assert!(entry.last_used >= entry.created_at);
}

#[test]
fn repeated_hits_increase_hit_count() {
    let mut test_cache = setup_cache();
    let db = &mut test_cache.db;
    db.set_at("k1", "cargo test", 1_000).expect("set");

    let observed: Vec<u64> = (1..=3)
        .map(|step| {
            db.get_at("k1", 1_000 + step)
                .expect("get")
                .expect("hit")
                .hit_count
        })
        .collect();
    assert_eq!(observed, vec![0, 1, 2]);

    let stored = db.peek("k1").expect("peek").expect("stored");
    assert_eq!(stored.hit_count, 3);
    assert_eq!(stored.last_used, 1_003);
    assert_eq!(db.stats().expect("stats").total_hits, 3);
}

#[test]
fn second_set_replaces_command_and_resets_hits() {
    let mut test_cache = setup_cache();
    let db = &mut test_cache.db;
    db.set_at("k1", "npm test", 100).expect("set");
    db.get_at("k1", 110).expect("get");
    db.get_at("k1", 120).expect("get");

    db.set_at("k1", "npm run build", 200).expect("replace");
    let stored = db.peek("k1").expect("peek").expect("stored");
    assert_eq!(stored.command, "npm run build");
    assert_eq!(stored.hit_count, 0);
    assert_eq!(stored.created_at, 200);
    assert_eq!(stored.last_used, 200);
    assert_eq!(db.stats().expect("stats").total_entries, 1);
}

#[test]
fn cleanup_expires_entries_past_ttl() {
    let mut test_cache = setup_cache();
    let db = &mut test_cache.db;
    let now = 100 * DAY;
    insert_entries(
        db,
        &[
            ("old", "make", now - 8 * DAY),
            ("edge", "make install", now - 7 * DAY),
            ("fresh", "make test", now - DAY),
        ],
    );

    let stats = db
        .cleanup_at(Duration::days(7), 1_000, now)
        .expect("cleanup");
    assert_eq!(stats.expired, 1);
    assert_eq!(stats.evicted, 0);
    assert!(db.peek("old").expect("peek").is_none());
    assert!(db.peek("edge").expect("peek").is_some());
    assert!(db.peek("fresh").expect("peek").is_some());
}

#[test]
fn ttl_counts_from_last_use_not_creation() {
    let mut test_cache = setup_cache();
    let db = &mut test_cache.db;
    let now = 100 * DAY;
    db.set_at("k1", "docker ps", now - 30 * DAY).expect("set");
    db.get_at("k1", now - DAY).expect("get");

    db.cleanup_at(Duration::days(7), 0, now).expect("cleanup");
    assert!(db.peek("k1").expect("peek").is_some());
}

#[test]
fn cleanup_keeps_most_recently_used_entries() {
    let mut test_cache = setup_cache();
    let db = &mut test_cache.db;
    let now = 10_000;
    insert_entries(
        db,
        &[
            ("a", "cmd a", now - 50),
            ("b", "cmd b", now - 40),
            ("c", "cmd c", now - 30),
            ("d", "cmd d", now - 20),
            ("e", "cmd e", now - 10),
        ],
    );

    let stats = db
        .cleanup_at(Duration::days(7), 3, now)
        .expect("cleanup");
    assert_eq!(stats.expired, 0);
    assert_eq!(stats.evicted, 2);
    assert_eq!(fingerprints(db), vec!["e", "d", "c"]);
}

#[test]
fn capacity_eviction_ignores_hit_count() {
    let mut test_cache = setup_cache();
    let db = &mut test_cache.db;
    let now = 10_000;
    db.set_at("popular", "git status", now - 100).expect("set");
    for step in 0..10 {
        db.get_at("popular", now - 90 + step).expect("get");
    }
    insert_entries(db, &[("recent", "git log", now - 5)]);

    db.cleanup_at(Duration::days(7), 1, now).expect("cleanup");
    assert_eq!(fingerprints(db), vec!["recent"]);
}

#[test]
fn capacity_ties_break_on_fingerprint() {
    let mut test_cache = setup_cache();
    let db = &mut test_cache.db;
    let now = 10_000;
    insert_entries(
        db,
        &[("a", "one", now), ("b", "two", now), ("c", "three", now)],
    );

    db.cleanup_at(Duration::days(7), 2, now).expect("cleanup");
    assert_eq!(fingerprints(db), vec!["c", "b"]);
}

#[test]
fn zero_max_entries_disables_capacity_limit() {
    let mut test_cache = setup_cache();
    let db = &mut test_cache.db;
    let now = 10_000;
    insert_entries(db, &[("a", "one", now), ("b", "two", now)]);

    let stats = db.cleanup_at(Duration::days(7), 0, now).expect("cleanup");
    assert_eq!(stats.removed(), 0);
    assert_eq!(db.stats().expect("stats").total_entries, 2);
}

fn bulky_entries(db: &CacheDb, count: usize, at: i64) {
    let command = "x".repeat(1_000);
    for index in 0..count {
        db.set_at(&format!("k{index:04}"), &command, at)
            .expect("set entry");
    }
}

#[test]
fn eviction_leaves_file_uncompacted() {
    let mut test_cache = setup_cache();
    let db = &mut test_cache.db;
    let now = 50_000;
    bulky_entries(db, 300, now);

    let stats = db.evict_at(Duration::days(7), 1, now).expect("evict");
    assert_eq!(stats.evicted, 299);
    assert_eq!(db.stats().expect("stats").total_entries, 1);
    assert!(db.free_pages().expect("free pages") > 0);

    assert!(db.compact().expect("compact"));
    assert_eq!(db.free_pages().expect("free pages"), 0);
    assert!(!db.compact().expect("nothing to compact"));
}

#[test]
fn cleanup_reclaims_space_after_removal() {
    let mut test_cache = setup_cache();
    let db = &mut test_cache.db;
    let now = 50_000;
    bulky_entries(db, 300, now);

    let stats = db.cleanup_at(Duration::days(7), 1, now).expect("cleanup");
    assert_eq!(stats.removed(), 299);
    assert_eq!(db.free_pages().expect("free pages"), 0);
    assert_eq!(fingerprints(db), vec!["k0299".to_string()]);
}

#[test]
fn stats_and_clear() {
    let mut test_cache = setup_cache();
    let db = &mut test_cache.db;
    insert_entries(db, &[("a", "one", 10), ("b", "two", 20)]);
    db.get_at("a", 30).expect("get");

    let stats = db.stats().expect("stats");
    assert_eq!(stats.total_entries, 2);
    assert_eq!(stats.total_hits, 1);

    assert_eq!(db.clear().expect("clear"), 2);
    assert_eq!(db.stats().expect("stats").total_entries, 0);
}

#[test]
fn operations_fail_after_close() {
    let mut test_cache = setup_cache();
    let db = &mut test_cache.db;
    db.set("k1", "ls").expect("set");
    db.close().expect("close");

    assert!(matches!(db.get("k1"), Err(DbError::Closed)));
    assert!(matches!(db.set("k2", "pwd"), Err(DbError::Closed)));
    assert!(matches!(db.stats(), Err(DbError::Closed)));
    assert!(matches!(
        db.cleanup(Duration::days(1), 10),
        Err(DbError::Closed)
    ));
    assert!(matches!(db.evict(Duration::days(1), 10), Err(DbError::Closed)));
    assert!(matches!(db.compact(), Err(DbError::Closed)));
}

#[test]
fn two_handles_share_the_same_store() {
    let test_cache = setup_cache();
    let mut other = CacheDb::open(&test_cache.path).expect("second handle");
    test_cache.db.set_at("shared", "htop", 50).expect("set");

    let entry = other.get_at("shared", 60).expect("get").expect("hit");
    assert_eq!(entry.command, "htop");
    let stored = test_cache.db.peek("shared").expect("peek").expect("stored");
    assert_eq!(stored.hit_count, 1);
}
