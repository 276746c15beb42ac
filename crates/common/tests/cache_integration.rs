//! Integration tests for the TTL cache
//!
//! Covers expiry driven by a shared mock clock, cross-thread access through
//! clones and the statistics snapshot.

use std::thread;
use std::time::Duration;

use ticktally_common::cache::TtlCache;
use ticktally_common::time::MockClock;

/// Entries written from worker threads are visible through every clone and
/// expire together once the shared clock passes the TTL.
#[test]
fn test_clones_share_entries_across_threads() {
    let clock = MockClock::new();
    let cache: TtlCache<u32, String, MockClock> =
        TtlCache::with_clock(Duration::from_secs(30), clock.clone());

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    let key = worker * 100 + i;
                    cache.insert(key, format!("value-{key}"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread panicked");
    }

    assert_eq!(cache.len(), 100);
    assert_eq!(cache.get(&307), Some("value-307".to_string()));

    clock.advance_secs(30);
    assert_eq!(cache.get(&307), None);
    assert_eq!(cache.cleanup_expired(), 99);
    assert!(cache.is_empty());
}

/// A refreshed entry outlives the others written at the same time.
#[test]
fn test_reinsert_extends_single_entry() {
    let clock = MockClock::new();
    let cache = TtlCache::with_clock(Duration::from_secs(10), clock.clone());

    cache.insert_many([("a", 1), ("b", 2)]);
    clock.advance_secs(6);
    cache.insert("b", 20);
    clock.advance_secs(6);

    assert_eq!(cache.get(&"a"), None);
    assert_eq!(cache.get(&"b"), Some(20));
}

#[test]
fn test_stats_track_reads_and_invalidations() {
    let clock = MockClock::new();
    let cache = TtlCache::with_clock(Duration::from_secs(10), clock.clone());

    cache.insert("task", vec![1, 2]);
    assert!(cache.get(&"task").is_some());
    assert!(cache.get(&"other").is_none());
    cache.invalidate_all();
    assert!(cache.get(&"task").is_none());

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.inserts, 1);
    assert_eq!(stats.invalidations, 1);
    assert_eq!(stats.size, 0);
    assert!((stats.hit_rate() - 1.0 / 3.0).abs() < f64::EPSILON);
}
