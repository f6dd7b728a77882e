//! Cache Eviction Tests
//!
//! Tests the LRU cache built on the ordered map:
//! - Capacity is enforced on every insert
//! - The least recently touched entry is the one evicted
//! - get() counts as a touch; del() frees a slot without eviction

use ordex::Cache;

// =============================================================================
// Capacity Enforcement
// =============================================================================

#[test]
fn test_overflow_evicts_down_to_capacity() {
    let cache: Cache<i64, String> = Cache::new(8).unwrap();
    for key in 0..20 {
        cache.set(key, format!("v{key}")).unwrap();
    }

    assert_eq!(cache.len(), 8);
    // Only the newest eight survive.
    for key in 0..12 {
        assert_eq!(cache.get(&key), None);
    }
    for key in 12..20 {
        assert_eq!(cache.get(&key), Some(format!("v{key}")));
    }
}

#[test]
fn test_reinsert_existing_key_does_not_evict() {
    let cache: Cache<i64, i64> = Cache::new(3).unwrap();
    for key in 0..3 {
        cache.set(key, key).unwrap();
    }

    cache.set(0, 100).unwrap();

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get(&0), Some(100));
    assert_eq!(cache.get(&1), Some(1));
    assert_eq!(cache.get(&2), Some(2));
}

// =============================================================================
// Recency
// =============================================================================

#[test]
fn test_get_promotes_against_eviction() {
    let cache: Cache<i64, i64> = Cache::new(3).unwrap();
    cache.set(1, 1).unwrap();
    cache.set(2, 2).unwrap();
    cache.set(3, 3).unwrap();

    // Touch the oldest entry, then overflow twice.
    assert_eq!(cache.get(&1), Some(1));
    cache.set(4, 4).unwrap();
    cache.set(5, 5).unwrap();

    assert_eq!(cache.get(&2), None);
    assert_eq!(cache.get(&3), None);
    assert_eq!(cache.get(&1), Some(1));
    assert_eq!(cache.get(&4), Some(4));
    assert_eq!(cache.get(&5), Some(5));
}

#[test]
fn test_reset_of_existing_key_keeps_recency_position() {
    let cache: Cache<i64, i64> = Cache::new(2).unwrap();
    cache.set(1, 1).unwrap();
    cache.set(2, 2).unwrap();

    // A re-set replaces the value in place; only get() promotes.
    cache.set(1, 10).unwrap();
    cache.set(3, 3).unwrap();

    assert_eq!(cache.get(&1), None);
    assert_eq!(cache.get(&2), Some(2));
    assert_eq!(cache.get(&3), Some(3));
}

// =============================================================================
// Explicit Removal
// =============================================================================

#[test]
fn test_del_frees_a_slot() {
    let cache: Cache<i64, i64> = Cache::new(2).unwrap();
    cache.set(1, 1).unwrap();
    cache.set(2, 2).unwrap();

    assert_eq!(cache.del(&1), Some(1));
    assert_eq!(cache.del(&1), None);
    assert_eq!(cache.len(), 1);

    cache.set(3, 3).unwrap();
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get(&2), Some(2));
    assert_eq!(cache.get(&3), Some(3));
    assert_eq!(cache.capacity(), 2);
}
