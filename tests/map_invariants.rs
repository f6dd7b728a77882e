//! OrderedMap Invariant Tests
//!
//! Tests for the core container invariants:
//! - Bijection: key table and every index order hold the same entry set
//! - Round trip: set/get/del/exists agree
//! - Default-order stability: value updates never reposition an entry
//! - Errors: construction and handle misuse fail cleanly, state intact

use std::collections::HashSet;

use ordex::{by_key, IndexKey, IndexSpec, MapError, OrderedMap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// =============================================================================
// Helper Functions
// =============================================================================

fn two_index_map() -> OrderedMap<i64, i64> {
    OrderedMap::new(vec![
        IndexSpec::new("byKey", by_key),
        IndexSpec::new("byValue", ordex::by_value),
    ])
    .unwrap()
}

fn keys_in(map: &OrderedMap<i64, i64>, index: &IndexKey) -> Vec<i64> {
    let mut keys = Vec::new();
    map.for_each_in(index, |k, _| keys.push(*k));
    keys
}

/// Asserts the bijection invariant across the default and both secondary
/// orders.
fn assert_bijection(map: &OrderedMap<i64, i64>) {
    let table: HashSet<i64> = map.pairs().iter().map(|p| p.key).collect();
    assert_eq!(table.len(), map.len());

    for index in [
        IndexKey::Default,
        IndexKey::from("byKey"),
        IndexKey::from("byValue"),
    ] {
        let walked = keys_in(map, &index);
        assert_eq!(walked.len(), map.len(), "length mismatch in {}", index);
        let walked: HashSet<i64> = walked.into_iter().collect();
        assert_eq!(walked, table, "key set mismatch in {}", index);
    }
}

// =============================================================================
// Round Trip
// =============================================================================

#[test]
fn test_set_get_del_roundtrip() {
    let map = two_index_map();

    map.set(1, 100).unwrap();
    assert_eq!(map.get(&1), Some(100));
    assert!(map.exists(&1));

    assert_eq!(map.del(&1), Some(100));
    assert_eq!(map.get(&1), None);
    assert!(!map.exists(&1));
    assert_eq!(map.del(&1), None);
}

#[test]
fn test_len_tracks_distinct_keys() {
    let map = two_index_map();
    assert!(map.is_empty());

    map.set(1, 10).unwrap();
    map.set(2, 20).unwrap();
    map.set(1, 11).unwrap();
    assert_eq!(map.len(), 2);

    map.del(&2);
    assert_eq!(map.len(), 1);
}

// =============================================================================
// Bijection Under Random Operations
// =============================================================================

#[test]
fn test_bijection_under_random_set_del() {
    let map = two_index_map();
    let mut rng = StdRng::seed_from_u64(7);
    let mut live: HashSet<i64> = HashSet::new();

    for _ in 0..500 {
        let key = rng.gen_range(0..64);
        if rng.gen_bool(0.7) {
            map.set(key, rng.gen_range(-1000..1000)).unwrap();
            live.insert(key);
        } else {
            let removed = map.del(&key).is_some();
            assert_eq!(removed, live.remove(&key));
        }
    }

    assert_eq!(map.len(), live.len());
    assert_bijection(&map);
}

#[test]
fn test_bijection_after_moves_and_relative_inserts() {
    let map = two_index_map();
    for key in 0..10 {
        map.set(key, key).unwrap();
    }

    let mark = map.get_entry(&5).unwrap();
    map.insert_before(100, 1, mark).unwrap();
    map.insert_after(101, 2, mark).unwrap();
    map.move_to_front(map.get_entry(&9).unwrap()).unwrap();
    map.move_to_back(map.get_entry(&0).unwrap()).unwrap();

    assert_eq!(map.len(), 12);
    assert_bijection(&map);
}

// =============================================================================
// Default-Order Stability
// =============================================================================

#[test]
fn test_value_update_keeps_default_position() {
    let map = two_index_map();
    for key in [3, 1, 2] {
        map.set(key, key * 10).unwrap();
    }

    map.set(1, -999).unwrap();

    // Default order unchanged; byValue re-sorted.
    assert_eq!(keys_in(&map, &IndexKey::Default), vec![3, 1, 2]);
    assert_eq!(keys_in(&map, &"byValue".into()), vec![1, 2, 3]);
}

#[test]
fn test_only_moves_change_default_order() {
    let map = two_index_map();
    for key in [1, 2, 3] {
        map.set(key, key).unwrap();
    }

    map.set(2, 200).unwrap();
    map.refresh();
    assert_eq!(keys_in(&map, &IndexKey::Default), vec![1, 2, 3]);

    map.move_to_front(map.get_entry(&3).unwrap()).unwrap();
    assert_eq!(keys_in(&map, &IndexKey::Default), vec![3, 1, 2]);
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn test_duplicate_and_reserved_index_ids() {
    let err = OrderedMap::<i64, i64>::new(vec![
        IndexSpec::new("x", by_key),
        IndexSpec::new("x", by_key),
    ])
    .unwrap_err();
    assert_eq!(err, MapError::DuplicateIndexKey(IndexKey::from("x")));

    let err =
        OrderedMap::<i64, i64>::new(vec![IndexSpec::new(IndexKey::Default, by_key)]).unwrap_err();
    assert_eq!(err, MapError::DuplicateIndexKey(IndexKey::Default));
}

#[test]
fn test_failed_insert_leaves_state_unchanged() {
    let map = two_index_map();
    map.set(1, 10).unwrap();
    map.set(2, 20).unwrap();
    let mark = map.get_entry(&2).unwrap();

    assert_eq!(
        map.insert_before(1, 999, mark),
        Err(MapError::KeyAlreadyExists)
    );
    map.del(&2);
    assert_eq!(
        map.insert_after(3, 30, mark),
        Err(MapError::RecordNotFound)
    );

    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&1), Some(10));
    assert_bijection(&map);
}

#[test]
fn test_moves_with_stale_handles() {
    let map = two_index_map();
    map.set(1, 10).unwrap();
    map.set(2, 20).unwrap();

    let stale = map.get_entry(&1).unwrap();
    let live = map.get_entry(&2).unwrap();
    map.del(&1);

    assert_eq!(map.move_to_front(stale), Err(MapError::RecordNotFound));
    assert_eq!(map.move_to_back(stale), Err(MapError::RecordNotFound));
    assert_eq!(map.move_before(live, stale), Err(MapError::RecordNotFound));
    assert_eq!(map.move_after(stale, live), Err(MapError::RecordNotFound));
    assert_bijection(&map);
}
