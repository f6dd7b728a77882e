//! Bounded recency cache for ordex
//!
//! A thin consumer of [`OrderedMap`] with no secondary indexes: the default
//! order doubles as the recency queue. New and re-set entries enter at the
//! front, every hit moves its entry back to the front, and overflow evicts
//! from the back — front is most recently touched, back is the eviction
//! candidate.

use std::hash::Hash;

use tracing::debug;

use crate::map::{MapResult, OrderedMap};

/// Bounded, recency-ordered key/value store.
pub struct Cache<K, D> {
    map: OrderedMap<K, D>,
    capacity: usize,
}

impl<K, D> Cache<K, D>
where
    K: Clone + Eq + Hash + Sync,
    D: Sync,
{
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> MapResult<Self> {
        Ok(Self {
            map: OrderedMap::new(Vec::new())?,
            capacity,
        })
    }

    /// Adds or replaces an entry, evicting from the back on overflow.
    pub fn set(&self, key: K, value: D) -> MapResult<()> {
        self.map.set_first(key, value)?;
        while self.map.len() > self.capacity {
            if self.map.del_last().is_none() {
                break;
            }
            debug!(len = self.map.len(), "cache evicted tail entry");
        }
        Ok(())
    }

    /// Returns the value under `key` and marks the entry most recently
    /// used.
    pub fn get(&self, key: &K) -> Option<D>
    where
        D: Clone,
    {
        let handle = self.map.get_entry(key)?;
        let value = self.map.value(handle)?;
        // A concurrent delete between the lookups surfaces here; the miss
        // is correct either way.
        self.map.move_to_front(handle).ok()?;
        Some(value)
    }

    /// Removes an entry, returning its value.
    pub fn del(&self, key: &K) -> Option<D> {
        self.map.del(key)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let cache: Cache<String, i64> = Cache::new(4).unwrap();
        cache.set("a".into(), 1).unwrap();

        assert_eq!(cache.get(&"a".into()), Some(1));
        assert_eq!(cache.get(&"b".into()), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overflow_evicts_oldest() {
        let cache: Cache<i64, i64> = Cache::new(3).unwrap();
        for key in 1..=5 {
            cache.set(key, key * 10).unwrap();
        }

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&5), Some(50));
    }

    #[test]
    fn test_get_promotes_entry() {
        let cache: Cache<i64, i64> = Cache::new(2).unwrap();
        cache.set(1, 10).unwrap();
        cache.set(2, 20).unwrap();

        // Touch 1, then overflow: 2 is now the eviction candidate.
        assert_eq!(cache.get(&1), Some(10));
        cache.set(3, 30).unwrap();

        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&1), Some(10));
        assert_eq!(cache.get(&3), Some(30));
    }

    #[test]
    fn test_reset_existing_key_keeps_len() {
        let cache: Cache<i64, i64> = Cache::new(2).unwrap();
        cache.set(1, 10).unwrap();
        cache.set(1, 11).unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1), Some(11));
    }

    #[test]
    fn test_del() {
        let cache: Cache<i64, i64> = Cache::new(2).unwrap();
        cache.set(1, 10).unwrap();

        assert_eq!(cache.del(&1), Some(10));
        assert!(cache.is_empty());
        assert_eq!(cache.del(&1), None);
    }
}
