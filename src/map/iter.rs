//! Lazy iteration over the map.

use parking_lot::RwLockReadGuard;

use crate::index::IndexKey;

use super::{MapCore, Pair};

/// Lazy key/value iterator over one index's order.
///
/// Owns the map's shared lock for its whole lifetime: concurrent reads
/// proceed, writes block until the iterator is dropped. It is finite, not
/// restartable once consumed, and safe to short-circuit — dropping it
/// mid-way releases the lock. Calling a locking operation on the same map
/// while it is alive deadlocks.
pub struct Records<'a, K, D> {
    guard: RwLockReadGuard<'a, MapCore<K, D>>,
    lane: Option<usize>,
    cursor: Option<u32>,
}

impl<'a, K, D> Records<'a, K, D> {
    pub(super) fn new(guard: RwLockReadGuard<'a, MapCore<K, D>>, index: &IndexKey) -> Self {
        let lane = guard.lane_of(index);
        let cursor = lane
            .and_then(|lane| guard.index_at(lane))
            .and_then(|ix| ix.head());
        Self { guard, lane, cursor }
    }
}

impl<K, D> Iterator for Records<'_, K, D>
where
    K: Clone,
    D: Clone,
{
    type Item = Pair<K, D>;

    fn next(&mut self) -> Option<Self::Item> {
        let lane = self.lane?;
        let slot = self.cursor?;
        self.cursor = self.guard.index_at(lane).and_then(|ix| ix.next_of(slot));
        let entry = self.guard.arena().slot_entry(slot)?;
        Some(Pair {
            key: entry.key().clone(),
            value: entry.value().clone(),
        })
    }
}
