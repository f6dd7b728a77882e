//! OrderedMap subsystem for ordex
//!
//! The facade over the key table, the arena and the index lanes. One
//! reader/writer lock guards the whole map: any number of concurrent
//! readers, or exactly one writer. Write operations mutate the table and
//! the default lane directly, then hand the secondary lanes to the sort
//! engine before the lock is released, so a reader acquiring the lock
//! afterwards always observes a fully sorted state.
//!
//! # Invariants
//!
//! - Bijection: the key table and every lane hold exactly the same entry
//!   set after every completed operation
//! - Sortedness: every secondary lane satisfies its comparator for all
//!   adjacent pairs after every completed write
//! - Manual order: the default lane changes only through explicit
//!   placement (set/set_first/insert_before/insert_after) and move
//!   operations, never through a comparator
//!
//! # Caller obligations
//!
//! Iteration (`for_each*`, `records*`) holds the lock for the whole
//! traversal. Calling any other locking operation on the same map from
//! inside the callback or while the iterator is alive deadlocks; this is
//! documented, not detected.

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::entry::{Arena, Entry, EntryHandle, EntryId};
use crate::index::{Index, IndexKey, IndexSpec};
use crate::sort;
use crate::trace::TraceHook;

mod errors;
mod iter;

pub use errors::{MapError, MapResult};
pub use iter::Records;

/// Lane ordinal of the default index.
const DEFAULT_LANE: usize = 0;

/// A key/value snapshot taken from the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair<K, D> {
    pub key: K,
    pub value: D,
}

/// Placement of a new entry in the default lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Back,
    Front,
    Before,
    After,
}

/// A concurrency-safe associative container with one manual order and any
/// number of comparator-sorted orders over the same entries.
///
/// ```
/// use ordex::{by_key, IndexSpec, OrderedMap};
///
/// let map = OrderedMap::new(vec![IndexSpec::new("byKey", by_key)]).unwrap();
/// map.set(2, "two").unwrap();
/// map.set(1, "one").unwrap();
///
/// // Insertion order in the default index...
/// let first = map.first().unwrap();
/// assert_eq!(map.key(first), Some(2));
///
/// // ...key order in the secondary index.
/// let first = map.first_in(&"byKey".into()).unwrap();
/// assert_eq!(map.key(first), Some(1));
/// ```
pub struct OrderedMap<K, D> {
    inner: RwLock<MapCore<K, D>>,
}

impl<K, D> std::fmt::Debug for OrderedMap<K, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderedMap").finish_non_exhaustive()
    }
}

/// Everything behind the lock.
pub(crate) struct MapCore<K, D> {
    table: HashMap<K, EntryId>,
    arena: Arena<K, D>,
    default: Index<K, D>,
    secondary: Vec<Index<K, D>>,
    /// Index id to lane ordinal; the default is lane 0, `secondary[n]` is
    /// lane n + 1.
    ordinals: HashMap<IndexKey, usize>,
    trace: Option<TraceHook<K>>,
}

impl<K, D> MapCore<K, D> {
    pub(crate) fn lane_of(&self, id: &IndexKey) -> Option<usize> {
        self.ordinals.get(id).copied()
    }

    pub(crate) fn index_at(&self, lane: usize) -> Option<&Index<K, D>> {
        match lane {
            DEFAULT_LANE => Some(&self.default),
            n => self.secondary.get(n - 1),
        }
    }

    pub(crate) fn arena(&self) -> &Arena<K, D> {
        &self.arena
    }

    fn resolve(&self, handle: EntryHandle) -> MapResult<u32> {
        if self.arena.contains(handle.id()) {
            Ok(handle.id().slot())
        } else {
            Err(MapError::RecordNotFound)
        }
    }

    fn handle_at(&self, lane: usize, slot: u32) -> Option<EntryHandle> {
        Some(EntryHandle {
            id: self.arena.id_of_slot(slot)?,
            lane: lane as u32,
        })
    }
}

impl<K, D> MapCore<K, D>
where
    K: Clone + Eq + Hash + Sync,
    D: Sync,
{
    /// Creates an entry, places it in the default lane per `direction`,
    /// links it into every secondary lane and fixes those up.
    fn insert_entry(
        &mut self,
        key: K,
        value: D,
        direction: Direction,
        mark: Option<u32>,
    ) -> MapResult<()> {
        if matches!(direction, Direction::Before | Direction::After) && mark.is_none() {
            return Err(MapError::IncorrectDirection);
        }

        let id = self.arena.insert(Entry::new(key.clone(), value));
        let slot = id.slot();
        self.default.grow_to(self.arena.slot_count());
        for index in &mut self.secondary {
            index.grow_to(self.arena.slot_count());
        }

        match (direction, mark) {
            (Direction::Back, _) => self.default.push_back(slot),
            (Direction::Front, _) => self.default.push_front(slot),
            (Direction::Before, Some(m)) => self.default.insert_before(slot, m),
            (Direction::After, Some(m)) => self.default.insert_after(slot, m),
            // Guarded above, before the arena was touched.
            (Direction::Before | Direction::After, None) => {
                return Err(MapError::IncorrectDirection)
            }
        }

        for index in &mut self.secondary {
            index.push_front(slot);
        }
        sort::fixup_all(&mut self.secondary, &self.arena, slot, self.trace.as_ref());

        self.table.insert(key, id);
        Ok(())
    }

    /// Unlinks the entry from every lane and removes it from the arena and
    /// the key table.
    fn remove_entry(&mut self, id: EntryId) -> Option<Entry<K, D>> {
        if !self.arena.contains(id) {
            return None;
        }
        let slot = id.slot();
        self.default.unlink(slot);
        for index in &mut self.secondary {
            index.unlink(slot);
        }
        let entry = self.arena.remove(id)?;
        self.table.remove(entry.key());
        Some(entry)
    }

    fn resort_secondary(&mut self) {
        sort::resort_all(&mut self.secondary, &self.arena, self.trace.as_ref());
    }
}

impl<K, D> OrderedMap<K, D>
where
    K: Clone + Eq + Hash + Sync,
    D: Sync,
{
    /// Creates a map with the default index plus one secondary index per
    /// spec.
    ///
    /// Fails with [`MapError::DuplicateIndexKey`] when a spec reuses the
    /// reserved default id or repeats another spec's id.
    pub fn new(specs: Vec<IndexSpec<K, D>>) -> MapResult<Self> {
        Self::build(specs, None)
    }

    /// Like [`new`](Self::new), with a sort-engine observer attached.
    ///
    /// The hook runs inside the write lock; it must be fast and must not
    /// call back into the map.
    pub fn with_trace(specs: Vec<IndexSpec<K, D>>, hook: TraceHook<K>) -> MapResult<Self> {
        Self::build(specs, Some(hook))
    }

    fn build(specs: Vec<IndexSpec<K, D>>, trace: Option<TraceHook<K>>) -> MapResult<Self> {
        let mut ordinals = HashMap::new();
        ordinals.insert(IndexKey::Default, DEFAULT_LANE);

        let mut secondary = Vec::with_capacity(specs.len());
        for spec in specs {
            let (id, comparator) = spec.into_parts();
            if ordinals.contains_key(&id) {
                return Err(MapError::DuplicateIndexKey(id));
            }
            ordinals.insert(id.clone(), secondary.len() + 1);
            secondary.push(Index::new(id, Some(comparator)));
        }

        Ok(Self {
            inner: RwLock::new(MapCore {
                table: HashMap::new(),
                arena: Arena::new(),
                default: Index::new(IndexKey::Default, None),
                secondary,
                ordinals,
                trace,
            }),
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.inner.read().table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if `key` is present.
    pub fn exists(&self, key: &K) -> bool {
        self.inner.read().table.contains_key(key)
    }

    /// Returns a copy of the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<D>
    where
        D: Clone,
    {
        let core = self.inner.read();
        let id = *core.table.get(key)?;
        core.arena.get(id).map(|e| e.value().clone())
    }

    /// Returns a handle to the entry stored under `key`, bound to the
    /// default index.
    pub fn get_entry(&self, key: &K) -> Option<EntryHandle> {
        let core = self.inner.read();
        let id = *core.table.get(key)?;
        Some(EntryHandle {
            id,
            lane: DEFAULT_LANE as u32,
        })
    }

    /// Key behind a handle, or `None` when the entry was deleted.
    pub fn key(&self, handle: EntryHandle) -> Option<K> {
        self.inner
            .read()
            .arena
            .get(handle.id())
            .map(|e| e.key().clone())
    }

    /// Value behind a handle, or `None` when the entry was deleted.
    pub fn value(&self, handle: EntryHandle) -> Option<D>
    where
        D: Clone,
    {
        self.inner
            .read()
            .arena
            .get(handle.id())
            .map(|e| e.value().clone())
    }

    /// Replaces the value behind a handle without re-sorting.
    ///
    /// The secondary indexes stay in their pre-update order until
    /// [`refresh`](Self::refresh) runs; use [`set`](Self::set) for an
    /// update that re-sorts immediately.
    pub fn update(&self, handle: EntryHandle, value: D) -> MapResult<()> {
        let mut core = self.inner.write();
        match core.arena.get_mut(handle.id()) {
            Some(entry) => {
                entry.set_value(value);
                Ok(())
            }
            None => Err(MapError::RecordNotFound),
        }
    }

    /// Adds or updates `key`. A new entry is appended to the back of the
    /// default order and sorted into every secondary index; an existing
    /// entry keeps its default position, takes the new value and triggers
    /// a full resort of the secondary indexes.
    pub fn set(&self, key: K, value: D) -> MapResult<()> {
        self.set_with(key, value, Direction::Back)
    }

    /// Like [`set`](Self::set), but a new entry enters at the front of the
    /// default order.
    pub fn set_first(&self, key: K, value: D) -> MapResult<()> {
        self.set_with(key, value, Direction::Front)
    }

    fn set_with(&self, key: K, value: D, direction: Direction) -> MapResult<()> {
        let mut core = self.inner.write();
        if let Some(&id) = core.table.get(&key) {
            if let Some(entry) = core.arena.get_mut(id) {
                entry.set_value(value);
            }
            core.resort_secondary();
            return Ok(());
        }
        core.insert_entry(key, value, direction, None)
    }

    /// Removes `key` from every index, returning its value.
    pub fn del(&self, key: &K) -> Option<D> {
        let mut core = self.inner.write();
        let id = *core.table.get(key)?;
        core.remove_entry(id).map(Entry::into_value)
    }

    /// Removes the tail entry of the default order.
    pub fn del_last(&self) -> Option<Pair<K, D>> {
        self.del_last_in(&IndexKey::Default)
    }

    /// Removes the tail entry of the given index's order. The entry leaves
    /// every index, not just the selected one. `None` for an unknown index
    /// or an empty map.
    pub fn del_last_in(&self, index: &IndexKey) -> Option<Pair<K, D>> {
        let mut core = self.inner.write();
        let lane = core.lane_of(index)?;
        let slot = core.index_at(lane)?.tail()?;
        let id = core.arena.id_of_slot(slot)?;
        core.remove_entry(id).map(|entry| {
            let (key, value) = entry.into_parts();
            Pair { key, value }
        })
    }

    /// Removes every entry. Outstanding handles go stale.
    pub fn clear(&self) {
        let mut core = self.inner.write();
        core.table.clear();
        core.arena.clear();
        core.default.clear();
        for index in &mut core.secondary {
            index.clear();
        }
    }

    /// Inserts a new entry immediately before `mark` in the default order;
    /// secondary indexes sort it as usual.
    ///
    /// Fails with [`MapError::KeyAlreadyExists`] when the key is present
    /// and [`MapError::RecordNotFound`] when `mark` is stale.
    pub fn insert_before(&self, key: K, value: D, mark: EntryHandle) -> MapResult<()> {
        self.insert_relative(key, value, Direction::Before, mark)
    }

    /// Counterpart of [`insert_before`](Self::insert_before), placing the
    /// new entry immediately after `mark`.
    pub fn insert_after(&self, key: K, value: D, mark: EntryHandle) -> MapResult<()> {
        self.insert_relative(key, value, Direction::After, mark)
    }

    fn insert_relative(
        &self,
        key: K,
        value: D,
        direction: Direction,
        mark: EntryHandle,
    ) -> MapResult<()> {
        let mut core = self.inner.write();
        if core.table.contains_key(&key) {
            return Err(MapError::KeyAlreadyExists);
        }
        let mark_slot = core.resolve(mark)?;
        core.insert_entry(key, value, direction, Some(mark_slot))
    }

    /// Moves the entry to the front of the default order.
    pub fn move_to_front(&self, handle: EntryHandle) -> MapResult<()> {
        let mut core = self.inner.write();
        let slot = core.resolve(handle)?;
        core.default.move_to_front(slot);
        Ok(())
    }

    /// Moves the entry to the back of the default order.
    pub fn move_to_back(&self, handle: EntryHandle) -> MapResult<()> {
        let mut core = self.inner.write();
        let slot = core.resolve(handle)?;
        core.default.move_to_back(slot);
        Ok(())
    }

    /// Moves the entry immediately before `mark` in the default order.
    pub fn move_before(&self, handle: EntryHandle, mark: EntryHandle) -> MapResult<()> {
        let mut core = self.inner.write();
        let slot = core.resolve(handle)?;
        let mark_slot = core.resolve(mark)?;
        core.default.move_before(slot, mark_slot);
        Ok(())
    }

    /// Moves the entry immediately after `mark` in the default order.
    pub fn move_after(&self, handle: EntryHandle, mark: EntryHandle) -> MapResult<()> {
        let mut core = self.inner.write();
        let slot = core.resolve(handle)?;
        let mark_slot = core.resolve(mark)?;
        core.default.move_after(slot, mark_slot);
        Ok(())
    }

    /// First entry of the default order.
    pub fn first(&self) -> Option<EntryHandle> {
        self.first_in(&IndexKey::Default)
    }

    /// First entry of the given index's order; `None` for an unknown index
    /// or an empty map.
    pub fn first_in(&self, index: &IndexKey) -> Option<EntryHandle> {
        let core = self.inner.read();
        let lane = core.lane_of(index)?;
        let slot = core.index_at(lane)?.head()?;
        core.handle_at(lane, slot)
    }

    /// Last entry of the default order.
    pub fn last(&self) -> Option<EntryHandle> {
        self.last_in(&IndexKey::Default)
    }

    /// Last entry of the given index's order.
    pub fn last_in(&self, index: &IndexKey) -> Option<EntryHandle> {
        let core = self.inner.read();
        let lane = core.lane_of(index)?;
        let slot = core.index_at(lane)?.tail()?;
        core.handle_at(lane, slot)
    }

    /// Successor of `handle` in the ordering the handle was yielded from;
    /// `None` at the boundary or for a stale handle.
    pub fn next(&self, handle: EntryHandle) -> Option<EntryHandle> {
        let core = self.inner.read();
        if !core.arena.contains(handle.id()) {
            return None;
        }
        let lane = handle.lane_index();
        let slot = core.index_at(lane)?.next_of(handle.id().slot())?;
        core.handle_at(lane, slot)
    }

    /// Predecessor of `handle` in the ordering the handle was yielded
    /// from.
    pub fn prev(&self, handle: EntryHandle) -> Option<EntryHandle> {
        let core = self.inner.read();
        if !core.arena.contains(handle.id()) {
            return None;
        }
        let lane = handle.lane_index();
        let slot = core.index_at(lane)?.prev_of(handle.id().slot())?;
        core.handle_at(lane, slot)
    }

    /// Calls `f` for every key/value in default order, under the shared
    /// lock.
    pub fn for_each(&self, f: impl FnMut(&K, &D)) {
        self.for_each_in(&IndexKey::Default, f)
    }

    /// Calls `f` for every key/value in the given index's order; does
    /// nothing for an unknown index.
    pub fn for_each_in(&self, index: &IndexKey, mut f: impl FnMut(&K, &D)) {
        let core = self.inner.read();
        let Some(lane) = core.lane_of(index) else {
            return;
        };
        let Some(ix) = core.index_at(lane) else {
            return;
        };
        let mut cur = ix.head();
        while let Some(slot) = cur {
            if let Some(entry) = core.arena.slot_entry(slot) {
                f(entry.key(), entry.value());
            }
            cur = ix.next_of(slot);
        }
    }

    /// Calls `f` with a mutable value for every entry in default order,
    /// under the exclusive lock, then re-sorts the secondary indexes once.
    ///
    /// This is the supported way to bulk-edit values in place.
    pub fn for_each_update(&self, mut f: impl FnMut(&K, &mut D)) {
        let mut core = self.inner.write();
        let core = &mut *core;
        let mut cur = core.default.head();
        while let Some(slot) = cur {
            cur = core.default.next_of(slot);
            if let Some(entry) = core.arena.slot_entry_mut(slot) {
                let (key, value) = entry.key_value_mut();
                f(key, value);
            }
        }
        core.resort_secondary();
    }

    /// Snapshot of all pairs in default order.
    pub fn pairs(&self) -> Vec<Pair<K, D>>
    where
        D: Clone,
    {
        self.pairs_in(&IndexKey::Default)
    }

    /// Snapshot of all pairs in the given index's order; empty for an
    /// unknown index.
    pub fn pairs_in(&self, index: &IndexKey) -> Vec<Pair<K, D>>
    where
        D: Clone,
    {
        let mut pairs = Vec::with_capacity(self.len());
        self.for_each_in(index, |key, value| {
            pairs.push(Pair {
                key: key.clone(),
                value: value.clone(),
            })
        });
        pairs
    }

    /// Lazy pair iterator over the default order. Holds the shared lock
    /// until dropped; see the module docs for the deadlock obligation.
    pub fn records(&self) -> Records<'_, K, D> {
        self.records_in(&IndexKey::Default)
    }

    /// Lazy pair iterator over the given index's order; yields nothing for
    /// an unknown index. Not restartable once consumed; safe to
    /// short-circuit.
    pub fn records_in(&self, index: &IndexKey) -> Records<'_, K, D> {
        Records::new(self.inner.read(), index)
    }

    /// Fully re-sorts every secondary index. Required after values were
    /// edited through [`update`](Self::update).
    pub fn refresh(&self) {
        self.inner.write().resort_secondary();
    }

    /// Fully re-sorts one secondary index. Fails with
    /// [`MapError::IncorrectIndexKey`] for an unknown id or for the
    /// default index, which has no comparator.
    pub fn refresh_in(&self, index: &IndexKey) -> MapResult<()> {
        let mut core = self.inner.write();
        let lane = match core.lane_of(index) {
            Some(DEFAULT_LANE) | None => {
                return Err(MapError::IncorrectIndexKey(index.clone()))
            }
            Some(lane) => lane,
        };
        let core = &mut *core;
        sort::resort(&mut core.secondary[lane - 1], &core.arena, core.trace.as_ref());
        Ok(())
    }
}
