//! Generation-checked slot arena for entries.
//!
//! Entries are linked into every index lane at once, so no single lane can
//! own them. The arena is the one owner: lanes and the key table refer to
//! entries through stable slot ids. Removing an entry bumps its slot's
//! generation, which invalidates every outstanding id for that slot in one
//! step — a stale id can never resolve to the slot's next occupant.

use super::Entry;

/// Stable, generation-checked identifier for one arena slot.
///
/// Ids taken before an entry was removed fail cleanly afterwards; they are
/// never silently remapped to a reused slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId {
    slot: u32,
    generation: u32,
}

impl EntryId {
    /// Raw slot position, for lane linkage.
    pub(crate) fn slot(self) -> u32 {
        self.slot
    }
}

#[derive(Debug)]
struct Slot<K, D> {
    generation: u32,
    entry: Option<Entry<K, D>>,
}

/// Dense slot store with a free list.
///
/// Lookup, insert and remove are O(1); slots are reused in LIFO order.
#[derive(Debug)]
pub struct Arena<K, D> {
    slots: Vec<Slot<K, D>>,
    free: Vec<u32>,
    len: usize,
}

impl<K, D> Arena<K, D> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots ever allocated, live or free. Lanes size their link
    /// tables to this.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Stores an entry, reusing a free slot when one exists.
    pub fn insert(&mut self, entry: Entry<K, D>) -> EntryId {
        self.len += 1;
        match self.free.pop() {
            Some(slot) => {
                let s = &mut self.slots[slot as usize];
                debug_assert!(s.entry.is_none());
                s.entry = Some(entry);
                EntryId {
                    slot,
                    generation: s.generation,
                }
            }
            None => {
                let slot = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                EntryId {
                    slot,
                    generation: 0,
                }
            }
        }
    }

    /// Removes the entry behind `id`, invalidating the id everywhere.
    pub fn remove(&mut self, id: EntryId) -> Option<Entry<K, D>> {
        let slot = self.slots.get_mut(id.slot as usize)?;
        if slot.generation != id.generation || slot.entry.is_none() {
            return None;
        }
        let entry = slot.entry.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.slot);
        self.len -= 1;
        entry
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry<K, D>> {
        let slot = self.slots.get(id.slot as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut Entry<K, D>> {
        let slot = self.slots.get_mut(id.slot as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_mut()
    }

    /// True if `id` still refers to a live entry.
    pub fn contains(&self, id: EntryId) -> bool {
        self.get(id).is_some()
    }

    /// Entry occupying a raw slot, ignoring generations. Lane traversal uses
    /// this: slots reachable from a lane are live by invariant.
    pub(crate) fn slot_entry(&self, slot: u32) -> Option<&Entry<K, D>> {
        self.slots.get(slot as usize)?.entry.as_ref()
    }

    /// Mutable variant of [`slot_entry`](Self::slot_entry).
    pub(crate) fn slot_entry_mut(&mut self, slot: u32) -> Option<&mut Entry<K, D>> {
        self.slots.get_mut(slot as usize)?.entry.as_mut()
    }

    /// Current id of an occupied raw slot.
    pub(crate) fn id_of_slot(&self, slot: u32) -> Option<EntryId> {
        let s = self.slots.get(slot as usize)?;
        s.entry.as_ref()?;
        Some(EntryId {
            slot,
            generation: s.generation,
        })
    }

    /// Removes every entry. Generations advance so all outstanding ids go
    /// stale.
    pub fn clear(&mut self) {
        self.free.clear();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(i as u32);
        }
        self.len = 0;
    }
}

impl<K, D> Default for Arena<K, D> {
    fn default() -> Self {
        Self::new()
    }
}
