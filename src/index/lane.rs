//! One ordering lane: a doubly-linked sequence over arena slots.
//!
//! Every index owns its own link table, a parallel array indexed by arena
//! slot. A slot's membership node in this lane is `links[slot]`; surgery is
//! O(1) and never touches another lane. This is the arena-handle rendering
//! of the classic intrusive list: lanes order entries without owning them.

use super::{Comparator, IndexKey};

/// Membership node of one slot in one lane.
#[derive(Debug, Clone, Copy, Default)]
struct Link {
    prev: Option<u32>,
    next: Option<u32>,
}

/// A named ordering view over the map's entries.
///
/// The default index has no comparator and is repositioned only by explicit
/// placement and move operations; secondary indexes are kept sorted by the
/// sort engine.
pub struct Index<K, D> {
    id: IndexKey,
    comparator: Option<Comparator<K, D>>,
    head: Option<u32>,
    tail: Option<u32>,
    links: Vec<Link>,
    len: usize,
}

impl<K, D> Index<K, D> {
    pub(crate) fn new(id: IndexKey, comparator: Option<Comparator<K, D>>) -> Self {
        Self {
            id,
            comparator,
            head: None,
            tail: None,
            links: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn id(&self) -> &IndexKey {
        &self.id
    }

    pub(crate) fn comparator(&self) -> Option<&Comparator<K, D>> {
        self.comparator.as_ref()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn head(&self) -> Option<u32> {
        self.head
    }

    pub(crate) fn tail(&self) -> Option<u32> {
        self.tail
    }

    pub(crate) fn next_of(&self, slot: u32) -> Option<u32> {
        self.links[slot as usize].next
    }

    pub(crate) fn prev_of(&self, slot: u32) -> Option<u32> {
        self.links[slot as usize].prev
    }

    /// Extends the link table to cover `slot_count` arena slots.
    pub(crate) fn grow_to(&mut self, slot_count: usize) {
        if self.links.len() < slot_count {
            self.links.resize(slot_count, Link::default());
        }
    }

    /// Links an unlinked slot at the front.
    pub(crate) fn push_front(&mut self, slot: u32) {
        self.links[slot as usize] = Link {
            prev: None,
            next: self.head,
        };
        match self.head {
            Some(h) => self.links[h as usize].prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
        self.len += 1;
    }

    /// Links an unlinked slot at the back.
    pub(crate) fn push_back(&mut self, slot: u32) {
        self.links[slot as usize] = Link {
            prev: self.tail,
            next: None,
        };
        match self.tail {
            Some(t) => self.links[t as usize].next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.len += 1;
    }

    /// Links an unlinked slot immediately before `mark`, which must be
    /// linked.
    pub(crate) fn insert_before(&mut self, slot: u32, mark: u32) {
        let before = self.links[mark as usize].prev;
        self.links[slot as usize] = Link {
            prev: before,
            next: Some(mark),
        };
        self.links[mark as usize].prev = Some(slot);
        match before {
            Some(p) => self.links[p as usize].next = Some(slot),
            None => self.head = Some(slot),
        }
        self.len += 1;
    }

    /// Links an unlinked slot immediately after `mark`, which must be
    /// linked.
    pub(crate) fn insert_after(&mut self, slot: u32, mark: u32) {
        let after = self.links[mark as usize].next;
        self.links[slot as usize] = Link {
            prev: Some(mark),
            next: after,
        };
        self.links[mark as usize].next = Some(slot);
        match after {
            Some(n) => self.links[n as usize].prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.len += 1;
    }

    /// Detaches a linked slot, leaving its neighbors joined.
    pub(crate) fn unlink(&mut self, slot: u32) {
        let link = self.links[slot as usize];
        match link.prev {
            Some(p) => self.links[p as usize].next = link.next,
            None => self.head = link.next,
        }
        match link.next {
            Some(n) => self.links[n as usize].prev = link.prev,
            None => self.tail = link.prev,
        }
        self.links[slot as usize] = Link::default();
        self.len -= 1;
    }

    pub(crate) fn move_to_front(&mut self, slot: u32) {
        if self.head == Some(slot) {
            return;
        }
        self.unlink(slot);
        self.push_front(slot);
    }

    pub(crate) fn move_to_back(&mut self, slot: u32) {
        if self.tail == Some(slot) {
            return;
        }
        self.unlink(slot);
        self.push_back(slot);
    }

    pub(crate) fn move_before(&mut self, slot: u32, mark: u32) {
        if slot == mark {
            return;
        }
        self.unlink(slot);
        self.insert_before(slot, mark);
    }

    pub(crate) fn move_after(&mut self, slot: u32, mark: u32) {
        if slot == mark {
            return;
        }
        self.unlink(slot);
        self.insert_after(slot, mark);
    }

    /// Unlinks every slot.
    pub(crate) fn clear(&mut self) {
        self.head = None;
        self.tail = None;
        self.links.iter_mut().for_each(|l| *l = Link::default());
        self.len = 0;
    }

    /// Front-to-back slots, for tests and invariant checks.
    #[cfg(test)]
    pub(crate) fn slots(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.len);
        let mut cur = self.head;
        while let Some(slot) = cur {
            out.push(slot);
            cur = self.next_of(slot);
        }
        out
    }
}
