//! Public traversal handle.

use super::EntryId;

/// A stable reference to an entry, bound to the index it was yielded from.
///
/// Handles returned by `first_in`/`last_in` remember their source index, so
/// `next`/`prev` follow that same ordering without an extra argument.
/// Handles from `get_entry` are bound to the default index. A handle whose
/// entry has been deleted fails cleanly: traversal returns `None`, move
/// operations return `RecordNotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHandle {
    pub(crate) id: EntryId,
    pub(crate) lane: u32,
}

impl EntryHandle {
    /// The underlying entry id.
    pub fn id(self) -> EntryId {
        self.id
    }

    pub(crate) fn lane_index(self) -> usize {
        self.lane as usize
    }
}
