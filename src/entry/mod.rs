//! Entry subsystem for ordex
//!
//! The unit of storage: a key/value pair plus the machinery that lets one
//! entry live in several orderings at once.
//!
//! # Design Principles
//!
//! - Single owner: all entries live in one arena; index lanes and the key
//!   table hold slot ids, never owning references
//! - Stable handles: ids are generation-checked, so deleting an entry
//!   invalidates it in every index simultaneously
//! - No silent reuse: a stale id fails lookup instead of reading the slot's
//!   next occupant

mod arena;
mod handle;
mod record;

pub(crate) use arena::Arena;
pub use arena::EntryId;
pub use handle::EntryHandle;
pub use record::Entry;
