//! Index subsystem for ordex
//!
//! An index is one named total ordering over the map's entries: the
//! always-present default (manual) order, plus any number of
//! comparator-sorted secondary orders.
//!
//! # Design Principles
//!
//! - One capability per index: a three-way comparator closure, not a type
//!   hierarchy
//! - Lanes order, never own: each index holds a link table over arena
//!   slots; entries belong to the arena
//! - Fixed index set: indexes exist for the map's whole lifetime, created
//!   only at construction
//!
//! # Invariants
//!
//! - Exactly one index (the default) has no comparator
//! - Every lane contains exactly the live entry set (bijection with the
//!   key table)
//! - Secondary lanes are sorted after every completed write

mod comparator;
mod key;
mod lane;

pub use comparator::{by_key, by_value, Comparator, IndexSpec};
pub use key::IndexKey;
pub(crate) use lane::Index;
