//! ordex - A concurrency-safe ordered map with multiple simultaneous
//! orderings
//!
//! An [`OrderedMap`] stores key/value entries reachable three ways at once:
//! by key in O(1) average time, front-to-back or back-to-front in a manual
//! "default" order (normally insertion order, adjustable by explicit move
//! operations), and in any number of secondary orders each kept sorted by a
//! user-supplied comparator. A single reader/writer lock makes concurrent
//! readers and a single writer safe; secondary indexes are re-sorted in
//! parallel before a write returns.
//!
//! [`Cache`] builds a bounded, LRU-style store on top of the default order.

pub mod cache;
pub mod entry;
pub mod index;
pub mod map;
pub mod trace;

mod sort;

pub use cache::Cache;
pub use entry::{Entry, EntryHandle, EntryId};
pub use index::{by_key, by_value, Comparator, IndexKey, IndexSpec};
pub use map::{MapError, MapResult, OrderedMap, Pair, Records};
pub use trace::{TraceEvent, TraceHook};
