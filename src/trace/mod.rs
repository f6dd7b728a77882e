//! Sort-engine observability for ordex
//!
//! Replaces the process-wide debug-print flag of classic implementations
//! with a per-map observer: an optional callback supplied at construction
//! that receives structured events from the sort engine. The hook runs
//! inside the write lock, so it must be fast and must not call back into
//! the map.

use std::sync::Arc;

use crate::index::IndexKey;

/// One structured event emitted while a secondary index is being sorted.
///
/// Events borrow the entry keys involved; consume them inside the callback.
#[derive(Debug)]
pub enum TraceEvent<'a, K> {
    /// The comparator was evaluated for `moved` against `against`.
    Compare {
        index: &'a IndexKey,
        moved: &'a K,
        against: &'a K,
    },
    /// `moved` was relocated to immediately precede `before`, or to the
    /// tail when `before` is `None`.
    Move {
        index: &'a IndexKey,
        moved: &'a K,
        before: Option<&'a K>,
    },
    /// A pair's cached comparison result was reused instead of calling the
    /// comparator again this pass.
    Skip {
        index: &'a IndexKey,
        moved: &'a K,
        against: &'a K,
    },
}

/// Observer callback invoked by the sort engine.
pub type TraceHook<K> = Arc<dyn Fn(TraceEvent<'_, K>) + Send + Sync>;

/// Invokes the hook when one is installed.
pub(crate) fn emit<K>(hook: Option<&TraceHook<K>>, event: TraceEvent<'_, K>) {
    if let Some(hook) = hook {
        hook(event);
    }
}
