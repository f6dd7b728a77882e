//! Sort engine for ordex
//!
//! Two algorithms over one index lane, both assuming the lane is sorted
//! everywhere except possibly at the node just touched:
//!
//! - **Incremental fixup**: walk forward from the node while the comparator
//!   orders it after its successor; relocate it immediately before the first
//!   successor it does not exceed, or to the tail. O(k) in the distance
//!   travelled.
//! - **Full resort**: front-to-back fixup passes repeated until a pass
//!   makes no move. O(n) comparisons when the lane was nearly sorted (the
//!   common case), O(n²) worst case.
//!
//! A resort memoizes comparison results per unordered slot pair, so the
//! comparator is evaluated at most once per pair per call. Comparator
//! consistency is the caller's obligation; the memo pins the pairwise
//! relation for the duration of the resort, which both bounds the work a
//! misbehaving comparator can cause and guarantees the pass loop reaches a
//! fixpoint.
//!
//! After a structural change the per-secondary-index passes are dispatched
//! as a fork-join over scoped threads while the writer still holds the
//! exclusive lock: each task mutates only its own lane and shares a
//! read-only view of the arena. The default index is never touched here.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::thread;

use tracing::trace;

use crate::entry::Arena;
use crate::index::{Comparator, Index, IndexKey};
use crate::trace::{emit, TraceEvent, TraceHook};

/// Per-pass comparison memo, keyed by normalized (low, high) slot pair and
/// holding the ordering of low against high.
type CmpCache = HashMap<(u32, u32), Ordering>;

/// Incrementally repositions `slot`, assuming the rest of the lane is
/// sorted. Used after a single fresh insertion.
pub(crate) fn fixup<K, D>(
    index: &mut Index<K, D>,
    arena: &Arena<K, D>,
    slot: u32,
    hook: Option<&TraceHook<K>>,
) {
    fixup_pass(index, arena, slot, &mut None, hook);
}

/// Fully re-sorts the lane: front-to-back fixup passes repeated until a
/// pass makes no move. A fixup only carries nodes toward the tail, so a
/// node that must travel frontward is handled by the following pass, when
/// its predecessors bubble past it.
///
/// The comparison memo spans the whole call: every relocation strictly
/// reduces inversions against the memoized pairwise relation, so the
/// fixpoint is reached even when the comparator itself misbehaves. On an
/// already-sorted lane the first pass makes no move and the confirming
/// walk costs one comparison per adjacent pair.
pub(crate) fn resort<K, D>(
    index: &mut Index<K, D>,
    arena: &Arena<K, D>,
    hook: Option<&TraceHook<K>>,
) {
    if index.comparator().is_none() {
        return;
    }
    let mut cache = Some(CmpCache::new());
    let mut passes = 0usize;
    loop {
        passes += 1;
        let mut moved = false;
        let mut cur = index.head();
        while let Some(slot) = cur {
            let next = index.next_of(slot);
            moved |= fixup_pass(index, arena, slot, &mut cache, hook);
            cur = next;
        }
        if !moved {
            break;
        }
    }
    trace!(index = %index.id(), len = index.len(), passes, "resort complete");
}

/// Runs `fixup` for the freshly inserted `slot` on every secondary lane,
/// forked and joined under the caller's write lock.
pub(crate) fn fixup_all<K: Sync, D: Sync>(
    secondary: &mut [Index<K, D>],
    arena: &Arena<K, D>,
    slot: u32,
    hook: Option<&TraceHook<K>>,
) {
    fan_out(secondary, |index| fixup(index, arena, slot, hook));
}

/// Runs `resort` on every secondary lane, forked and joined under the
/// caller's write lock.
pub(crate) fn resort_all<K: Sync, D: Sync>(
    secondary: &mut [Index<K, D>],
    arena: &Arena<K, D>,
    hook: Option<&TraceHook<K>>,
) {
    fan_out(secondary, |index| resort(index, arena, hook));
}

/// Fork-join dispatch over independent lanes. A single lane runs inline;
/// nothing is spawned for a map without secondary indexes.
fn fan_out<K, D, F>(secondary: &mut [Index<K, D>], f: F)
where
    F: Fn(&mut Index<K, D>) + Sync,
{
    match secondary {
        [] => {}
        [index] => f(index),
        _ => {
            let f = &f;
            thread::scope(|scope| {
                for index in secondary.iter_mut() {
                    scope.spawn(move || f(index));
                }
            });
        }
    }
}

/// One incremental fixup of `slot`. Returns true when the node was
/// relocated.
fn fixup_pass<K, D>(
    index: &mut Index<K, D>,
    arena: &Arena<K, D>,
    slot: u32,
    cache: &mut Option<CmpCache>,
    hook: Option<&TraceHook<K>>,
) -> bool {
    let Some(cmp) = index.comparator().cloned() else {
        return false;
    };
    let id = index.id().clone();

    let mut displaced = false;
    let mut cur = index.next_of(slot);
    while let Some(succ) = cur {
        let Some(ord) = compare(&cmp, arena, &id, slot, succ, cache, hook) else {
            break;
        };
        if ord == Ordering::Greater {
            // The node belongs further back; keep walking.
            displaced = true;
            cur = index.next_of(succ);
            continue;
        }
        if displaced {
            index.move_before(slot, succ);
            emit_move(arena, &id, slot, Some(succ), hook);
        }
        return displaced;
    }
    if displaced {
        index.move_to_back(slot);
        emit_move(arena, &id, slot, None, hook);
    }
    displaced
}

/// Evaluates the comparator for a slot pair, reusing this pass's memoized
/// result when the pair was already compared.
fn compare<K, D>(
    cmp: &Comparator<K, D>,
    arena: &Arena<K, D>,
    index_id: &IndexKey,
    a: u32,
    b: u32,
    cache: &mut Option<CmpCache>,
    hook: Option<&TraceHook<K>>,
) -> Option<Ordering> {
    let ea = arena.slot_entry(a)?;
    let eb = arena.slot_entry(b)?;

    if let Some(cache) = cache {
        let (key, flipped) = if a <= b { ((a, b), false) } else { ((b, a), true) };
        if let Some(&ord) = cache.get(&key) {
            emit(
                hook,
                TraceEvent::Skip {
                    index: index_id,
                    moved: ea.key(),
                    against: eb.key(),
                },
            );
            return Some(if flipped { ord.reverse() } else { ord });
        }
        emit(
            hook,
            TraceEvent::Compare {
                index: index_id,
                moved: ea.key(),
                against: eb.key(),
            },
        );
        let ord = cmp(ea, eb);
        cache.insert(key, if flipped { ord.reverse() } else { ord });
        return Some(ord);
    }

    emit(
        hook,
        TraceEvent::Compare {
            index: index_id,
            moved: ea.key(),
            against: eb.key(),
        },
    );
    Some(cmp(ea, eb))
}

fn emit_move<K, D>(
    arena: &Arena<K, D>,
    index_id: &IndexKey,
    slot: u32,
    before: Option<u32>,
    hook: Option<&TraceHook<K>>,
) {
    if hook.is_none() {
        return;
    }
    let Some(moved) = arena.slot_entry(slot) else {
        return;
    };
    let before = before.and_then(|s| arena.slot_entry(s)).map(|e| e.key());
    emit(
        hook,
        TraceEvent::Move {
            index: index_id,
            moved: moved.key(),
            before,
        },
    );
}
