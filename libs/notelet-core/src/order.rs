//! Fractional order keys for blocks.
//!
//! Insertion never shifts siblings: a new key is the midpoint of its
//! neighbors, or a fixed gap past the tail. Repeated midpoint
//! insertion between the same two neighbors halves the remaining gap
//! each time, so precision runs out after a few thousand insertions
//! into the same slot; `gap_exhausted` lets callers detect that and
//! fall back to a full renumbering pass.

/// Spacing between consecutive keys after an append or renumbering.
pub const ORDER_GAP: f64 = 1024.0;

/// Order key for a block inserted after `prev` and before `next`.
/// No predecessor means head-of-empty-page, no successor means tail.
pub fn insert_between(prev: Option<f64>, next: Option<f64>) -> f64 {
    match (prev, next) {
        (Some(prev), Some(next)) => (prev + next) / 2.0,
        (Some(prev), None) => prev + ORDER_GAP,
        (None, Some(next)) => next / 2.0,
        (None, None) => ORDER_GAP,
    }
}

/// Tail append: one gap past the last key, or the first gap on an
/// empty page.
pub fn append_after(last: Option<f64>) -> f64 {
    last.map_or(ORDER_GAP, |order| order + ORDER_GAP)
}

/// True when the midpoint of two keys is numerically indistinguishable
/// from either neighbor, i.e. float precision between them is spent.
pub fn gap_exhausted(prev: f64, next: f64) -> bool {
    let mid = (prev + next) / 2.0;
    mid <= prev || mid >= next
}

/// Full renumbering: `(index + 1) * GAP` for every sibling in the new
/// visual sequence. A deliberate simplification over midpoint juggling
/// for reorders -- pages are small and drag-and-drop is rare, so a
/// full rewrite buys correctness cheaply.
pub fn renumbered(len: usize) -> impl Iterator<Item = f64> {
    (0..len).map(|index| (index + 1) as f64 * ORDER_GAP)
}
