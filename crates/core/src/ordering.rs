// crates/core/src/ordering.rs
//! Phase ordering engine.
//!
//! Translates the two gestures that change a project's sequence — a
//! drag-and-drop "move from index A to index B" and a deletion — into the
//! full id permutation the store persists as one atomic batch. Persisted
//! positions are always `index + 1`, so the output of these functions keeps
//! the dense `1..=N` invariant by construction.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderingError {
    #[error("index {index} out of bounds for {len} phases")]
    OutOfBounds { index: usize, len: usize },
}

/// Standard array move: remove the element at `from` and reinsert it at `to`.
///
/// Elements between the two indices shift by one; `from == to` is the
/// identity permutation. Both indices refer to the *current* list, matching
/// dnd-kit's `arrayMove` semantics on the portal side.
pub fn move_item(ids: &[String], from: usize, to: usize) -> Result<Vec<String>, OrderingError> {
    let len = ids.len();
    if from >= len {
        return Err(OrderingError::OutOfBounds { index: from, len });
    }
    if to >= len {
        return Err(OrderingError::OutOfBounds { index: to, len });
    }

    let mut next = ids.to_vec();
    let moved = next.remove(from);
    next.insert(to, moved);
    Ok(next)
}

/// Re-pack after a delete: drop `removed` from the sequence, keeping every
/// remaining element in its relative order. The caller renumbers positions to
/// `1..=N-1` from the returned list.
pub fn remove_item(ids: &[String], removed: &str) -> Vec<String> {
    ids.iter().filter(|id| *id != removed).cloned().collect()
}
