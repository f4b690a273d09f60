// crates/core/src/projection.rs
//! Viewer-side live projection: a session-local phase list derived from an
//! initial snapshot plus every change-feed event received since.
//!
//! The transport is at-least-once and does not sequence events across
//! distinct rows, so application must be idempotent and order-tolerant:
//! duplicate inserts are no-ops, updates replace by id, and an update or
//! delete for an unknown id is silently ignored. The list is re-sorted by
//! position after every insert/update — a reorder arrives as N independent
//! row updates and converges once they have all been applied.

use phasewire_types::{Phase, PhaseEvent};

use crate::progress::{summarize, ProgressSummary};

/// Per-session, always-sorted copy of one project's phase list.
#[derive(Debug, Clone, Default)]
pub struct PhaseProjection {
    phases: Vec<Phase>,
}

impl PhaseProjection {
    /// Build from the initial snapshot fetch.
    pub fn new(snapshot: Vec<Phase>) -> Self {
        let mut projection = Self { phases: snapshot };
        projection.sort();
        projection
    }

    /// Replace the whole list, e.g. after a subscription gap when the session
    /// refetches the snapshot instead of trusting its stale copy.
    pub fn replace(&mut self, snapshot: Vec<Phase>) {
        self.phases = snapshot;
        self.sort();
    }

    /// Apply one feed event. Safe to call with duplicates or with events for
    /// rows this session has never seen.
    pub fn apply(&mut self, event: &PhaseEvent) {
        match event {
            PhaseEvent::Inserted { phase } => {
                if self.phases.iter().any(|p| p.id == phase.id) {
                    return;
                }
                self.phases.push(phase.clone());
                self.sort();
            }
            PhaseEvent::Updated { phase } => {
                let Some(existing) = self.phases.iter_mut().find(|p| p.id == phase.id) else {
                    return;
                };
                *existing = phase.clone();
                self.sort();
            }
            PhaseEvent::Deleted { id, .. } => {
                self.phases.retain(|p| p.id != *id);
            }
        }
    }

    /// Ascending by position.
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Derived progress, recomputed from the current list on every call.
    pub fn summary(&self) -> ProgressSummary {
        summarize(&self.phases)
    }

    fn sort(&mut self) {
        self.phases.sort_by_key(|p| p.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasewire_types::PhaseStatus;
    use pretty_assertions::assert_eq;

    fn phase(id: &str, position: i64) -> Phase {
        Phase {
            id: id.into(),
            project_id: "pr-1".into(),
            name: format!("Phase {id}"),
            description: None,
            status: PhaseStatus::Pending,
            position,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn order(projection: &PhaseProjection) -> Vec<&str> {
        projection.phases().iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn snapshot_is_sorted_on_construction() {
        let projection = PhaseProjection::new(vec![phase("c", 3), phase("a", 1), phase("b", 2)]);
        assert_eq!(order(&projection), vec!["a", "b", "c"]);
    }

    #[test]
    fn duplicate_insert_is_a_no_op() {
        let mut projection = PhaseProjection::new(vec![phase("a", 1)]);
        let ev = PhaseEvent::Inserted { phase: phase("a", 1) };
        projection.apply(&ev);
        projection.apply(&ev);
        assert_eq!(projection.len(), 1);
    }

    #[test]
    fn insert_lands_in_position_order() {
        let mut projection = PhaseProjection::new(vec![phase("a", 1), phase("c", 3)]);
        projection.apply(&PhaseEvent::Inserted { phase: phase("b", 2) });
        assert_eq!(order(&projection), vec!["a", "b", "c"]);
    }

    #[test]
    fn update_for_unknown_id_is_a_no_op() {
        let mut projection = PhaseProjection::new(vec![phase("a", 1)]);
        projection.apply(&PhaseEvent::Updated { phase: phase("ghost", 9) });
        assert_eq!(order(&projection), vec!["a"]);
    }

    #[test]
    fn delete_for_unknown_id_is_a_no_op() {
        let mut projection = PhaseProjection::new(vec![phase("a", 1)]);
        projection.apply(&PhaseEvent::Deleted {
            id: "ghost".into(),
            project_id: "pr-1".into(),
        });
        assert_eq!(projection.len(), 1);
    }

    #[test]
    fn reorder_converges_from_per_row_updates_in_any_order() {
        // Server-side move of "a" to index 2: a->3, b->1, c->2. The feed may
        // deliver the three row updates in any interleaving.
        let snapshot = vec![phase("a", 1), phase("b", 2), phase("c", 3)];
        let updates = [
            PhaseEvent::Updated { phase: phase("a", 3) },
            PhaseEvent::Updated { phase: phase("b", 1) },
            PhaseEvent::Updated { phase: phase("c", 2) },
        ];

        // All 6 permutations of 3 events.
        for perm in [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ] {
            let mut projection = PhaseProjection::new(snapshot.clone());
            for i in perm {
                projection.apply(&updates[i]);
            }
            assert_eq!(order(&projection), vec!["b", "c", "a"], "perm {perm:?}");
        }
    }

    #[test]
    fn duplicate_update_delivery_is_idempotent() {
        let mut projection = PhaseProjection::new(vec![phase("a", 1), phase("b", 2)]);
        let mut updated = phase("a", 1);
        updated.status = PhaseStatus::Completed;
        let ev = PhaseEvent::Updated { phase: updated };
        projection.apply(&ev);
        let after_once = projection.summary();
        projection.apply(&ev);
        assert_eq!(projection.summary(), after_once);
        assert_eq!(projection.summary().progress, 50);
    }

    #[test]
    fn summary_tracks_applied_events() {
        let mut projection = PhaseProjection::new(vec![phase("a", 1), phase("b", 2), phase("c", 3)]);
        assert_eq!(projection.summary().progress, 0);

        let mut done = phase("a", 1);
        done.status = PhaseStatus::Completed;
        projection.apply(&PhaseEvent::Updated { phase: done });
        assert_eq!(projection.summary().progress, 33);

        projection.apply(&PhaseEvent::Deleted {
            id: "b".into(),
            project_id: "pr-1".into(),
        });
        assert_eq!(projection.summary().progress, 50);
    }

    #[test]
    fn replace_resets_the_whole_list() {
        let mut projection = PhaseProjection::new(vec![phase("a", 1)]);
        projection.replace(vec![phase("z", 2), phase("y", 1)]);
        assert_eq!(order(&projection), vec!["y", "z"]);
    }
}
