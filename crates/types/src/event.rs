// crates/types/src/event.rs
//! Row-level change feed events, scoped to one project.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::phase::Phase;

/// One committed row change on the `phases` table.
///
/// A whole-project reorder is not a single event: it surfaces as one
/// `Updated` per affected row, so receivers must apply events idempotently
/// and re-sort after every insert/update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/types/generated/")]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhaseEvent {
    Inserted { phase: Phase },
    Updated { phase: Phase },
    Deleted { id: String, project_id: String },
}

impl PhaseEvent {
    /// Id of the phase the event refers to.
    pub fn phase_id(&self) -> &str {
        match self {
            PhaseEvent::Inserted { phase } | PhaseEvent::Updated { phase } => &phase.id,
            PhaseEvent::Deleted { id, .. } => id,
        }
    }

    /// Project the event is scoped to.
    pub fn project_id(&self) -> &str {
        match self {
            PhaseEvent::Inserted { phase } | PhaseEvent::Updated { phase } => &phase.project_id,
            PhaseEvent::Deleted { project_id, .. } => project_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::PhaseStatus;

    fn phase() -> Phase {
        Phase {
            id: "ph-1".into(),
            project_id: "pr-1".into(),
            name: "Build".into(),
            description: None,
            status: PhaseStatus::Pending,
            position: 1,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn events_are_internally_tagged() {
        let json = serde_json::to_value(PhaseEvent::Inserted { phase: phase() }).unwrap();
        assert_eq!(json["type"], "inserted");
        assert_eq!(json["phase"]["id"], "ph-1");

        let json = serde_json::to_value(PhaseEvent::Deleted {
            id: "ph-1".into(),
            project_id: "pr-1".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "deleted");
        assert_eq!(json["id"], "ph-1");
    }

    #[test]
    fn accessors_cover_all_variants() {
        let ev = PhaseEvent::Updated { phase: phase() };
        assert_eq!(ev.phase_id(), "ph-1");
        assert_eq!(ev.project_id(), "pr-1");

        let ev = PhaseEvent::Deleted {
            id: "x".into(),
            project_id: "y".into(),
        };
        assert_eq!(ev.phase_id(), "x");
        assert_eq!(ev.project_id(), "y");
    }
}
