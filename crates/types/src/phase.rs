// crates/types/src/phase.rs
//! The phase row and its closed status set.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Status of a single phase.
///
/// Intentionally a *total* state machine: any status may be assigned from any
/// prior status (the agency UI exposes all three as freely selectable).
/// Forward-only transitions would be a product decision, not a data rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/types/generated/")]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Pending,
    InProgress,
    Completed,
}

impl PhaseStatus {
    /// Stable string form, matching the `phases.status` column values.
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseStatus::Pending => "pending",
            PhaseStatus::InProgress => "in_progress",
            PhaseStatus::Completed => "completed",
        }
    }

    /// Parse the column value back. Returns `None` for anything outside the
    /// closed set (the schema CHECK constraint makes that unreachable).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PhaseStatus::Pending),
            "in_progress" => Some(PhaseStatus::InProgress),
            "completed" => Some(PhaseStatus::Completed),
            _ => None,
        }
    }
}

/// One ordered step of a project's delivery plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: String,
    /// Immutable after creation.
    pub project_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: PhaseStatus,
    /// Dense 1-based position within the project's sequence. After any
    /// committed mutation the positions of a project's phases are exactly
    /// `1..=N`.
    pub position: i64,
    /// Unix seconds.
    pub created_at: i64,
    pub updated_at: i64,
}

/// One entry of a document-extraction result, consumed in order as the bulk
/// phase-seed input for a new project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ExtractedPhase {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
