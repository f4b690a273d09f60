// crates/core/src/progress.rs
//! Progress aggregation: display-ready statistics derived from a phase
//! collection. Always recomputed, never persisted — there is no cached
//! progress column anywhere, so the phase list stays the single source of
//! truth.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use phasewire_types::{Phase, PhaseStatus};

/// Per-status phase counts for one project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub pending: u32,
    pub in_progress: u32,
    pub completed: u32,
}

impl StatusCounts {
    pub fn total(&self) -> u32 {
        self.pending + self.in_progress + self.completed
    }
}

/// Derived project-level status shown on portal cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/types/generated/")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatusLabel {
    NoPhases,
    Pending,
    InProgress,
    Completed,
}

impl std::fmt::Display for ProjectStatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProjectStatusLabel::NoPhases => "no phases",
            ProjectStatusLabel::Pending => "pending",
            ProjectStatusLabel::InProgress => "in progress",
            ProjectStatusLabel::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Everything a progress card needs, bundled for snapshot responses and
/// recomputed by viewers after every applied feed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    /// 0..=100.
    pub progress: u8,
    pub counts: StatusCounts,
    pub label: ProjectStatusLabel,
}

/// Completion percentage: `round(100 * completed / total)`, 0 when empty.
pub fn progress_pct(phases: &[Phase]) -> u8 {
    if phases.is_empty() {
        return 0;
    }
    let completed = phases
        .iter()
        .filter(|p| p.status == PhaseStatus::Completed)
        .count();
    (completed as f64 * 100.0 / phases.len() as f64).round() as u8
}

pub fn status_counts(phases: &[Phase]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for phase in phases {
        match phase.status {
            PhaseStatus::Pending => counts.pending += 1,
            PhaseStatus::InProgress => counts.in_progress += 1,
            PhaseStatus::Completed => counts.completed += 1,
        }
    }
    counts
}

/// Three-tier classification with a deliberate asymmetry: a project counts as
/// in progress as soon as *any* phase is in_progress or completed, so one
/// finished phase among pending ones reads "in progress", not "pending".
pub fn project_status(phases: &[Phase]) -> ProjectStatusLabel {
    if phases.is_empty() {
        return ProjectStatusLabel::NoPhases;
    }
    let counts = status_counts(phases);
    if counts.completed == counts.total() {
        ProjectStatusLabel::Completed
    } else if counts.in_progress > 0 || counts.completed > 0 {
        ProjectStatusLabel::InProgress
    } else {
        ProjectStatusLabel::Pending
    }
}

pub fn summarize(phases: &[Phase]) -> ProgressSummary {
    ProgressSummary {
        progress: progress_pct(phases),
        counts: status_counts(phases),
        label: project_status(phases),
    }
}
