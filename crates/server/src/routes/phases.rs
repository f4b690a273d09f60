// crates/server/src/routes/phases.rs
//! Phase lifecycle endpoints.
//!
//! Every mutation follows the same shape: commit through the store, then
//! publish one feed event per affected row. The feed publish happens only
//! after the commit succeeds, so subscribers never see a row that rolled
//! back.
//!
//! - `POST   /projects/{id}/phases`               - Create one phase at the end
//! - `POST   /projects/{id}/phases/seed`          - Bulk-create from an extraction
//! - `GET    /projects/{id}/phases`               - Snapshot with derived progress
//! - `PUT    /projects/{id}/phases/order`         - Persist a full permutation
//! - `POST   /projects/{id}/phases/{phase_id}/move` - Index-to-index drag gesture
//! - `PATCH  /phases/{id}`                        - Edit name/description
//! - `PUT    /phases/{id}/status`                 - Set status
//! - `DELETE /phases/{id}`                        - Delete and re-pack positions

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use phasewire_core::{move_item, summarize, OrderingError, ProgressSummary};
use phasewire_types::{ExtractedPhase, Phase, PhaseEvent, PhaseStatus};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePhaseRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedPhasesRequest {
    pub phases: Vec<ExtractedPhase>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePhaseRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: PhaseStatus,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MovePhaseRequest {
    pub to: usize,
}

/// Snapshot of a project's phases plus the progress derived from them.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../web/src/types/generated/")]
#[cfg_attr(test, derive(serde::Deserialize))]
#[serde(rename_all = "camelCase")]
pub struct PhasesSnapshot {
    pub phases: Vec<Phase>,
    pub progress: ProgressSummary,
}

/// GET /api/projects/{id}/phases - Ordered snapshot with derived progress.
pub async fn get_phases(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<PhasesSnapshot>> {
    state.db.get_project(&project_id).await?;
    let phases = state.db.list_phases(&project_id).await?;
    let progress = summarize(&phases);
    Ok(Json(PhasesSnapshot { phases, progress }))
}

/// POST /api/projects/{id}/phases - Append one phase to the sequence.
pub async fn create_phase(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    Json(req): Json<CreatePhaseRequest>,
) -> ApiResult<(StatusCode, Json<Phase>)> {
    let phase = state
        .db
        .create_phase(&project_id, &req.name, req.description.as_deref())
        .await?;
    state
        .feed
        .publish(PhaseEvent::Inserted {
            phase: phase.clone(),
        })
        .await;
    Ok((StatusCode::CREATED, Json(phase)))
}

/// POST /api/projects/{id}/phases/seed - Bulk-create phases in document
/// order, all-or-nothing. One `Inserted` event per created row, in order.
pub async fn seed_phases(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    Json(req): Json<SeedPhasesRequest>,
) -> ApiResult<(StatusCode, Json<Vec<Phase>>)> {
    let phases = state.db.create_phases_bulk(&project_id, &req.phases).await?;
    for phase in &phases {
        state
            .feed
            .publish(PhaseEvent::Inserted {
                phase: phase.clone(),
            })
            .await;
    }
    Ok((StatusCode::CREATED, Json(phases)))
}

/// PATCH /api/phases/{id} - Edit name and/or description.
pub async fn update_phase(
    State(state): State<Arc<AppState>>,
    Path(phase_id): Path<String>,
    Json(req): Json<UpdatePhaseRequest>,
) -> ApiResult<Json<Phase>> {
    let phase = state
        .db
        .update_phase_content(&phase_id, req.name.as_deref(), req.description.as_deref())
        .await?;
    state
        .feed
        .publish(PhaseEvent::Updated {
            phase: phase.clone(),
        })
        .await;
    Ok(Json(phase))
}

/// PUT /api/phases/{id}/status - Set the status (any value, from any value).
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(phase_id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<Phase>> {
    let phase = state.db.update_phase_status(&phase_id, req.status).await?;
    state
        .feed
        .publish(PhaseEvent::Updated {
            phase: phase.clone(),
        })
        .await;
    Ok(Json(phase))
}

/// DELETE /api/phases/{id} - Delete one phase and re-pack what follows.
///
/// Emits `Deleted` for the removed row, then `Updated` for each row whose
/// position shifted down.
pub async fn delete_phase(
    State(state): State<Arc<AppState>>,
    Path(phase_id): Path<String>,
) -> ApiResult<StatusCode> {
    let (deleted, shifted) = state.db.delete_phase(&phase_id).await?;
    state
        .feed
        .publish(PhaseEvent::Deleted {
            id: deleted.id,
            project_id: deleted.project_id,
        })
        .await;
    for phase in shifted {
        state.feed.publish(PhaseEvent::Updated { phase }).await;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/projects/{id}/phases/order - Persist a full permutation.
///
/// A reorder is not one event on the wire: each row lands on subscribers as
/// an independent `Updated`, and viewers re-sort after each one.
pub async fn reorder_phases(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    Json(req): Json<ReorderRequest>,
) -> ApiResult<Json<Vec<Phase>>> {
    let phases = state.db.reorder_phases(&project_id, &req.ids).await?;
    for phase in &phases {
        state
            .feed
            .publish(PhaseEvent::Updated {
                phase: phase.clone(),
            })
            .await;
    }
    Ok(Json(phases))
}

/// POST /api/projects/{id}/phases/{phase_id}/move - Drag gesture: move one
/// phase to a target index, computed against the current stored order.
pub async fn move_phase(
    State(state): State<Arc<AppState>>,
    Path((project_id, phase_id)): Path<(String, String)>,
    Json(req): Json<MovePhaseRequest>,
) -> ApiResult<Json<Vec<Phase>>> {
    state.db.get_project(&project_id).await?;
    let current = state.db.list_phases(&project_id).await?;
    let ids: Vec<String> = current.iter().map(|p| p.id.clone()).collect();
    let from = ids
        .iter()
        .position(|id| *id == phase_id)
        .ok_or_else(|| ApiError::NotFound(format!("phase {phase_id}")))?;

    let next = move_item(&ids, from, req.to).map_err(|err| match err {
        OrderingError::OutOfBounds { .. } => ApiError::BadRequest(err.to_string()),
    })?;

    let phases = state.db.reorder_phases(&project_id, &next).await?;
    for phase in &phases {
        state
            .feed
            .publish(PhaseEvent::Updated {
                phase: phase.clone(),
            })
            .await;
    }
    Ok(Json(phases))
}

/// Create the phases routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/projects/{id}/phases",
            get(get_phases).post(create_phase),
        )
        .route("/projects/{id}/phases/seed", post(seed_phases))
        .route("/projects/{id}/phases/order", put(reorder_phases))
        .route("/projects/{id}/phases/{phase_id}/move", post(move_phase))
        .route("/phases/{id}", patch(update_phase).delete(delete_phase))
        .route("/phases/{id}/status", put(update_status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_request_uses_snake_case_values() {
        let req: UpdateStatusRequest =
            serde_json::from_str(r#"{"status":"in_progress"}"#).unwrap();
        assert_eq!(req.status, PhaseStatus::InProgress);

        let err = serde_json::from_str::<UpdateStatusRequest>(r#"{"status":"cancelled"}"#);
        assert!(err.is_err(), "values outside the closed set must not parse");
    }

    #[test]
    fn test_snapshot_serializes_progress_inline() {
        let snapshot = PhasesSnapshot {
            phases: vec![],
            progress: summarize(&[]),
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"phases\":[]"));
        assert!(json.contains("\"progress\":0"));
        assert!(json.contains("\"label\":\"no_phases\""));
    }
}
