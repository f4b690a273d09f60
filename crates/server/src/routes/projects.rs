// crates/server/src/routes/projects.rs
//! Project endpoints: creation and tenant-scoped listing.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use phasewire_types::Project;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub agency_id: String,
    pub client_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub document_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsQuery {
    #[serde(default)]
    pub agency_id: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

/// POST /api/projects - Create a project for an agency/client pair.
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = state
        .db
        .create_project(phasewire_db::NewProject {
            agency_id: req.agency_id,
            client_id: req.client_id,
            name: req.name,
            description: req.description,
            document_path: req.document_path,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/projects?agencyId=... | ?clientId=... - Tenant-scoped listing.
///
/// Exactly one tenant filter must be given: an agency sees the projects it
/// owns, a client sees the projects shared with it through the portal.
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListProjectsQuery>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = match (query.agency_id, query.client_id) {
        (Some(agency_id), None) => state.db.list_projects_for_agency(&agency_id).await?,
        (None, Some(client_id)) => state.db.list_projects_for_client(&client_id).await?,
        _ => {
            return Err(ApiError::BadRequest(
                "provide exactly one of agencyId or clientId".into(),
            ))
        }
    };
    Ok(Json(projects))
}

/// GET /api/projects/{id} - Fetch a single project.
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Project>> {
    let project = state.db.get_project(&id).await?;
    Ok(Json(project))
}

/// Create the projects routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/projects", post(create_project).get(list_projects))
        .route("/projects/{id}", get(get_project))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_minimal_body() {
        let req: CreateProjectRequest = serde_json::from_str(
            r#"{"agencyId":"agency-1","clientId":"client-1","name":"Acme relaunch"}"#,
        )
        .unwrap();
        assert_eq!(req.name, "Acme relaunch");
        assert!(req.description.is_none());
        assert!(req.document_path.is_none());
    }
}
