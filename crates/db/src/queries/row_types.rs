// crates/db/src/queries/row_types.rs
// sqlx row structs and their conversions to wire types.

use phasewire_types::{Phase, PhaseStatus, Project};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub(crate) struct PhaseRow {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub position: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<PhaseRow> for Phase {
    fn from(row: PhaseRow) -> Self {
        Phase {
            id: row.id,
            project_id: row.project_id,
            name: row.name,
            description: row.description,
            // The schema CHECK pins the column to the closed set.
            status: PhaseStatus::parse(&row.status).unwrap_or(PhaseStatus::Pending),
            position: row.position,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ProjectRow {
    pub id: String,
    pub agency_id: String,
    pub client_id: String,
    pub name: String,
    pub description: Option<String>,
    pub document_path: Option<String>,
    pub created_at: i64,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            agency_id: row.agency_id,
            client_id: row.client_id,
            name: row.name,
            description: row.description,
            document_path: row.document_path,
            created_at: row.created_at,
        }
    }
}
