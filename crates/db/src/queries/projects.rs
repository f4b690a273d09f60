// crates/db/src/queries/projects.rs
// Project rows: creation and tenant-scoped reads. A project carries no stored
// status of its own; callers derive it from the phase list.

use chrono::Utc;
use uuid::Uuid;

use phasewire_types::Project;

use super::row_types::ProjectRow;
use crate::{Database, StoreError, StoreResult};

/// Input for project creation. The authorization layer has already resolved
/// both tenant ids by the time this reaches the store.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub agency_id: String,
    pub client_id: String,
    pub name: String,
    pub description: Option<String>,
    pub document_path: Option<String>,
}

impl Database {
    pub async fn create_project(&self, input: NewProject) -> StoreResult<Project> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("project name is required".into()));
        }

        let project = Project {
            id: Uuid::new_v4().to_string(),
            agency_id: input.agency_id,
            client_id: input.client_id,
            name: name.to_string(),
            description: input.description,
            document_path: input.document_path,
            created_at: Utc::now().timestamp(),
        };

        sqlx::query(
            r#"
            INSERT INTO projects (id, agency_id, client_id, name, description, document_path, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&project.id)
        .bind(&project.agency_id)
        .bind(&project.client_id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.document_path)
        .bind(project.created_at)
        .execute(self.pool())
        .await?;

        Ok(project)
    }

    pub async fn get_project(&self, project_id: &str) -> StoreResult<Project> {
        let row: Option<ProjectRow> = sqlx::query_as(
            "SELECT id, agency_id, client_id, name, description, document_path, created_at
             FROM projects WHERE id = ?1",
        )
        .bind(project_id)
        .fetch_optional(self.pool())
        .await?;

        row.map(Project::from)
            .ok_or_else(|| StoreError::NotFound(format!("project {project_id}")))
    }

    /// All projects owned by one agency, newest first.
    pub async fn list_projects_for_agency(&self, agency_id: &str) -> StoreResult<Vec<Project>> {
        let rows: Vec<ProjectRow> = sqlx::query_as(
            "SELECT id, agency_id, client_id, name, description, document_path, created_at
             FROM projects WHERE agency_id = ?1 ORDER BY created_at DESC",
        )
        .bind(agency_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    /// All projects visible to one client through the portal, newest first.
    pub async fn list_projects_for_client(&self, client_id: &str) -> StoreResult<Vec<Project>> {
        let rows: Vec<ProjectRow> = sqlx::query_as(
            "SELECT id, agency_id, client_id, name, description, document_path, created_at
             FROM projects WHERE client_id = ?1 ORDER BY created_at DESC",
        )
        .bind(client_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Project::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_project(name: &str) -> NewProject {
        NewProject {
            agency_id: "agency-1".into(),
            client_id: "client-1".into(),
            name: name.into(),
            description: Some("Website redesign".into()),
            document_path: None,
        }
    }

    #[tokio::test]
    async fn create_and_get_round_trip() {
        let db = Database::new_in_memory().await.unwrap();
        let created = db.create_project(new_project("Acme relaunch")).await.unwrap();
        let fetched = db.get_project(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let db = Database::new_in_memory().await.unwrap();
        let err = db.create_project(new_project("   ")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_project_is_not_found() {
        let db = Database::new_in_memory().await.unwrap();
        let err = db.get_project("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn listings_are_tenant_scoped() {
        let db = Database::new_in_memory().await.unwrap();
        db.create_project(new_project("A")).await.unwrap();
        let mut other = new_project("B");
        other.agency_id = "agency-2".into();
        other.client_id = "client-2".into();
        db.create_project(other).await.unwrap();

        let agency_1 = db.list_projects_for_agency("agency-1").await.unwrap();
        assert_eq!(agency_1.len(), 1);
        assert_eq!(agency_1[0].name, "A");

        let client_2 = db.list_projects_for_client("client-2").await.unwrap();
        assert_eq!(client_2.len(), 1);
        assert_eq!(client_2[0].name, "B");
    }
}
