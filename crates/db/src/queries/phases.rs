// crates/db/src/queries/phases.rs
// Phase CRUD. Every multi-row mutation (bulk seed, delete + re-pack, reorder)
// runs inside one transaction: all rows commit or none do, and a project's
// positions are exactly 1..N after every committed call.

use std::collections::HashSet;

use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use phasewire_types::{ExtractedPhase, Phase, PhaseStatus};

use super::row_types::PhaseRow;
use crate::{Database, StoreError, StoreResult};

const PHASE_COLUMNS: &str =
    "id, project_id, name, description, status, position, created_at, updated_at";

fn validate_name(name: &str) -> StoreResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation("phase name is required".into()));
    }
    Ok(trimmed)
}

/// Empty descriptions are stored as NULL, not as empty strings.
fn normalize_description(description: Option<&str>) -> Option<&str> {
    description.map(str::trim).filter(|d| !d.is_empty())
}

async fn project_exists(conn: &mut SqliteConnection, project_id: &str) -> StoreResult<()> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM projects WHERE id = ?1")
        .bind(project_id)
        .fetch_optional(conn)
        .await?;
    if row.is_none() {
        return Err(StoreError::NotFound(format!("project {project_id}")));
    }
    Ok(())
}

async fn fetch_phase(conn: &mut SqliteConnection, phase_id: &str) -> StoreResult<Phase> {
    let row: Option<PhaseRow> = sqlx::query_as(&format!(
        "SELECT {PHASE_COLUMNS} FROM phases WHERE id = ?1"
    ))
    .bind(phase_id)
    .fetch_optional(conn)
    .await?;
    row.map(Phase::from)
        .ok_or_else(|| StoreError::NotFound(format!("phase {phase_id}")))
}

async fn fetch_phases_ordered(
    conn: &mut SqliteConnection,
    project_id: &str,
) -> StoreResult<Vec<Phase>> {
    let rows: Vec<PhaseRow> = sqlx::query_as(&format!(
        "SELECT {PHASE_COLUMNS} FROM phases WHERE project_id = ?1 ORDER BY position"
    ))
    .bind(project_id)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().map(Phase::from).collect())
}

async fn max_position(conn: &mut SqliteConnection, project_id: &str) -> StoreResult<i64> {
    let row: (i64,) =
        sqlx::query_as("SELECT COALESCE(MAX(position), 0) FROM phases WHERE project_id = ?1")
            .bind(project_id)
            .fetch_one(conn)
            .await?;
    Ok(row.0)
}

async fn insert_phase(conn: &mut SqliteConnection, phase: &Phase) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO phases (id, project_id, name, description, status, position, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&phase.id)
    .bind(&phase.project_id)
    .bind(&phase.name)
    .bind(&phase.description)
    .bind(phase.status.as_str())
    .bind(phase.position)
    .bind(phase.created_at)
    .bind(phase.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

impl Database {
    /// Ordered snapshot of one project's phases (the initial load every
    /// viewer session performs before subscribing to the feed).
    pub async fn list_phases(&self, project_id: &str) -> StoreResult<Vec<Phase>> {
        let mut conn = self.pool().acquire().await?;
        fetch_phases_ordered(&mut conn, project_id).await
    }

    /// Add one phase at the end of the sequence: position = current max + 1
    /// (1 on an empty project), status = pending.
    pub async fn create_phase(
        &self,
        project_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> StoreResult<Phase> {
        let name = validate_name(name)?;

        let mut tx = self.pool().begin().await?;
        project_exists(&mut tx, project_id).await?;
        let position = max_position(&mut tx, project_id).await? + 1;

        let now = Utc::now().timestamp();
        let phase = Phase {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            name: name.to_string(),
            description: normalize_description(description).map(String::from),
            status: PhaseStatus::Pending,
            position,
            created_at: now,
            updated_at: now,
        };
        insert_phase(&mut tx, &phase).await?;
        tx.commit().await?;

        Ok(phase)
    }

    /// Seed phases from an ordered extraction result, as one transaction:
    /// either every row is created or none are, so a failed seed never leaves
    /// a partially-populated project. Positions continue after the current
    /// max (1..K on the empty project a fresh extraction targets).
    ///
    /// Names are validated row by row inside the transaction; a bad row
    /// aborts and rolls back the whole batch.
    pub async fn create_phases_bulk(
        &self,
        project_id: &str,
        seed: &[ExtractedPhase],
    ) -> StoreResult<Vec<Phase>> {
        let mut tx = self.pool().begin().await?;
        project_exists(&mut tx, project_id).await?;
        let base = max_position(&mut tx, project_id).await?;

        let now = Utc::now().timestamp();
        let mut created = Vec::with_capacity(seed.len());
        for (i, entry) in seed.iter().enumerate() {
            let name = validate_name(&entry.name)?;
            let phase = Phase {
                id: Uuid::new_v4().to_string(),
                project_id: project_id.to_string(),
                name: name.to_string(),
                description: normalize_description(entry.description.as_deref())
                    .map(String::from),
                status: PhaseStatus::Pending,
                position: base + i as i64 + 1,
                created_at: now,
                updated_at: now,
            };
            insert_phase(&mut tx, &phase).await?;
            created.push(phase);
        }
        tx.commit().await?;

        Ok(created)
    }

    /// Edit name and/or description. `None` leaves a field unchanged; a
    /// provided name must be non-blank after trimming.
    pub async fn update_phase_content(
        &self,
        phase_id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> StoreResult<Phase> {
        let name = name.map(validate_name).transpose()?;

        let mut tx = self.pool().begin().await?;
        let mut phase = fetch_phase(&mut tx, phase_id).await?;

        if let Some(name) = name {
            phase.name = name.to_string();
        }
        if description.is_some() {
            phase.description = normalize_description(description).map(String::from);
        }
        phase.updated_at = Utc::now().timestamp();

        sqlx::query(
            "UPDATE phases SET name = ?1, description = ?2, updated_at = ?3 WHERE id = ?4",
        )
        .bind(&phase.name)
        .bind(&phase.description)
        .bind(phase.updated_at)
        .bind(phase_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(phase)
    }

    /// Set the status. Deliberately total: any value from the closed set is
    /// accepted from any prior value — the UI exposes all three as freely
    /// selectable, and nothing here enforces forward-only motion.
    pub async fn update_phase_status(
        &self,
        phase_id: &str,
        status: PhaseStatus,
    ) -> StoreResult<Phase> {
        let mut tx = self.pool().begin().await?;
        let mut phase = fetch_phase(&mut tx, phase_id).await?;

        phase.status = status;
        phase.updated_at = Utc::now().timestamp();

        sqlx::query("UPDATE phases SET status = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(status.as_str())
            .bind(phase.updated_at)
            .bind(phase_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(phase)
    }

    /// Delete one phase and re-pack the remaining positions to 1..N-1,
    /// preserving relative order, in one transaction.
    ///
    /// Returns the deleted row plus every row whose position shifted, so the
    /// caller can emit one feed event per affected row.
    pub async fn delete_phase(&self, phase_id: &str) -> StoreResult<(Phase, Vec<Phase>)> {
        let mut tx = self.pool().begin().await?;
        let deleted = fetch_phase(&mut tx, phase_id).await?;

        sqlx::query("DELETE FROM phases WHERE id = ?1")
            .bind(phase_id)
            .execute(&mut *tx)
            .await?;

        let now = Utc::now().timestamp();
        sqlx::query(
            "UPDATE phases SET position = position - 1, updated_at = ?1
             WHERE project_id = ?2 AND position > ?3",
        )
        .bind(now)
        .bind(&deleted.project_id)
        .bind(deleted.position)
        .execute(&mut *tx)
        .await?;

        let rows: Vec<PhaseRow> = sqlx::query_as(&format!(
            "SELECT {PHASE_COLUMNS} FROM phases
             WHERE project_id = ?1 AND position >= ?2 ORDER BY position"
        ))
        .bind(&deleted.project_id)
        .bind(deleted.position)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok((deleted, rows.into_iter().map(Phase::from).collect()))
    }

    /// Persist a full permutation of a project's phases: position = index + 1
    /// for each id, as one atomic batch.
    ///
    /// Duplicate ids are malformed input and rejected before any query. An id
    /// set that does not exactly match the project's current phases — wrong
    /// length, a foreign id, or an id deleted since the caller last looked —
    /// is a conflict: the stored order is left untouched and the caller
    /// should refetch and retry.
    pub async fn reorder_phases(
        &self,
        project_id: &str,
        ordered_ids: &[String],
    ) -> StoreResult<Vec<Phase>> {
        let unique: HashSet<&str> = ordered_ids.iter().map(String::as_str).collect();
        if unique.len() != ordered_ids.len() {
            return Err(StoreError::Validation(
                "reorder contains duplicate phase ids".into(),
            ));
        }

        let mut tx = self.pool().begin().await?;
        project_exists(&mut tx, project_id).await?;
        let current = fetch_phases_ordered(&mut tx, project_id).await?;

        let current_ids: HashSet<&str> = current.iter().map(|p| p.id.as_str()).collect();
        if current_ids != unique {
            return Err(StoreError::Conflict(
                "reorder does not match the project's current phase set".into(),
            ));
        }

        let now = Utc::now().timestamp();
        for (index, id) in ordered_ids.iter().enumerate() {
            let position = index as i64 + 1;
            let unchanged = current
                .iter()
                .any(|p| p.id == *id && p.position == position);
            if unchanged {
                continue;
            }
            sqlx::query("UPDATE phases SET position = ?1, updated_at = ?2 WHERE id = ?3")
                .bind(position)
                .bind(now)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        let reordered = fetch_phases_ordered(&mut tx, project_id).await?;
        tx.commit().await?;

        Ok(reordered)
    }
}
