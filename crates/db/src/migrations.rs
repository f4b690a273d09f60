/// Inline SQL migrations for the phasewire database schema.
///
/// We use simple inline migrations rather than sqlx migration files
/// because the schema is small and self-contained.

pub const MIGRATIONS: &[&str] = &[
    // Migration 1: projects table
    r#"
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    agency_id TEXT NOT NULL,
    client_id TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    document_path TEXT,
    created_at INTEGER NOT NULL
);
"#,
    // Migration 2: phases table. `position` is the dense 1-based order within
    // a project; every committed mutation leaves a project's positions at
    // exactly 1..N. The status CHECK pins the closed three-value set.
    r#"
CREATE TABLE IF NOT EXISTS phases (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    description TEXT,
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'in_progress', 'completed')),
    position INTEGER NOT NULL CHECK (position >= 1),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
"#,
    // Migration 3: indexes
    r#"CREATE INDEX IF NOT EXISTS idx_phases_project ON phases(project_id, position);"#,
    r#"CREATE INDEX IF NOT EXISTS idx_projects_agency ON projects(agency_id);"#,
    r#"CREATE INDEX IF NOT EXISTS idx_projects_client ON projects(client_id);"#,
];
