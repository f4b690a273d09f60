// crates/server/src/routes/health.rs
//! Health endpoint: liveness plus a glance at the two things this server
//! holds open — the SQLite store and the change-feed subscriptions.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Response for the health check endpoint.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    /// Path of the backing database file, or `"memory"` for in-memory stores.
    pub store: String,
    /// Open feed subscriptions across all projects (SSE streams + viewers).
    pub live_viewers: usize,
}

/// GET /api/health - Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let db_path = state.db.db_path();
    let store = if db_path.as_os_str().is_empty() {
        "memory".to_string()
    } else {
        db_path.display().to_string()
    };
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
        store,
        live_viewers: state.feed.subscriber_count().await,
    })
}

/// Create the health routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}
