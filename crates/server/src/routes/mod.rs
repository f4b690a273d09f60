//! API route handlers for the phasewire server.

pub mod health;
pub mod phases;
pub mod projects;
pub mod stream;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET    /api/health - Health check
/// - POST   /api/projects - Create a project
/// - GET    /api/projects?agencyId=|clientId= - Tenant-scoped project listing
/// - GET    /api/projects/:id - Get a single project
/// - GET    /api/projects/:id/phases - Phase snapshot with derived progress
/// - POST   /api/projects/:id/phases - Create one phase at the end
/// - POST   /api/projects/:id/phases/seed - Bulk-create phases (all-or-nothing)
/// - PUT    /api/projects/:id/phases/order - Persist a full reorder permutation
/// - POST   /api/projects/:id/phases/:phase_id/move - Index-to-index move gesture
/// - GET    /api/projects/:id/phases/stream - SSE stream of phase changes
/// - PATCH  /api/phases/:id - Edit phase name/description
/// - PUT    /api/phases/:id/status - Set phase status
/// - DELETE /api/phases/:id - Delete a phase and re-pack positions
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", projects::router())
        .nest("/api", phases::router())
        .nest("/api", stream::router())
        .with_state(state)
}
