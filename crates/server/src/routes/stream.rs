// crates/server/src/routes/stream.rs
//! Per-project SSE stream of phase changes.
//!
//! `GET /api/projects/{id}/phases/stream`
//!
//! # Events
//!
//! | Event name      | When emitted                                    |
//! |-----------------|-------------------------------------------------|
//! | `snapshot`      | On connect, and when a client lags              |
//! | `phase_inserted`| A phase row was created                         |
//! | `phase_updated` | A phase row changed (content, status, position) |
//! | `phase_deleted` | A phase row was removed                         |
//! | `heartbeat`     | Every 15 seconds to keep the connection open    |
//!
//! On connect the server subscribes *before* reading the snapshot, then sends
//! the snapshot first, so a mutation racing the connect is never lost: it is
//! either in the snapshot or queued behind it, and applying both is harmless
//! because viewers are idempotent.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use tokio::sync::broadcast::error::RecvError;

use phasewire_core::summarize;
use phasewire_types::{Phase, PhaseEvent};

use crate::error::ApiError;
use crate::state::AppState;

fn snapshot_event(phases: &[Phase]) -> Event {
    let body = serde_json::json!({
        "phases": phases,
        "progress": summarize(phases),
    });
    Event::default()
        .event("snapshot")
        .data(body.to_string())
}

fn change_event(event: &PhaseEvent) -> Event {
    let name = match event {
        PhaseEvent::Inserted { .. } => "phase_inserted",
        PhaseEvent::Updated { .. } => "phase_updated",
        PhaseEvent::Deleted { .. } => "phase_deleted",
    };
    Event::default()
        .event(name)
        .data(serde_json::to_string(event).unwrap_or_default())
}

/// GET /api/projects/{id}/phases/stream - Subscribe to one project's changes.
pub async fn phase_stream(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, ApiError> {
    // Reject streams for projects that do not exist instead of holding an
    // open connection that will never carry an event.
    state.db.get_project(&project_id).await?;

    let mut rx = state.feed.subscribe(&project_id).await;
    let db = state.db.clone();

    let stream = async_stream::stream! {
        // 1. On connect: hydrate with the current snapshot.
        match db.list_phases(&project_id).await {
            Ok(phases) => yield Ok(snapshot_event(&phases)),
            Err(err) => {
                tracing::error!(project_id = %project_id, error = %err, "snapshot failed, closing stream");
                return;
            }
        }

        // 2. Stream events from the broadcast channel with a heartbeat.
        let mut heartbeat_interval = tokio::time::interval(Duration::from_secs(15));
        heartbeat_interval.tick().await; // first tick is immediate
        loop {
            tokio::select! {
                event = rx.recv() => {
                    match event {
                        Ok(phase_event) => {
                            yield Ok(change_event(&phase_event));
                        }
                        Err(RecvError::Lagged(n)) => {
                            tracing::warn!(
                                project_id = %project_id,
                                skipped = n,
                                "SSE client lagged, re-sending snapshot"
                            );
                            // Re-send full state (same as initial connect) so
                            // the client recovers from any missed events.
                            match db.list_phases(&project_id).await {
                                Ok(phases) => yield Ok(snapshot_event(&phases)),
                                Err(err) => {
                                    tracing::error!(project_id = %project_id, error = %err, "resync failed, closing stream");
                                    break;
                                }
                            }
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
                _ = heartbeat_interval.tick() => {
                    yield Ok(Event::default().event("heartbeat").data("{}"));
                }
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    ))
}

/// Create the stream routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/projects/{id}/phases/stream", get(phase_stream))
}
