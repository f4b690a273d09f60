// crates/server/src/viewer.rs
//! In-process viewer session: the same hydrate-then-apply loop a portal
//! client runs over the SSE stream, driven directly off the feed.
//!
//! A viewer subscribes first and fetches the snapshot second, the same
//! ordering the SSE route uses, so a mutation racing the connect is either
//! in the snapshot or queued behind it. Applying it twice is harmless
//! because the projection is idempotent.

use tokio::sync::broadcast::{self, error::TryRecvError};

use phasewire_core::{PhaseProjection, ProgressSummary};
use phasewire_db::{Database, StoreResult};
use phasewire_types::{Phase, PhaseEvent};

use crate::state::AppState;

pub struct PhaseViewer {
    project_id: String,
    db: Database,
    rx: broadcast::Receiver<PhaseEvent>,
    projection: PhaseProjection,
}

impl PhaseViewer {
    /// Open a viewer session on one project: subscribe, then hydrate.
    pub async fn connect(state: &AppState, project_id: &str) -> StoreResult<Self> {
        state.db.get_project(project_id).await?;
        let rx = state.feed.subscribe(project_id).await;
        let snapshot = state.db.list_phases(project_id).await?;
        Ok(Self {
            project_id: project_id.to_string(),
            db: state.db.clone(),
            rx,
            projection: PhaseProjection::new(snapshot),
        })
    }

    /// Apply every event currently queued on the subscription.
    ///
    /// A lagged subscription is recovered the way a live client recovers: by
    /// refetching the snapshot and carrying on from there.
    pub async fn drain(&mut self) -> StoreResult<()> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.projection.apply(&event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return Ok(()),
                Err(TryRecvError::Lagged(n)) => {
                    tracing::warn!(
                        project_id = %self.project_id,
                        skipped = n,
                        "viewer lagged, refetching snapshot"
                    );
                    let snapshot = self.db.list_phases(&self.project_id).await?;
                    self.projection.replace(snapshot);
                }
            }
        }
    }

    /// Block until the next event arrives and apply it.
    pub async fn next_event(&mut self) -> StoreResult<bool> {
        match self.rx.recv().await {
            Ok(event) => {
                self.projection.apply(&event);
                Ok(true)
            }
            Err(broadcast::error::RecvError::Lagged(_)) => {
                let snapshot = self.db.list_phases(&self.project_id).await?;
                self.projection.replace(snapshot);
                Ok(true)
            }
            Err(broadcast::error::RecvError::Closed) => Ok(false),
        }
    }

    /// Current projected phase list, in position order.
    pub fn phases(&self) -> &[Phase] {
        self.projection.phases()
    }

    /// Progress derived from the projection, recomputed on demand.
    pub fn summary(&self) -> ProgressSummary {
        self.projection.summary()
    }
}
