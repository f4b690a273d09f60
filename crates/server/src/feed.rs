//! Per-project change feed.
//!
//! Every committed phase mutation is published here as a [`PhaseEvent`], and
//! each SSE stream subscribes to exactly one project's channel, so a viewer
//! only ever receives events for the project it is watching.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use phasewire_types::PhaseEvent;

/// Buffered events per project channel before slow subscribers start lagging.
/// A lagged subscriber recovers by re-hydrating from a fresh snapshot.
const CHANNEL_CAPACITY: usize = 256;

/// Fan-out hub holding one broadcast channel per project.
///
/// Channels are created lazily on first use and dropped once a publish finds
/// them without subscribers, so idle projects cost nothing.
#[derive(Debug, Clone, Default)]
pub struct PhaseFeed {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<PhaseEvent>>>>,
}

impl PhaseFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to one project's events. Events published before this call
    /// are not replayed; callers hydrate from a snapshot first.
    pub async fn subscribe(&self, project_id: &str) -> broadcast::Receiver<PhaseEvent> {
        if let Some(tx) = self.channels.read().await.get(project_id) {
            return tx.subscribe();
        }
        let mut channels = self.channels.write().await;
        channels
            .entry(project_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publish one event to its project's subscribers.
    ///
    /// The store has already committed by the time this runs; a publish with
    /// no listeners is a no-op and reclaims the idle channel.
    pub async fn publish(&self, event: PhaseEvent) {
        let project_id = event.project_id().to_string();
        let delivered = {
            let channels = self.channels.read().await;
            match channels.get(&project_id) {
                Some(tx) => tx.send(event).is_ok(),
                None => return,
            }
        };
        if !delivered {
            let mut channels = self.channels.write().await;
            if let Some(tx) = channels.get(&project_id) {
                if tx.receiver_count() == 0 {
                    channels.remove(&project_id);
                }
            }
        }
    }

    /// Number of live subscribers across all projects.
    pub async fn subscriber_count(&self) -> usize {
        self.channels
            .read()
            .await
            .values()
            .map(|tx| tx.receiver_count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasewire_types::{Phase, PhaseStatus};

    fn phase(id: &str, project_id: &str) -> Phase {
        Phase {
            id: id.into(),
            project_id: project_id.into(),
            name: "Discovery".into(),
            description: None,
            status: PhaseStatus::Pending,
            position: 1,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[tokio::test]
    async fn subscriber_receives_events_for_its_project() {
        let feed = PhaseFeed::new();
        let mut rx = feed.subscribe("project-a").await;

        feed.publish(PhaseEvent::Inserted {
            phase: phase("ph-1", "project-a"),
        })
        .await;

        let event = rx.recv().await.unwrap();
        assert_eq!(event.phase_id(), "ph-1");
    }

    #[tokio::test]
    async fn events_do_not_cross_project_channels() {
        let feed = PhaseFeed::new();
        let mut rx_a = feed.subscribe("project-a").await;
        let mut rx_b = feed.subscribe("project-b").await;

        feed.publish(PhaseEvent::Deleted {
            id: "ph-1".into(),
            project_id: "project-b".into(),
        })
        .await;

        let event = rx_b.recv().await.unwrap();
        assert_eq!(event.project_id(), "project-b");
        assert!(rx_a.try_recv().is_err(), "project-a saw project-b's event");
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_no_op() {
        let feed = PhaseFeed::new();
        feed.publish(PhaseEvent::Deleted {
            id: "ph-1".into(),
            project_id: "project-a".into(),
        })
        .await;
        assert_eq!(feed.subscriber_count().await, 0);
    }

    #[tokio::test]
    async fn idle_channel_is_reclaimed_after_last_subscriber_drops() {
        let feed = PhaseFeed::new();
        let rx = feed.subscribe("project-a").await;
        drop(rx);

        feed.publish(PhaseEvent::Deleted {
            id: "ph-1".into(),
            project_id: "project-a".into(),
        })
        .await;

        assert!(feed.channels.read().await.is_empty());
    }
}
