// crates/types/src/lib.rs
//! Shared wire types for the phasewire API and realtime feed.
//!
//! Everything here crosses the HTTP/SSE boundary, so each type carries serde
//! plus a ts-rs export for the portal frontend's generated types.

pub mod event;
pub mod phase;
pub mod project;

pub use event::PhaseEvent;
pub use phase::{ExtractedPhase, Phase, PhaseStatus};
pub use project::Project;
