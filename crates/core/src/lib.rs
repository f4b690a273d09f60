// crates/core/src/lib.rs
//! Pure phase logic: ordering permutations, progress derivation, and the
//! viewer-side live projection. No I/O — everything here is a total function
//! over in-memory phase collections, so it is testable without a database or
//! a running feed.

pub mod ordering;
pub mod progress;
pub mod projection;

pub use ordering::{move_item, remove_item, OrderingError};
pub use progress::{progress_pct, project_status, status_counts, summarize};
pub use progress::{ProgressSummary, ProjectStatusLabel, StatusCounts};
pub use projection::PhaseProjection;
