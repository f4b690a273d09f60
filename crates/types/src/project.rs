// crates/types/src/project.rs

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A client project owned by an agency. Its "state" is never stored — it is
/// derived from the statuses of its phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../web/src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    /// Owning agency (the tenant).
    pub agency_id: String,
    /// The client who observes this project through the portal.
    pub client_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Reference to the uploaded proposal document the phases were extracted
    /// from, when the project was seeded that way.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_path: Option<String>,
    /// Unix seconds.
    pub created_at: i64,
}
