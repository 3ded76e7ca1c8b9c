use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::ObjectSummary;

/// Point-in-time report over every object in a workspace.
///
/// A manifest is assembled in a single orchestration pass and never mutated
/// afterwards. `snapshot_timestamp` is taken once at the start of the pass,
/// so the whole report shares one logical as-of time even though objects are
/// enumerated over a window of real time. The manifest is advisory reporting
/// data, not a binary recovery format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotManifest {
    pub snapshot_name: String,
    pub snapshot_timestamp: DateTime<Utc>,
    pub workspace_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_description: Option<String>,
    pub object_count: usize,
    pub objects: Vec<ObjectSummary>,
}

impl SnapshotManifest {
    /// The default name for an unnamed snapshot: `snapshot_<timestamp>`.
    pub fn default_name(timestamp: &DateTime<Utc>) -> String {
        format!("snapshot_{}", timestamp.to_rfc3339())
    }
}
