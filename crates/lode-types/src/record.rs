use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of a workspace object listing.
///
/// Records are produced by the platform's listing endpoint and are never
/// interpreted by the core beyond the fields below. `version_id` pins the
/// version that was current at listing time, so later downloads of the same
/// record observe a stable definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub id: Uuid,
    pub name: String,
    pub path: String,
    /// Schema sub-classification tag, e.g. `pointset` or `triangle-mesh`.
    pub schema: String,
    pub version_id: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// A single entry in a [`SnapshotManifest`](crate::SnapshotManifest).
///
/// Identical to [`ObjectRecord`] plus the optional list of data blob
/// references discovered inside the object's definition. `data_blobs` is
/// omitted from serialized output entirely when blob discovery was not
/// requested; an object that was scanned and had no references carries an
/// empty list instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub id: Uuid,
    pub name: String,
    pub path: String,
    pub schema: String,
    pub version_id: String,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_blobs: Option<Vec<String>>,
}

impl ObjectSummary {
    /// Build a summary from a listing record, without blob references.
    pub fn from_record(record: ObjectRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            path: record.path,
            schema: record.schema,
            version_id: record.version_id,
            created_at: record.created_at,
            data_blobs: None,
        }
    }

    /// Attach discovered blob references, preserving discovery order.
    pub fn with_data_blobs(mut self, blobs: Vec<String>) -> Self {
        self.data_blobs = Some(blobs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ObjectRecord {
        ObjectRecord {
            id: Uuid::nil(),
            name: "drillholes".into(),
            path: "exploration/drillholes".into(),
            schema: "downhole-collection".into(),
            version_id: "v17".into(),
            created_at: None,
        }
    }

    #[test]
    fn summary_from_record_has_no_blobs() {
        let s = ObjectSummary::from_record(record());
        assert_eq!(s.name, "drillholes");
        assert!(s.data_blobs.is_none());
    }

    #[test]
    fn with_data_blobs_preserves_order() {
        let s = ObjectSummary::from_record(record())
            .with_data_blobs(vec!["b".into(), "a".into(), "b".into()]);
        assert_eq!(s.data_blobs.unwrap(), vec!["b", "a", "b"]);
    }

    #[test]
    fn absent_blobs_are_omitted_from_json() {
        let json = serde_json::to_string(&ObjectSummary::from_record(record())).unwrap();
        assert!(!json.contains("data_blobs"));
    }

    #[test]
    fn empty_blob_list_is_serialized() {
        let s = ObjectSummary::from_record(record()).with_data_blobs(vec![]);
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"data_blobs\":[]"));
    }
}
