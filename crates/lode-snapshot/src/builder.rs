use chrono::Utc;
use lode_page::{read_pages, PageError};
use lode_scan::extract_data_references;
use lode_types::{ObjectRecord, ObjectSelector, ObjectSummary, SnapshotManifest};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::catalog::ObjectCatalog;
use crate::error::{SnapshotError, SnapshotResult};

const DEFAULT_PAGE_SIZE: usize = 100;

/// Builds point-in-time manifests over a workspace.
///
/// The builder never mutates workspace state: a snapshot is a read-only
/// reporting pass, not a backup, and manifests are not a restore format.
pub struct SnapshotBuilder<C> {
    catalog: C,
    page_size: usize,
    workspace_name: Option<String>,
    workspace_description: Option<String>,
}

impl<C: ObjectCatalog> SnapshotBuilder<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            page_size: DEFAULT_PAGE_SIZE,
            workspace_name: None,
            workspace_description: None,
        }
    }

    /// Page size for the object listing walk.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Human-readable workspace name to embed in the manifest.
    pub fn with_workspace_name(mut self, name: impl Into<String>) -> Self {
        self.workspace_name = Some(name.into());
        self
    }

    /// Workspace description to embed in the manifest.
    pub fn with_workspace_description(mut self, description: impl Into<String>) -> Self {
        self.workspace_description = Some(description.into());
        self
    }

    /// Snapshot every object in the workspace.
    ///
    /// The generation timestamp is taken once, up front, so the whole
    /// manifest shares a single as-of time even though objects are
    /// enumerated over a window of real time. When `name` is empty or
    /// absent the snapshot is named after that timestamp.
    ///
    /// With `include_blobs`, each object's definition (pinned to the
    /// version observed in the listing) is downloaded and scanned for
    /// blob references. A download or scan failure for one object is
    /// recorded as an empty blob list for that object and the pass
    /// continues; a failure of the listing itself aborts the snapshot.
    ///
    /// `cancel` is checked between page fetches and between per-object
    /// scans; once it fires the pass stops with [`SnapshotError::Cancelled`]
    /// and no manifest is produced.
    pub async fn build(
        &self,
        workspace_id: Uuid,
        name: Option<String>,
        include_blobs: bool,
        cancel: &CancellationToken,
    ) -> SnapshotResult<SnapshotManifest> {
        let timestamp = Utc::now();

        let catalog = &self.catalog;
        let fetch = move |offset: u64, limit: usize| async move {
            if cancel.is_cancelled() {
                return Err(SnapshotError::Cancelled);
            }
            catalog
                .list_objects(workspace_id, offset, limit)
                .await
                .map_err(|source| SnapshotError::Listing { offset, source })
        };
        let records: Vec<ObjectRecord> = read_pages(fetch, None, self.page_size)
            .await
            .map_err(|err| match err {
                PageError::ZeroLimit => SnapshotError::InvalidPageSize,
                PageError::Fetch { source, .. } => source,
            })?;

        let mut objects = Vec::with_capacity(records.len());
        for record in records {
            if cancel.is_cancelled() {
                return Err(SnapshotError::Cancelled);
            }
            let summary = if include_blobs {
                let blobs = self.scan_object(workspace_id, &record).await;
                ObjectSummary::from_record(record).with_data_blobs(blobs)
            } else {
                ObjectSummary::from_record(record)
            };
            objects.push(summary);
        }

        let snapshot_name = name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| SnapshotManifest::default_name(&timestamp));

        debug!(
            workspace = %workspace_id,
            objects = objects.len(),
            include_blobs,
            "snapshot assembled"
        );

        Ok(SnapshotManifest {
            snapshot_name,
            snapshot_timestamp: timestamp,
            workspace_id,
            workspace_name: self.workspace_name.clone(),
            workspace_description: self.workspace_description.clone(),
            object_count: objects.len(),
            objects,
        })
    }

    /// Blob references for one object, or an empty list when the object
    /// cannot be downloaded or scanned (localized degradation; the
    /// snapshot pass must survive individual bad objects).
    async fn scan_object(&self, workspace_id: Uuid, record: &ObjectRecord) -> Vec<String> {
        let selector = ObjectSelector::ById(record.id);
        match self
            .catalog
            .download_object(workspace_id, &selector, Some(&record.version_id))
            .await
        {
            Ok(definition) => extract_data_references(&definition),
            Err(err) => {
                warn!(object = %record.id, error = %err, "blob scan failed; recording empty blob list");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use crate::error::CatalogError;

    struct MockCatalog {
        records: Vec<ObjectRecord>,
        definitions: HashMap<Uuid, Value>,
        fail_downloads: HashSet<Uuid>,
        fail_listing_at: Option<u64>,
        cancel_in_listing: Option<CancellationToken>,
        cancel_in_download: Option<CancellationToken>,
        downloads: AtomicUsize,
    }

    impl MockCatalog {
        fn new(records: Vec<ObjectRecord>) -> Self {
            Self {
                records,
                definitions: HashMap::new(),
                fail_downloads: HashSet::new(),
                fail_listing_at: None,
                cancel_in_listing: None,
                cancel_in_download: None,
                downloads: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ObjectCatalog for MockCatalog {
        async fn list_objects(
            &self,
            _workspace_id: Uuid,
            offset: u64,
            limit: usize,
        ) -> Result<Vec<ObjectRecord>, CatalogError> {
            if self.fail_listing_at == Some(offset) {
                return Err(CatalogError::Backend("listing unavailable".into()));
            }
            if let Some(token) = &self.cancel_in_listing {
                token.cancel();
            }
            let start = (offset as usize).min(self.records.len());
            let end = (start + limit).min(self.records.len());
            Ok(self.records[start..end].to_vec())
        }

        async fn download_object(
            &self,
            _workspace_id: Uuid,
            selector: &ObjectSelector,
            _version: Option<&str>,
        ) -> Result<Value, CatalogError> {
            self.downloads.fetch_add(1, Ordering::SeqCst);
            if let Some(token) = &self.cancel_in_download {
                token.cancel();
            }
            let ObjectSelector::ById(id) = selector else {
                return Err(CatalogError::NotFound(selector.to_string()));
            };
            if self.fail_downloads.contains(id) {
                return Err(CatalogError::Backend("download failed".into()));
            }
            self.definitions
                .get(id)
                .cloned()
                .ok_or_else(|| CatalogError::NotFound(selector.to_string()))
        }
    }

    fn record(id: Uuid, name: &str, schema: &str) -> ObjectRecord {
        ObjectRecord {
            id,
            name: name.into(),
            path: format!("objects/{name}"),
            schema: schema.into(),
            version_id: "v1".into(),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn snapshot_without_blobs_skips_downloads() {
        let id = Uuid::new_v4();
        let catalog = MockCatalog::new(vec![record(id, "mesh", "triangle-mesh")]);
        let builder = SnapshotBuilder::new(catalog);

        let manifest = builder
            .build(Uuid::new_v4(), None, false, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(manifest.object_count, 1);
        assert!(manifest.objects[0].data_blobs.is_none());
        assert_eq!(builder.catalog.downloads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_blob_scan_degrades_to_empty_list() {
        let good = Uuid::new_v4();
        let bad = Uuid::new_v4();
        let mut catalog = MockCatalog::new(vec![
            record(good, "mesh", "triangle-mesh"),
            record(bad, "grid", "regular-grid"),
        ]);
        catalog
            .definitions
            .insert(good, json!({"geometry": {"data": "blob-1"}}));
        catalog.fail_downloads.insert(bad);
        let builder = SnapshotBuilder::new(catalog);

        let manifest = builder
            .build(Uuid::new_v4(), None, true, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(manifest.object_count, 2);
        assert_eq!(manifest.objects[0].data_blobs, Some(vec!["blob-1".into()]));
        assert_eq!(manifest.objects[1].data_blobs, Some(vec![]));
    }

    #[tokio::test]
    async fn listing_failure_aborts_the_snapshot() {
        let records: Vec<ObjectRecord> =
            (0..150).map(|i| record(Uuid::new_v4(), &format!("o{i}"), "pointset")).collect();
        let mut catalog = MockCatalog::new(records);
        catalog.fail_listing_at = Some(100);
        let builder = SnapshotBuilder::new(catalog);

        let err = builder
            .build(Uuid::new_v4(), None, false, &CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            SnapshotError::Listing { offset, .. } => assert_eq!(offset, 100),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn zero_page_size_is_rejected() {
        let builder = SnapshotBuilder::new(MockCatalog::new(vec![])).with_page_size(0);

        let err = builder
            .build(Uuid::new_v4(), None, false, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, SnapshotError::InvalidPageSize));
    }

    #[tokio::test]
    async fn cancellation_between_pages_aborts_the_walk() {
        let records: Vec<ObjectRecord> =
            (0..150).map(|i| record(Uuid::new_v4(), &format!("o{i}"), "pointset")).collect();
        let mut catalog = MockCatalog::new(records);
        let cancel = CancellationToken::new();
        // Fires during the first page fetch; the walker must not ask for a
        // second page and nothing gets scanned.
        catalog.cancel_in_listing = Some(cancel.clone());
        let builder = SnapshotBuilder::new(catalog).with_page_size(100);

        let err = builder.build(Uuid::new_v4(), None, true, &cancel).await.unwrap_err();

        assert!(matches!(err, SnapshotError::Cancelled));
        assert_eq!(builder.catalog.downloads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancellation_between_scans_stops_the_pass() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let mut catalog = MockCatalog::new(vec![
            record(first, "mesh", "triangle-mesh"),
            record(second, "grid", "regular-grid"),
        ]);
        catalog.definitions.insert(first, json!({"data": "blob-1"}));
        catalog.definitions.insert(second, json!({"data": "blob-2"}));
        let cancel = CancellationToken::new();
        catalog.cancel_in_download = Some(cancel.clone());
        let builder = SnapshotBuilder::new(catalog);

        let err = builder.build(Uuid::new_v4(), None, true, &cancel).await.unwrap_err();

        assert!(matches!(err, SnapshotError::Cancelled));
        assert_eq!(builder.catalog.downloads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn enumeration_spans_multiple_pages() {
        let records: Vec<ObjectRecord> =
            (0..237).map(|i| record(Uuid::new_v4(), &format!("o{i}"), "pointset")).collect();
        let builder = SnapshotBuilder::new(MockCatalog::new(records)).with_page_size(100);

        let manifest = builder
            .build(Uuid::new_v4(), None, false, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(manifest.object_count, 237);
        assert_eq!(manifest.objects.len(), 237);
        assert_eq!(manifest.objects[236].name, "o236");
    }

    #[tokio::test]
    async fn default_name_comes_from_the_generation_timestamp() {
        let builder = SnapshotBuilder::new(MockCatalog::new(vec![]));

        let manifest = builder
            .build(Uuid::new_v4(), Some(String::new()), false, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            manifest.snapshot_name,
            SnapshotManifest::default_name(&manifest.snapshot_timestamp)
        );
    }

    #[tokio::test]
    async fn explicit_name_and_workspace_labels_are_kept() {
        let builder = SnapshotBuilder::new(MockCatalog::new(vec![]))
            .with_workspace_name("North Pit")
            .with_workspace_description("Starter pit model");

        let manifest = builder
            .build(Uuid::new_v4(), Some("pre-import".into()), false, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(manifest.snapshot_name, "pre-import");
        assert_eq!(manifest.workspace_name.as_deref(), Some("North Pit"));
        assert_eq!(manifest.workspace_description.as_deref(), Some("Starter pit model"));
    }
}
