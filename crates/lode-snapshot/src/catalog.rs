use async_trait::async_trait;
use lode_types::{ObjectRecord, ObjectSelector};
use serde_json::Value;
use uuid::Uuid;

use crate::error::CatalogError;

/// Read-only view of a workspace's objects, implemented by the platform
/// SDK.
///
/// `list_objects` must be idempotent for a fixed `(offset, limit)` pair
/// under no concurrent mutation of the workspace; the page walker relies
/// on that to enumerate without gaps or overlaps.
#[async_trait]
pub trait ObjectCatalog: Send + Sync {
    /// One page of the workspace's object listing, starting at `offset`.
    async fn list_objects(
        &self,
        workspace_id: Uuid,
        offset: u64,
        limit: usize,
    ) -> Result<Vec<ObjectRecord>, CatalogError>;

    /// The full definition of one object, optionally pinned to a version.
    async fn download_object(
        &self,
        workspace_id: Uuid,
        selector: &ObjectSelector,
        version: Option<&str>,
    ) -> Result<Value, CatalogError>;
}
