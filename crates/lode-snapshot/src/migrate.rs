use std::collections::BTreeMap;
use std::sync::Arc;

use lode_scan::extract_data_references;
use lode_transfer::{copy_blobs, SinkFactory, SourceFactory, TransferConfig, TransferReport};
use lode_types::ObjectRecord;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::SnapshotResult;

/// Copy every data blob referenced by an object definition from a source
/// endpoint to a destination endpoint.
///
/// References are discovered by scanning `definition` and transferred in
/// discovery order through the streaming pipeline; duplicates in the
/// definition are transferred again rather than deduplicated, since each
/// occurrence may be a distinct attachment slot. A definition with no
/// references returns immediately without touching either endpoint.
pub async fn copy_object_data(
    definition: &Value,
    sources: Arc<dyn SourceFactory>,
    sinks: Arc<dyn SinkFactory>,
    config: &TransferConfig,
    cancel: &CancellationToken,
) -> SnapshotResult<TransferReport> {
    let references = extract_data_references(definition);
    if references.is_empty() {
        return Ok(TransferReport::default());
    }

    debug!(blobs = references.len(), "copying object data blobs");
    let report = copy_blobs(sources, sinks, &references, config, cancel).await?;
    Ok(report)
}

/// Count objects per schema tag, ordered by tag.
pub fn schema_census<'a>(records: impl IntoIterator<Item = &'a ObjectRecord>) -> BTreeMap<String, usize> {
    let mut census = BTreeMap::new();
    for record in records {
        *census.entry(record.schema.clone()).or_insert(0) += 1;
    }
    census
}
