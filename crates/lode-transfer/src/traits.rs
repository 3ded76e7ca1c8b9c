use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::error::TransferResult;

/// Readable end of one blob transfer.
///
/// Sources are single-use: once `next_chunk` returns `Ok(None)` the blob is
/// exhausted. Dropping a source releases whatever connection or descriptor
/// backs it.
#[async_trait]
pub trait BlobSource: Send {
    /// The next chunk of the blob, in strict byte order, or `None` at end
    /// of data. Chunk sizes are chosen by the backend and bounded.
    async fn next_chunk(&mut self) -> TransferResult<Option<Bytes>>;
}

/// Writable end of one blob transfer.
///
/// Written chunks stay invisible to readers until `commit` succeeds.
/// Dropping a sink without committing discards the uncommitted bytes; a
/// sink must never expose a partially written blob.
#[async_trait]
pub trait BlobSink: Send {
    /// Append one chunk, in strict byte order.
    async fn write_chunk(&mut self, chunk: Bytes) -> TransferResult<()>;

    /// Make every written chunk durable and visible to subsequent readers.
    ///
    /// Called at most once, after the final chunk.
    async fn commit(&mut self) -> TransferResult<()>;
}

/// Produces a read descriptor for a named blob at the source endpoint.
#[async_trait]
pub trait SourceFactory: Send + Sync {
    async fn open_source(&self, blob: &str) -> TransferResult<Box<dyn BlobSource>>;
}

/// Produces a write descriptor for a named blob at the destination endpoint.
#[async_trait]
pub trait SinkFactory: Send + Sync {
    async fn open_sink(&self, blob: &str) -> TransferResult<Box<dyn BlobSink>>;
}

/// Short-lived signed-URL capability for a named blob.
///
/// Models the platform's `prepare_data_download` / `prepare_data_upload`
/// endpoints: each call mints a fresh time-limited URL, so implementations
/// may be called again if an earlier URL has expired.
#[async_trait]
pub trait UrlIssuer: Send + Sync {
    async fn issue(&self, blob: &str) -> TransferResult<Url>;
}
