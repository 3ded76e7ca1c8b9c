//! Streaming blob transfer between storage endpoints.
//!
//! Geoscience blobs can be arbitrarily large, so a transfer never holds a
//! full payload in memory: bytes move from a [`BlobSource`] to a
//! [`BlobSink`] in bounded chunks, and the destination only becomes visible
//! to readers after an explicit commit that follows the final chunk. A
//! failure or cancellation at any point before commit leaves the
//! destination absent or uncommitted, never partially committed.
//!
//! [`copy_blob`] transfers one named blob; [`copy_blobs`] fans a list of
//! blobs out over a bounded worker pool. The HTTP backends in [`http`]
//! implement the traits against the platform's short-lived signed URLs.

pub mod config;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod traits;

pub use config::TransferConfig;
pub use error::{TransferError, TransferResult, TransferStage};
pub use http::{BlockBlobSink, HttpBlobSource, HttpSinkFactory, HttpSourceFactory};
pub use pipeline::{copy_blob, copy_blobs, BlobStats, TransferReport};
pub use traits::{BlobSink, BlobSource, SinkFactory, SourceFactory, UrlIssuer};
