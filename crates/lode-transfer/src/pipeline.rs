use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::TransferConfig;
use crate::error::{TransferError, TransferResult, TransferStage};
use crate::traits::{SinkFactory, SourceFactory};

/// Outcome of one committed blob transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobStats {
    pub blob: String,
    pub bytes: u64,
    pub chunks: u64,
}

/// Outcome of a multi-blob transfer. Entries are in completion order;
/// ordering across blobs is not guaranteed.
#[derive(Clone, Debug, Default)]
pub struct TransferReport {
    pub blobs: Vec<BlobStats>,
}

impl TransferReport {
    pub fn total_bytes(&self) -> u64 {
        self.blobs.iter().map(|b| b.bytes).sum()
    }
}

/// Apply a per-operation timeout, converting expiry into a classified
/// [`TransferError::Timeout`].
async fn timed<T>(
    timeout: Duration,
    stage: TransferStage,
    blob: &str,
    op: impl Future<Output = TransferResult<T>>,
) -> TransferResult<T> {
    match tokio::time::timeout(timeout, op).await {
        Ok(result) => result,
        Err(_) => Err(TransferError::Timeout { blob: blob.to_owned(), stage, timeout }),
    }
}

/// Stream one named blob from source to destination and commit it.
///
/// Both descriptors are opened up front and owned by this call, so every
/// exit path — chunk failure, timeout, cancellation — drops them before
/// commit is reachable. Chunks move strictly in order and the destination
/// commit runs only after the source reports end of data; an error anywhere
/// earlier leaves the destination uncommitted.
///
/// Cancellation is observed between chunks. Each chunk read, chunk write,
/// and the commit is bounded by the configured timeouts.
pub async fn copy_blob(
    sources: &dyn SourceFactory,
    sinks: &dyn SinkFactory,
    blob: &str,
    config: &TransferConfig,
    cancel: &CancellationToken,
) -> TransferResult<BlobStats> {
    if cancel.is_cancelled() {
        return Err(TransferError::Cancelled { blob: blob.to_owned() });
    }

    let mut source = sources.open_source(blob).await?;
    let mut sink = sinks.open_sink(blob).await?;

    let mut bytes: u64 = 0;
    let mut chunks: u64 = 0;

    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Err(TransferError::Cancelled { blob: blob.to_owned() });
            }
            chunk = timed(config.chunk_timeout, TransferStage::Read, blob, source.next_chunk()) => {
                chunk?
            }
        };
        let Some(chunk) = next else { break };

        bytes += chunk.len() as u64;
        chunks += 1;
        timed(config.chunk_timeout, TransferStage::Write, blob, sink.write_chunk(chunk)).await?;
    }

    timed(config.commit_timeout, TransferStage::Commit, blob, sink.commit()).await?;

    debug!(blob, bytes, chunks, "blob transfer committed");
    Ok(BlobStats { blob: blob.to_owned(), bytes, chunks })
}

/// Transfer a list of named blobs over a bounded worker pool.
///
/// An empty list returns immediately without touching either endpoint.
/// Otherwise up to `config.max_concurrent` blobs stream at once, bounding
/// the number of simultaneously open descriptor pairs. Blobs share no
/// state; the first failure cancels the remaining transfers (each of which
/// stays uncommitted) and is returned with the offending blob name
/// attached.
pub async fn copy_blobs(
    sources: Arc<dyn SourceFactory>,
    sinks: Arc<dyn SinkFactory>,
    blobs: &[String],
    config: &TransferConfig,
    cancel: &CancellationToken,
) -> TransferResult<TransferReport> {
    if blobs.is_empty() {
        return Ok(TransferReport::default());
    }

    let child = cancel.child_token();
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent.max(1)));
    let mut workers: JoinSet<TransferResult<BlobStats>> = JoinSet::new();

    for blob in blobs {
        let sources = Arc::clone(&sources);
        let sinks = Arc::clone(&sinks);
        let semaphore = Arc::clone(&semaphore);
        let token = child.clone();
        let config = config.clone();
        let blob = blob.clone();

        workers.spawn(async move {
            let _permit = tokio::select! {
                biased;
                () = token.cancelled() => {
                    return Err(TransferError::Cancelled { blob });
                }
                permit = semaphore.clone().acquire_owned() => {
                    permit.map_err(|e| TransferError::Worker(e.to_string()))?
                }
            };
            copy_blob(sources.as_ref(), sinks.as_ref(), &blob, &config, &token).await
        });
    }

    let mut report = TransferReport::default();
    let mut first_failure: Option<TransferError> = None;

    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(Ok(stats)) => report.blobs.push(stats),
            Ok(Err(err)) => {
                // Cancellations of the other workers are a consequence of
                // the first failure, not failures in their own right.
                if first_failure.is_none() {
                    warn!(error = %err, "blob transfer failed; aborting remaining transfers");
                    child.cancel();
                    first_failure = Some(err);
                }
            }
            Err(join_err) => {
                if first_failure.is_none() {
                    child.cancel();
                    first_failure = Some(TransferError::Worker(join_err.to_string()));
                }
            }
        }
    }

    match first_failure {
        Some(err) => Err(err),
        None => Ok(report),
    }
}
