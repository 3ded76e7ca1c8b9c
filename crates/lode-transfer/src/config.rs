use std::time::Duration;

/// Configuration for blob transfers.
#[derive(Clone, Debug)]
pub struct TransferConfig {
    /// Maximum wall-clock time for a single chunk read or write.
    pub chunk_timeout: Duration,
    /// Maximum wall-clock time for the destination commit.
    pub commit_timeout: Duration,
    /// Maximum number of blobs streamed concurrently by `copy_blobs`.
    /// Bounds open source/destination descriptor pairs; values below 1 are
    /// treated as 1.
    pub max_concurrent: usize,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            chunk_timeout: Duration::from_secs(30),
            commit_timeout: Duration::from_secs(60),
            max_concurrent: 4,
        }
    }
}
