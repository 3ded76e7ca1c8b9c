use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// The transfer phase in which a failure occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferStage {
    Read,
    Write,
    Commit,
}

impl fmt::Display for TransferStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "chunk read"),
            Self::Write => write!(f, "chunk write"),
            Self::Commit => write!(f, "commit"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransferError {
    /// HTTP transport failure while talking to a signed URL.
    #[error("transport error for blob {blob}: {source}")]
    Transport {
        blob: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-HTTP source backend failure.
    #[error("source error for blob {blob}: {reason}")]
    Source { blob: String, reason: String },

    /// Non-HTTP destination backend failure.
    #[error("destination error for blob {blob}: {reason}")]
    Destination { blob: String, reason: String },

    /// The destination refused an upload outright (quota, permissions).
    #[error("destination rejected blob {blob} with status {status}")]
    Rejected { blob: String, status: u16 },

    /// A single network operation exceeded its configured timeout.
    #[error("{stage} timed out after {timeout:?} for blob {blob}")]
    Timeout {
        blob: String,
        stage: TransferStage,
        timeout: Duration,
    },

    /// The caller's cancellation signal fired before commit.
    #[error("transfer of blob {blob} was cancelled")]
    Cancelled { blob: String },

    /// The destination commit itself failed; the blob stays uncommitted.
    #[error("commit failed for blob {blob}: {reason}")]
    Commit { blob: String, reason: String },

    /// A transfer worker task failed to complete.
    #[error("transfer worker failed: {0}")]
    Worker(String),
}

impl TransferError {
    /// Whether the orchestration layer may reasonably retry the whole blob.
    ///
    /// Transport faults and read/write timeouts are transient. A timeout
    /// during commit is not: the commit may or may not have landed, and an
    /// ambiguous outcome needs investigation before a retry. Everything
    /// else reflects a deliberate refusal or a cancelled request.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Timeout { stage, .. } => *stage != TransferStage::Commit,
            _ => false,
        }
    }

    /// The blob this error pertains to, when one is known.
    pub fn blob(&self) -> Option<&str> {
        match self {
            Self::Transport { blob, .. }
            | Self::Source { blob, .. }
            | Self::Destination { blob, .. }
            | Self::Rejected { blob, .. }
            | Self::Timeout { blob, .. }
            | Self::Cancelled { blob }
            | Self::Commit { blob, .. } => Some(blob),
            Self::Worker(_) => None,
        }
    }
}

pub type TransferResult<T> = Result<T, TransferError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_and_transport_are_retryable() {
        let timeout = TransferError::Timeout {
            blob: "b".into(),
            stage: TransferStage::Read,
            timeout: Duration::from_secs(1),
        };
        assert!(timeout.is_retryable());
        let commit_timeout = TransferError::Timeout {
            blob: "b".into(),
            stage: TransferStage::Commit,
            timeout: Duration::from_secs(1),
        };
        assert!(!commit_timeout.is_retryable());
        assert!(!TransferError::Cancelled { blob: "b".into() }.is_retryable());
        assert!(!TransferError::Rejected { blob: "b".into(), status: 413 }.is_retryable());
        assert!(!TransferError::Commit { blob: "b".into(), reason: "x".into() }.is_retryable());
    }

    #[test]
    fn errors_name_the_offending_blob() {
        let err = TransferError::Destination { blob: "grid-42".into(), reason: "full".into() };
        assert_eq!(err.blob(), Some("grid-42"));
        assert!(err.to_string().contains("grid-42"));
    }
}
