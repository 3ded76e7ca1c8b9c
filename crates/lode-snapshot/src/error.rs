use lode_transfer::TransferError;
use thiserror::Error;

/// Failure reported by an [`ObjectCatalog`](crate::ObjectCatalog)
/// implementation.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("listing page size must be greater than zero")]
    InvalidPageSize,

    /// The workspace object listing failed mid-walk.
    #[error("object listing failed at offset {offset}")]
    Listing {
        offset: u64,
        #[source]
        source: CatalogError,
    },

    /// The caller's cancellation signal fired mid-pass.
    #[error("snapshot cancelled")]
    Cancelled,

    #[error("blob transfer failed: {0}")]
    Transfer(#[from] TransferError),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;
