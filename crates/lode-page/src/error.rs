use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError<E>
where
    E: std::error::Error + 'static,
{
    /// A page size of zero can never make progress; rejected before any
    /// fetch is issued.
    #[error("page size must be greater than zero")]
    ZeroLimit,

    /// The underlying fetch failed. The walker does not retry; the offset
    /// identifies the failing page for the caller's retry policy.
    #[error("page fetch failed at offset {offset}")]
    Fetch {
        offset: u64,
        #[source]
        source: E,
    },
}

pub type PageResult<T, E> = Result<T, PageError<E>>;
