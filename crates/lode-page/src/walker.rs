use std::future::Future;

use tracing::debug;

use crate::error::{PageError, PageResult};

/// Why a page walk stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// A fetch returned zero items.
    EmptyPage,
    /// A fetch returned fewer items than `limit`; end of data.
    ShortPage,
    /// The accumulated items reached the caller's `up_to` cap.
    CapReached,
}

/// The outcome of a completed page walk.
#[derive(Clone, Debug)]
pub struct PageWalk<T> {
    pub items: Vec<T>,
    pub stop: StopReason,
    /// Number of fetches issued, including a final empty fetch when the
    /// total happened to be an exact multiple of `limit`.
    pub fetches: usize,
}

/// Walk an offset/limit endpoint and return the accumulated items.
///
/// See [`walk_pages`] for the full contract; this is the same walk with the
/// stop diagnostics discarded.
pub async fn read_pages<T, E, F, Fut>(
    fetch_page: F,
    up_to: Option<usize>,
    limit: usize,
) -> PageResult<Vec<T>, E>
where
    E: std::error::Error + 'static,
    F: FnMut(u64, usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    Ok(walk_pages(fetch_page, up_to, limit).await?.items)
}

/// Walk an offset/limit endpoint, reporting items, stop reason, and fetch
/// count.
///
/// Starting at offset 0, pages are fetched strictly sequentially and
/// appended whole. The walk stops on the first empty page, after appending
/// a page shorter than `limit`, or once the accumulator holds `up_to` items
/// (truncated to exactly `up_to`). `up_to = None` reads everything the
/// endpoint has.
///
/// `fetch_page` must be idempotent for a fixed `(offset, limit)` pair under
/// no concurrent mutation of the backing collection. A fetch error aborts
/// the walk immediately with the failing offset attached; nothing is
/// retried and no partial page is cached.
///
/// When the total result count is an exact multiple of `limit`, the final
/// full page cannot be distinguished from a mid-walk page, so one extra
/// fetch is issued and returns empty. The walker accepts this round-trip
/// rather than requiring a total-count oracle from the endpoint.
pub async fn walk_pages<T, E, F, Fut>(
    mut fetch_page: F,
    up_to: Option<usize>,
    limit: usize,
) -> PageResult<PageWalk<T>, E>
where
    E: std::error::Error + 'static,
    F: FnMut(u64, usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    if limit == 0 {
        return Err(PageError::ZeroLimit);
    }

    let mut items: Vec<T> = Vec::new();
    let mut offset: u64 = 0;
    let mut fetches: usize = 0;

    // A cap of zero is satisfied without touching the endpoint.
    if up_to == Some(0) {
        return Ok(PageWalk { items, stop: StopReason::CapReached, fetches });
    }

    let stop = loop {
        let page = fetch_page(offset, limit)
            .await
            .map_err(|source| PageError::Fetch { offset, source })?;
        fetches += 1;

        let page_len = page.len();
        items.extend(page);

        if page_len == 0 {
            break StopReason::EmptyPage;
        }
        if let Some(cap) = up_to {
            if items.len() >= cap {
                items.truncate(cap);
                break StopReason::CapReached;
            }
        }
        if page_len < limit {
            break StopReason::ShortPage;
        }
        offset += limit as u64;
    };

    debug!(items = items.len(), fetches, ?stop, "page walk complete");
    Ok(PageWalk { items, stop, fetches })
}
