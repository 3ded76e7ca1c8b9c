//! Pagination driver for offset/limit listing endpoints.
//!
//! The platform's listing APIs return results one bounded page at a time.
//! [`read_pages`] drives such an endpoint to completion (or to a caller
//! cap) and materializes the full result set; [`walk_pages`] additionally
//! reports why the walk stopped and how many fetches it issued.
//!
//! Results are materialized rather than streamed because the downstream
//! consumers (listing reports, snapshots) need the complete set; callers
//! that leave the cap unset must be prepared for memory use proportional
//! to the total result count.

pub mod error;
pub mod walker;

pub use error::PageError;
pub use walker::{read_pages, walk_pages, PageWalk, StopReason};
