//! Foundation types for Lode.
//!
//! This crate provides the shared data types used by the migration core.
//! Every other Lode crate depends on `lode-types`.
//!
//! # Key Types
//!
//! - [`ObjectRecord`] — One row of a workspace object listing
//! - [`ObjectSummary`] — A manifest entry, optionally carrying blob references
//! - [`SnapshotManifest`] — Point-in-time report over a whole workspace
//! - [`ObjectSelector`] — Lookup key for a single object, by id or by path

pub mod error;
pub mod manifest;
pub mod record;
pub mod selector;

pub use error::SelectorError;
pub use manifest::SnapshotManifest;
pub use record::{ObjectRecord, ObjectSummary};
pub use selector::ObjectSelector;
