//! Snapshot orchestration for workspace migration.
//!
//! Composes the page walker (object enumeration), the reference scanner
//! (blob discovery), and the transfer pipeline (blob export) into the two
//! top-level migration operations:
//!
//! - [`SnapshotBuilder`] produces a point-in-time [`SnapshotManifest`]
//!   over every object in a workspace, optionally annotated with each
//!   object's data blob references.
//! - [`copy_object_data`] streams every blob referenced by one object's
//!   definition from a source endpoint to a destination endpoint.
//!
//! Both are read-only with respect to the source workspace.
//!
//! [`SnapshotManifest`]: lode_types::SnapshotManifest

pub mod builder;
pub mod catalog;
pub mod error;
pub mod migrate;

pub use builder::SnapshotBuilder;
pub use catalog::ObjectCatalog;
pub use error::{CatalogError, SnapshotError, SnapshotResult};
pub use migrate::{copy_object_data, schema_census};
