use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SelectorError;

/// Lookup key for a single object within a workspace.
///
/// The platform addresses objects either by UUID or by workspace-relative
/// path. Tool-facing callers typically receive both as optional strings;
/// [`ObjectSelector::from_parts`] performs the required before-any-I/O
/// validation that at least one was supplied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectSelector {
    ById(Uuid),
    ByPath(String),
}

impl ObjectSelector {
    /// Build a selector from optional id/path parts.
    ///
    /// The id takes precedence when both are given. Returns
    /// [`SelectorError::Unspecified`] when neither is given; this is a
    /// precondition violation and must be rejected before any I/O.
    pub fn from_parts(id: Option<Uuid>, path: Option<String>) -> Result<Self, SelectorError> {
        match (id, path) {
            (Some(id), _) => Ok(Self::ById(id)),
            (None, Some(path)) => Ok(Self::ByPath(path)),
            (None, None) => Err(SelectorError::Unspecified),
        }
    }
}

impl fmt::Display for ObjectSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ById(id) => write!(f, "id:{id}"),
            Self::ByPath(path) => write!(f, "path:{path}"),
        }
    }
}
