use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::NodeId;

pub type Result<T> = std::result::Result<T, HierarchyError>;

/// Errors surfaced by the hierarchy engine.
///
/// Malformed hierarchies (dangling parents, cycles, duplicate ids) are never
/// reported here; they degrade to a best-effort ordering instead. Only
/// failures of external collaborators and bad configuration become errors.
#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("Ancestor lookup failed for node {id}: {message}")]
    Lookup { id: NodeId, message: String },

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Request is not eligible for hierarchical sorting (orderby_hierarchy must be true)")]
    NotEligible,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HierarchyError {
    pub fn lookup<E: std::fmt::Display>(id: NodeId, e: E) -> Self {
        Self::Lookup {
            id,
            message: e.to_string(),
        }
    }

    pub fn store<E: std::fmt::Display>(e: E) -> Self {
        Self::Store(e.to_string())
    }

    /// True when the failure came from an external collaborator
    /// (ancestor lookup or record store) rather than from this crate.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, Self::Lookup { .. } | Self::Store(_))
    }
}
