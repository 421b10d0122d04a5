//! Error types for the Nameplate subsystem.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Name already in use: {name} within scope {scope}")]
    NameConflict { scope: String, name: String },

    #[error("Invalid scope: {message}")]
    InvalidScope { message: String },

    #[error("Concurrent modification detected for resource {id}")]
    Conflict { id: String },

    #[error("Resource {id} is being deleted and no longer accepts mutation")]
    AlreadyDeleting { id: String },

    #[error("Entity not found: {entity} with key {key}")]
    NotFound { entity: String, key: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MetadataError {
    /// Whether the caller may retry the same request unchanged after
    /// re-reading current state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MetadataError::Conflict { .. })
    }
}

pub type MetadataResult<T> = Result<T, MetadataError>;
