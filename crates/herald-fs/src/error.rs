//! Error types for the filesystem catalog.

use herald_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for filesystem operations.
pub type Result<T> = std::result::Result<T, FsError>;

/// Errors that can occur in filesystem operations.
#[derive(Debug, Error)]
pub enum FsError {
    /// Catalog not found at the specified path.
    #[error("catalog not found at '{0}'")]
    CatalogNotFound(PathBuf),

    /// Catalog already exists.
    #[error("catalog already exists at '{0}'")]
    CatalogExists(PathBuf),

    /// Entities are stored by fully-qualified name, so one is required.
    #[error("{entity_type} '{name}' has no fully-qualified name")]
    MissingFqn { entity_type: String, name: String },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// YAML parsing error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Core library error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

impl From<FsError> for CoreError {
    fn from(err: FsError) -> Self {
        match err {
            FsError::Core(core) => core,
            other => Self::Lookup(other.to_string()),
        }
    }
}
