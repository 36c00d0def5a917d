// Error types for catalog resolution

use std::path::PathBuf;
use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised while locating, reading or parsing workspace descriptors
///
/// These never cross the resolver boundary: the resolver logs them where they
/// originate and degrades to an absent result.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Descriptor could not be read from disk
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that failed to read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// YAML descriptor is malformed
    #[error("YAML error: {0}")]
    Yaml(String),

    /// JSON manifest is malformed
    #[error("JSON error: {0}")]
    Json(String),

    /// Document URI does not name a local file
    #[error("Not a file URI: {0}")]
    InvalidUri(String),

    /// No workspace descriptor above the given path
    #[error("No workspace descriptor found for {}", .0.display())]
    WorkspaceNotFound(PathBuf),
}

impl CatalogError {
    /// Create an IO error for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_yaml::Error> for CatalogError {
    fn from(err: serde_yaml::Error) -> Self {
        CatalogError::Yaml(err.to_string())
    }
}

impl From<jsonc_parser::errors::ParseError> for CatalogError {
    fn from(err: jsonc_parser::errors::ParseError) -> Self {
        CatalogError::Json(err.to_string())
    }
}
