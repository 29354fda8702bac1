/// Storage-specific errors
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Tag reading failed for a file
    #[error("Failed to read tags from {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: lofty::error::LoftyError,
    },

    /// Music directory could not be walked
    #[error("Failed to scan {path}: {message}")]
    Scan { path: PathBuf, message: String },

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for mpi3_core::CoreError {
    fn from(err: StorageError) -> Self {
        mpi3_core::CoreError::library(err.to_string())
    }
}
