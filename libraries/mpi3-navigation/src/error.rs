//! Error types for menu navigation

use mpi3_core::CoreError;
use thiserror::Error;

/// Navigation errors
#[derive(Debug, Error)]
pub enum NavigationError {
    /// Library query behind a frame failed
    #[error(transparent)]
    Library(#[from] CoreError),
}

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, NavigationError>;
