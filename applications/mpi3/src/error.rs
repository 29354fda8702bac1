/// Player error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown button: {0}")]
    UnknownButton(String),

    #[error("Library error: {0}")]
    Library(#[from] mpi3_core::CoreError),

    #[error("Playback error: {0}")]
    Playback(#[from] mpi3_playback::PlaybackError),

    #[error("Menu error: {0}")]
    Navigation(#[from] mpi3_navigation::NavigationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<mpi3_storage::StorageError> for AppError {
    fn from(err: mpi3_storage::StorageError) -> Self {
        // StorageError -> CoreError -> AppError
        AppError::Library(err.into())
    }
}

impl AppError {
    /// Whether the error is a recoverable "no such song" lookup failure
    pub fn is_no_such_song(&self) -> bool {
        match self {
            AppError::Library(err) => err.is_no_such_song(),
            AppError::Playback(err) => err.is_no_such_song(),
            AppError::Navigation(mpi3_navigation::NavigationError::Library(err)) => {
                err.is_no_such_song()
            }
            _ => false,
        }
    }
}
