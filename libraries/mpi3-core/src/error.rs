/// Core error types for mpi3
use crate::types::SongId;
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for mpi3
#[derive(Error, Debug)]
pub enum CoreError {
    /// A song id lookup came back empty
    ///
    /// Callers skip the song rather than abort playback.
    #[error("No such song: {0}")]
    NoSuchSong(SongId),

    /// The library backend failed (query, connection, ...)
    #[error("Library error: {0}")]
    Library(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    /// Create a library error
    pub fn library(msg: impl Into<String>) -> Self {
        Self::Library(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error is the recoverable "no such song" condition
    pub fn is_no_such_song(&self) -> bool {
        matches!(self, Self::NoSuchSong(_))
    }
}
