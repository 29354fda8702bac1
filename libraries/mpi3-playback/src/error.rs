//! Error types for playback management

use mpi3_core::CoreError;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Library lookup failed (including "no such song")
    #[error(transparent)]
    Library(#[from] CoreError),

    /// Volume step table parameters are unusable
    #[error("Invalid volume table: {0}")]
    InvalidVolumeTable(String),

    /// System mixer call failed
    #[error("Mixer error: {0}")]
    Mixer(String),

    /// Decoder process could not be started
    #[error("Failed to spawn decoder `{command}`: {source}")]
    DecoderSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing a command to the decoder failed
    ///
    /// The song is treated as not started; the next command respawns the
    /// decoder.
    #[error("Failed to send `{command}` to decoder: {source}")]
    DecoderWrite {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlaybackError {
    /// Whether the error is the recoverable "no such song" condition
    pub fn is_no_such_song(&self) -> bool {
        matches!(self, Self::Library(err) if err.is_no_such_song())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
