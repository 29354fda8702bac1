//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::fmt;

/// Song-advance policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackMode {
    /// Play in order, stop at the end
    #[default]
    Normal,

    /// Random song each time, "previous" replays shuffle history
    Shuffle,

    /// Play in order, wrap around at either end
    Loop,

    /// Replay the current song
    Repeat,
}

impl PlaybackMode {
    /// All modes in cycle order
    pub const ALL: [Self; 4] = [Self::Normal, Self::Shuffle, Self::Loop, Self::Repeat];

    /// The mode after this one
    ///
    /// `Normal -> Shuffle -> Loop -> Repeat -> Normal`
    pub const fn next(self) -> Self {
        match self {
            Self::Normal => Self::Shuffle,
            Self::Shuffle => Self::Loop,
            Self::Loop => Self::Repeat,
            Self::Repeat => Self::Normal,
        }
    }

    /// Single character shown in the title bar
    pub const fn glyph(self) -> char {
        match self {
            Self::Normal => ' ',
            Self::Shuffle => 'X',
            Self::Loop => 'O',
            Self::Repeat => 'o',
        }
    }
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "NORMAL",
            Self::Shuffle => "SHUFFLE",
            Self::Loop => "LOOP",
            Self::Repeat => "REPEAT",
        };
        f.write_str(name)
    }
}

/// Direction of a queue step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

/// Decoder process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecoderState {
    /// Nothing loaded
    #[default]
    Stopped,

    /// LOAD sent, waiting for the decoder to report playback
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Track ran to completion
    Done,
}

impl DecoderState {
    /// Whether a track is loaded (playing, paused or starting)
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Loading | Self::Playing | Self::Paused)
    }
}
