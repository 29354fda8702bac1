//! Playback mode cycle

use crate::types::PlaybackMode;
use tracing::debug;

/// The user-selected playback mode
///
/// Advanced only by an explicit button press. Holds no iterator state: each
/// step is `PlaybackMode::next`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackModeCycle {
    current: PlaybackMode,
}

impl PlaybackModeCycle {
    /// Start the cycle at `mode`
    pub fn new(mode: PlaybackMode) -> Self {
        Self { current: mode }
    }

    /// Advance to the next mode and return it
    pub fn next(&mut self) -> PlaybackMode {
        let previous = self.current;
        self.current = previous.next();
        debug!(from = %previous, to = %self.current, "Playback mode changed");
        self.current
    }

    /// Current mode
    pub fn current(&self) -> PlaybackMode {
        self.current
    }

    /// Title-bar glyph for the current mode
    pub fn glyph(&self) -> char {
        self.current.glyph()
    }
}
