//! mpi3 - Playback Management
//!
//! The stateful core of the player, independent of display and buttons.
//!
//! This crate provides:
//! - Volume control over a fixed step table, with mute/unmute
//! - Playback modes (normal, shuffle, loop, repeat) as a pure cycle
//! - A paged song queue over any `mpi3_core::Library`
//! - Bounded shuffle history for "previous" under shuffle
//! - Control of the external decoder process (`mpg123 --remote`)
//!
//! # Architecture
//!
//! Nothing here knows about GPIO, the e-ink panel or SQLite. The library,
//! the system mixer and the decoder process are injected through traits
//! (`Library`, `Mixer`, `DecoderBackend`).
//!
//! # Example: Stepping a Queue
//!
//! ```rust
//! use mpi3_core::{Filter, MemoryLibrary, SongId};
//! use mpi3_playback::{Direction, PlaybackMode, SongQueue};
//! use std::sync::Arc;
//!
//! let library = Arc::new(MemoryLibrary::numbered(10, 3));
//! let mut queue = SongQueue::new(library, 8, 50);
//! queue.refresh(Filter::new()).unwrap();
//!
//! assert_eq!(queue.current_id(), Some(SongId::new(10)));
//! queue.seek(2).unwrap();
//! let next = queue.advance(Direction::Forward, PlaybackMode::Loop).unwrap();
//! assert_eq!(next, Some(SongId::new(10)));
//! ```
//!
//! # Example: Volume
//!
//! ```rust
//! use mpi3_playback::{NullMixer, VolumeController, VolumeTable};
//!
//! let table = VolumeTable::build(10, 90, 5).unwrap();
//! let mut volume = VolumeController::new(table, 20, Box::new(NullMixer));
//!
//! assert_eq!(volume.mute(), 0);
//! assert_eq!(volume.mute(), 20);
//! ```

pub mod error;
pub mod history;
pub mod mode;
pub mod process;
pub mod queue;
pub mod shuffle;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod types;
pub mod volume;

// Re-exports
pub use error::{PlaybackError, Result};
pub use history::ShuffleHistory;
pub use mode::PlaybackModeCycle;
pub use process::{
    parse_status_line, DecoderBackend, DecoderProcess, Mpg123Backend, PlaybackProcessController,
    ReportedStatus, SpawnedDecoder,
};
pub use queue::SongQueue;
pub use types::{DecoderState, Direction, PlaybackMode};
pub use volume::{Mixer, NullMixer, VolumeController, VolumeTable};
