//! mpi3 Core
//!
//! Platform-agnostic domain types and collaborator traits for the mpi3 player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Song`, `SongId`, `Filter`
//! - **Collaborator Trait**: `Library`, the ordered/filtered view of the song
//!   database that queues and menus are built on
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! Nothing here talks to SQLite, the decoder or the display. `mpi3-storage`
//! provides the production `Library`; `MemoryLibrary` backs tests and demos.
//!
//! # Example
//!
//! ```rust
//! use mpi3_core::{Filter, FilterField, Library, MemoryLibrary, OrderBy, Song, SongId};
//!
//! let library = MemoryLibrary::new(vec![
//!     Song::new(SongId::new(1), "/music/a.mp3", "Airbag")
//!         .with_artist("Radiohead")
//!         .with_album("OK Computer", 1, 12),
//!     Song::new(SongId::new(2), "/music/b.mp3", "Paranoid Android")
//!         .with_artist("Radiohead")
//!         .with_album("OK Computer", 2, 12),
//! ]);
//!
//! let filter = Filter::new().with(FilterField::Album, "OK Computer");
//! let ids = library.get_list(&filter, filter.order_by(), None, 0).unwrap();
//! assert_eq!(ids, vec![SongId::new(1), SongId::new(2)]);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod memory;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use memory::MemoryLibrary;
pub use traits::Library;
pub use types::{sortable_title, Filter, FilterField, OrderBy, Song, SongField, SongId};
