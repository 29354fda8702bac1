//! mpi3 Storage
//!
//! `SQLite` song library for the mpi3 player.
//!
//! This crate provides:
//! - `SqliteLibrary`, the production `mpi3_core::Library`
//! - `LibraryScanner`, which reads tags from music directories into it
//!
//! # Example
//!
//! ```rust,no_run
//! use mpi3_core::{Filter, Library};
//! use mpi3_storage::{LibraryScanner, SqliteLibrary};
//! use std::path::{Path, PathBuf};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let library = SqliteLibrary::open(Path::new("/home/pi/.mpi3/library.db"))?;
//! let stats = LibraryScanner::new().scan(&library, &[PathBuf::from("/home/pi/music")], false)?;
//! println!("{} songs added", stats.songs_added);
//!
//! let count = library.get_count(&Filter::new())?;
//! # Ok(())
//! # }
//! ```

mod error;
mod library;
pub mod scanner;
pub mod songs;

pub use error::{Result, StorageError};
pub use library::SqliteLibrary;
pub use scanner::{read_song, LibraryScanner, ScanConfig, ScanStats};
pub use songs::NewSong;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use std::path::Path;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool for the database file at `path`
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(path: &Path) -> std::result::Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    SqlitePoolOptions::new()
        .max_connections(2)
        .connect_with(options)
        .await
}
