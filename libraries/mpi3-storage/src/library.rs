//! Blocking `Library` over SQLite
//!
//! The player's control loop is synchronous, so the library owns a
//! single-threaded tokio runtime and blocks on each query.

use crate::error::Result;
use crate::songs::{self, NewSong};
use mpi3_core::{Filter, FilterField, Library, OrderBy, SongField, SongId};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

/// Song library stored in a SQLite file
pub struct SqliteLibrary {
    runtime: Runtime,
    pool: SqlitePool,
}

impl SqliteLibrary {
    /// Open (creating if needed) the database at `path` and apply migrations
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let runtime = Builder::new_current_thread().enable_all().build()?;
        let pool = runtime.block_on(async {
            let pool = crate::create_pool(path).await?;
            crate::run_migrations(&pool).await?;
            Ok::<_, crate::StorageError>(pool)
        })?;

        info!(path = %path.display(), "Library database opened");
        Ok(Self { runtime, pool })
    }

    /// The connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert scanned songs in a single transaction
    ///
    /// Paths already in the library are skipped. Returns the number added.
    pub fn insert_songs(&self, songs: &[NewSong]) -> Result<usize> {
        let added = self.block_on(songs::insert_batch(&self.pool, songs))?;
        debug!(batch = songs.len(), added, "Inserted song batch");
        Ok(added)
    }

    /// Remove every song (full rescan)
    pub fn clear(&self) -> Result<u64> {
        let removed = self.block_on(songs::delete_all(&self.pool))?;
        info!(removed, "Library cleared");
        Ok(removed)
    }

    /// Total songs in the library
    pub fn song_count(&self) -> Result<usize> {
        self.block_on(songs::get_count(&self.pool, &Filter::new()))
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

impl Library for SqliteLibrary {
    fn get_list(
        &self,
        filter: &Filter,
        order_by: OrderBy,
        limit: Option<usize>,
        offset: usize,
    ) -> mpi3_core::Result<Vec<SongId>> {
        Ok(self.block_on(songs::get_list(&self.pool, filter, order_by, limit, offset))?)
    }

    fn get_count(&self, filter: &Filter) -> mpi3_core::Result<usize> {
        Ok(self.block_on(songs::get_count(&self.pool, filter))?)
    }

    fn get_by_id(
        &self,
        ids: &[SongId],
        field: SongField,
    ) -> mpi3_core::Result<HashMap<SongId, String>> {
        Ok(self.block_on(songs::get_by_id(&self.pool, ids, field))?)
    }

    fn get_values(&self, field: FilterField, filter: &Filter) -> mpi3_core::Result<Vec<String>> {
        Ok(self.block_on(songs::get_values(&self.pool, field, filter))?)
    }
}

impl std::fmt::Debug for SqliteLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteLibrary").finish_non_exhaustive()
    }
}
