/// Core traits for mpi3
use crate::error::{CoreError, Result};
use crate::types::{Filter, FilterField, OrderBy, SongField, SongId};
use std::collections::HashMap;
use std::path::PathBuf;

/// Library collaborator
///
/// Ordered, filtered access to the scanned song database. Queues and menus
/// hold an `Arc<dyn Library>` injected at construction; there is no global
/// instance.
///
/// Implementers own the filtering rules; callers pick the ordering.
pub trait Library: Send + Sync {
    /// Ordered song ids matching `filter`
    ///
    /// # Arguments
    /// * `order_by` - Sort key, usually `filter.order_by()`
    /// * `limit` - Maximum ids to return, `None` for all
    /// * `offset` - Number of matching ids to skip
    ///
    /// # Errors
    /// Returns an error if the backend query fails
    fn get_list(
        &self,
        filter: &Filter,
        order_by: OrderBy,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<SongId>>;

    /// Number of songs matching `filter`
    fn get_count(&self, filter: &Filter) -> Result<usize>;

    /// One field for each of the given ids
    ///
    /// Ids with no song, or a NULL value, are absent from the map.
    fn get_by_id(&self, ids: &[SongId], field: SongField) -> Result<HashMap<SongId, String>>;

    /// Distinct values of `field` among songs matching `filter`, sorted
    ///
    /// Drives the artist and album drill-down menus. NULL values are skipped.
    fn get_values(&self, field: FilterField, filter: &Filter) -> Result<Vec<String>>;

    /// Filesystem path of a song
    ///
    /// # Errors
    /// Returns `CoreError::NoSuchSong` if the id is not in the library
    fn get_path(&self, id: SongId) -> Result<PathBuf> {
        self.get_by_id(&[id], SongField::Path)?
            .remove(&id)
            .map(PathBuf::from)
            .ok_or(CoreError::NoSuchSong(id))
    }

    /// Display title of a song
    ///
    /// # Errors
    /// Returns `CoreError::NoSuchSong` if the id is not in the library
    fn get_title(&self, id: SongId) -> Result<String> {
        self.get_by_id(&[id], SongField::Title)?
            .remove(&id)
            .ok_or(CoreError::NoSuchSong(id))
    }
}
