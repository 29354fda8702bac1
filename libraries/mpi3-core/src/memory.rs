//! In-memory library
//!
//! Applies the same filter and ordering rules as the SQLite library over a
//! plain `Vec<Song>`. Used by tests and by the demo songs in the app.

use crate::error::Result;
use crate::traits::Library;
use crate::types::{Filter, FilterField, OrderBy, Song, SongField, SongId};
use std::collections::{BTreeSet, HashMap};

/// `Library` backed by a vector of songs
#[derive(Debug, Clone, Default)]
pub struct MemoryLibrary {
    songs: Vec<Song>,
}

impl MemoryLibrary {
    /// Create a library from scanned songs
    pub fn new(songs: Vec<Song>) -> Self {
        Self { songs }
    }

    /// Library of `count` untagged songs with ids `first..first + count`
    ///
    /// Titles are zero-padded so alphabetical order equals id order.
    pub fn numbered(first: i64, count: usize) -> Self {
        let songs = (0..count as i64)
            .map(|offset| {
                let id = first + offset;
                Song::new(
                    SongId::new(id),
                    format!("/music/{id:06}.mp3"),
                    format!("Song {id:06}"),
                )
            })
            .collect();
        Self { songs }
    }

    /// All songs
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    fn matching(&self, filter: &Filter) -> impl Iterator<Item = &Song> {
        let filter = filter.clone();
        self.songs.iter().filter(move |song| {
            filter.accepts(FilterField::Artist, song.artist.as_deref())
                && filter.accepts(FilterField::Album, song.album.as_deref())
        })
    }
}

impl Library for MemoryLibrary {
    fn get_list(
        &self,
        filter: &Filter,
        order_by: OrderBy,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<SongId>> {
        let mut songs: Vec<&Song> = self.matching(filter).collect();
        match order_by {
            // SQLite sorts NULL first; id breaks ties like rowid order would
            OrderBy::TrackNumber => songs.sort_by_key(|s| (s.track_number, s.id)),
            OrderBy::SortableTitle => songs.sort_by(|a, b| {
                a.sortable_title
                    .cmp(&b.sortable_title)
                    .then(a.id.cmp(&b.id))
            }),
        }

        let ids = songs.into_iter().skip(offset).map(|s| s.id);
        Ok(match limit {
            Some(limit) => ids.take(limit).collect(),
            None => ids.collect(),
        })
    }

    fn get_count(&self, filter: &Filter) -> Result<usize> {
        Ok(self.matching(filter).count())
    }

    fn get_by_id(&self, ids: &[SongId], field: SongField) -> Result<HashMap<SongId, String>> {
        Ok(self
            .songs
            .iter()
            .filter(|song| ids.contains(&song.id))
            .filter_map(|song| song.field(field).map(|value| (song.id, value)))
            .collect())
    }

    fn get_values(&self, field: FilterField, filter: &Filter) -> Result<Vec<String>> {
        let values: BTreeSet<String> = self
            .matching(filter)
            .filter_map(|song| match field {
                FilterField::Artist => song.artist.clone(),
                FilterField::Album => song.album.clone(),
            })
            .collect();
        Ok(values.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use std::path::PathBuf;

    fn create_test_library() -> MemoryLibrary {
        MemoryLibrary::new(vec![
            Song::new(SongId::new(1), "/m/3.mp3", "Zebra")
                .with_artist("Blur")
                .with_album("Parklife", 3, 16),
            Song::new(SongId::new(2), "/m/1.mp3", "Apple")
                .with_artist("Blur")
                .with_album("Parklife", 1, 16),
            Song::new(SongId::new(3), "/m/o.mp3", "Mango").with_artist("Oasis"),
            Song::new(SongId::new(4), "/m/u.mp3", "Banana"),
        ])
    }

    #[test]
    fn test_unfiltered_list_is_alphabetical() {
        let library = create_test_library();
        let ids = library
            .get_list(&Filter::new(), OrderBy::SortableTitle, None, 0)
            .unwrap();
        assert_eq!(
            ids,
            vec![SongId::new(2), SongId::new(4), SongId::new(3), SongId::new(1)]
        );
    }

    #[test]
    fn test_album_list_is_track_ordered() {
        let library = create_test_library();
        let filter = Filter::new().with(FilterField::Album, "Parklife");
        let ids = library
            .get_list(&filter, filter.order_by(), None, 0)
            .unwrap();
        assert_eq!(ids, vec![SongId::new(2), SongId::new(1)]);
        assert_eq!(library.get_count(&filter).unwrap(), 2);
    }

    #[test]
    fn test_limit_and_offset() {
        let library = MemoryLibrary::numbered(10, 5);
        let ids = library
            .get_list(&Filter::new(), OrderBy::SortableTitle, Some(2), 2)
            .unwrap();
        assert_eq!(ids, vec![SongId::new(12), SongId::new(13)]);

        let tail = library
            .get_list(&Filter::new(), OrderBy::SortableTitle, Some(10), 4)
            .unwrap();
        assert_eq!(tail, vec![SongId::new(14)]);
    }

    #[test]
    fn test_get_by_id_skips_unknown_and_null() {
        let library = create_test_library();
        let albums = library
            .get_by_id(&[SongId::new(1), SongId::new(4), SongId::new(99)], SongField::Album)
            .unwrap();
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[&SongId::new(1)], "Parklife");
    }

    #[test]
    fn test_get_values_distinct_sorted() {
        let library = create_test_library();
        let artists = library
            .get_values(FilterField::Artist, &Filter::new())
            .unwrap();
        assert_eq!(artists, vec!["Blur".to_string(), "Oasis".to_string()]);

        let filter = Filter::new().with(FilterField::Artist, "Blur");
        let albums = library.get_values(FilterField::Album, &filter).unwrap();
        assert_eq!(albums, vec!["Parklife".to_string()]);
    }

    #[test]
    fn test_get_path_and_no_such_song() {
        let library = create_test_library();
        assert_eq!(
            library.get_path(SongId::new(3)).unwrap(),
            PathBuf::from("/m/o.mp3")
        );

        let err = library.get_path(SongId::new(42)).unwrap_err();
        assert!(matches!(err, CoreError::NoSuchSong(id) if id == SongId::new(42)));
        assert!(err.is_no_such_song());
    }
}
