//! Integration tests for the SQLite library
//!
//! These use REAL SQLite files in a temp dir (NOT in-memory) so migrations,
//! the UNIQUE path constraint and NULL ordering behave as on the device.

use mpi3_core::{CoreError, Filter, FilterField, Library, OrderBy, SongField, SongId};
use mpi3_storage::{LibraryScanner, NewSong, ScanConfig, SqliteLibrary};
use std::path::PathBuf;
use tempfile::TempDir;

/// Test library wrapper that cleans up on drop
struct TestLibrary {
    library: SqliteLibrary,
    _temp_dir: TempDir,
}

impl TestLibrary {
    fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let library = SqliteLibrary::open(&temp_dir.path().join("db").join("library.db"))
            .expect("Failed to open library");
        Self {
            library,
            _temp_dir: temp_dir,
        }
    }
}

fn create_test_song(path: &str, title: &str, artist: Option<&str>, album: Option<(&str, u32)>) -> NewSong {
    let mut song = NewSong::untagged(path);
    song.title = title.to_string();
    song.artist = artist.map(str::to_string);
    if let Some((album, track)) = album {
        song.album = Some(album.to_string());
        song.track_number = Some(track);
        song.total_tracks = Some(10);
    }
    song
}

fn seed(library: &SqliteLibrary) {
    let songs = vec![
        create_test_song("/m/tender.mp3", "Tender", Some("Blur"), Some(("13", 1))),
        create_test_song("/m/bugman.mp3", "Bugman", Some("Blur"), Some(("13", 2))),
        create_test_song("/m/wonderwall.mp3", "Wonderwall", Some("Oasis"), Some(("Morning Glory", 3))),
        create_test_song("/m/champagne.mp3", "Champagne Supernova", Some("Oasis"), Some(("Morning Glory", 12))),
        create_test_song("/m/demo.mp3", "\"Another\" Demo", None, None),
    ];
    assert_eq!(library.insert_songs(&songs).unwrap(), 5);
}

fn titles(library: &SqliteLibrary, ids: &[SongId]) -> Vec<String> {
    let map = library.get_by_id(ids, SongField::Title).unwrap();
    ids.iter().map(|id| map[id].clone()).collect()
}

#[test]
fn unfiltered_list_orders_by_sortable_title() {
    let test = TestLibrary::new();
    seed(&test.library);

    let ids = test
        .library
        .get_list(&Filter::new(), OrderBy::SortableTitle, None, 0)
        .unwrap();
    assert_eq!(
        titles(&test.library, &ids),
        vec![
            "\"Another\" Demo",
            "Bugman",
            "Champagne Supernova",
            "Tender",
            "Wonderwall"
        ]
    );
}

#[test]
fn album_filter_orders_by_track_number() {
    let test = TestLibrary::new();
    seed(&test.library);

    let filter = Filter::new().with(FilterField::Album, "Morning Glory");
    let ids = test
        .library
        .get_list(&filter, filter.order_by(), None, 0)
        .unwrap();
    assert_eq!(
        titles(&test.library, &ids),
        vec!["Wonderwall", "Champagne Supernova"]
    );
    assert_eq!(test.library.get_count(&filter).unwrap(), 2);
}

#[test]
fn filters_combine_with_and() {
    let test = TestLibrary::new();
    seed(&test.library);

    let filter = Filter::new()
        .with(FilterField::Artist, "Blur")
        .with(FilterField::Album, "Morning Glory");
    assert_eq!(test.library.get_count(&filter).unwrap(), 0);

    let either_artist = Filter::new()
        .with(FilterField::Artist, "Blur")
        .with(FilterField::Artist, "Oasis");
    assert_eq!(test.library.get_count(&either_artist).unwrap(), 4);
}

#[test]
fn limit_and_offset_page_through() {
    let test = TestLibrary::new();
    seed(&test.library);
    let all = test
        .library
        .get_list(&Filter::new(), OrderBy::SortableTitle, None, 0)
        .unwrap();

    let page = test
        .library
        .get_list(&Filter::new(), OrderBy::SortableTitle, Some(2), 2)
        .unwrap();
    assert_eq!(page, all[2..4].to_vec());

    let rest = test
        .library
        .get_list(&Filter::new(), OrderBy::SortableTitle, None, 3)
        .unwrap();
    assert_eq!(rest, all[3..].to_vec());
}

#[test]
fn get_by_id_casts_numbers_and_skips_nulls() {
    let test = TestLibrary::new();
    seed(&test.library);
    let ids = test
        .library
        .get_list(&Filter::new(), OrderBy::SortableTitle, None, 0)
        .unwrap();

    let tracks = test.library.get_by_id(&ids, SongField::TrackNumber).unwrap();
    // The demo has no track number
    assert_eq!(tracks.len(), 4);
    assert_eq!(tracks[&ids[1]], "2");

    assert!(test
        .library
        .get_by_id(&[], SongField::Title)
        .unwrap()
        .is_empty());
}

#[test]
fn get_values_lists_distinct_artists_and_albums() {
    let test = TestLibrary::new();
    seed(&test.library);

    let artists = test
        .library
        .get_values(FilterField::Artist, &Filter::new())
        .unwrap();
    assert_eq!(artists, vec!["Blur", "Oasis"]);

    let filter = Filter::new().with(FilterField::Artist, "Oasis");
    let albums = test.library.get_values(FilterField::Album, &filter).unwrap();
    assert_eq!(albums, vec!["Morning Glory"]);
}

#[test]
fn get_path_and_missing_song() {
    let test = TestLibrary::new();
    seed(&test.library);
    let filter = Filter::new().with(FilterField::Album, "13");
    let first = test.library.get_list(&filter, filter.order_by(), Some(1), 0).unwrap()[0];

    assert_eq!(
        test.library.get_path(first).unwrap(),
        PathBuf::from("/m/tender.mp3")
    );
    assert!(matches!(
        test.library.get_path(SongId::new(9999)),
        Err(CoreError::NoSuchSong(_))
    ));
}

#[test]
fn duplicate_paths_are_ignored() {
    let test = TestLibrary::new();
    seed(&test.library);

    let again = vec![create_test_song("/m/tender.mp3", "Tender (again)", None, None)];
    assert_eq!(test.library.insert_songs(&again).unwrap(), 0);
    assert_eq!(test.library.song_count().unwrap(), 5);
}

#[test]
fn clear_removes_everything() {
    let test = TestLibrary::new();
    seed(&test.library);
    assert_eq!(test.library.clear().unwrap(), 5);
    assert_eq!(test.library.song_count().unwrap(), 0);
}

#[test]
fn scan_records_unreadable_files_and_ignores_other_extensions() {
    let test = TestLibrary::new();
    let music = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(music.path().join("album")).unwrap();
    std::fs::write(music.path().join("album").join("broken.mp3"), b"not audio").unwrap();
    std::fs::write(music.path().join("notes.txt"), b"liner notes").unwrap();

    let stats = LibraryScanner::new()
        .scan(&test.library, &[music.path().to_path_buf()], false)
        .unwrap();

    assert_eq!(stats.files_discovered, 1);
    assert_eq!(stats.songs_added, 0);
    assert_eq!(stats.errors.len(), 1);
    assert!(stats.errors[0].0.ends_with("broken.mp3"));
}

#[test]
fn full_rescan_clears_first() {
    let test = TestLibrary::new();
    seed(&test.library);
    let music = tempfile::tempdir().unwrap();

    let scanner = LibraryScanner::with_config(ScanConfig {
        batch_size: 10,
        ..ScanConfig::default()
    });
    let stats = scanner
        .scan(&test.library, &[music.path().to_path_buf()], true)
        .unwrap();

    assert_eq!(stats.songs_removed, 5);
    assert_eq!(test.library.song_count().unwrap(), 0);
}
