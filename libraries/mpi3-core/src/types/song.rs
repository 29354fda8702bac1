/// Song types
use super::ids::SongId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A scanned song
///
/// Songs are immutable once scanned. They are created by a library scan and
/// only replaced by a full rescan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Library key
    pub id: SongId,

    /// Filesystem location handed to the decoder
    pub path: PathBuf,

    /// Display title
    pub title: String,

    /// Normalized title used for ordering (see [`sortable_title`])
    pub sortable_title: String,

    /// Album name
    pub album: Option<String>,

    /// Artist name
    pub artist: Option<String>,

    /// Track number within the album
    pub track_number: Option<u32>,

    /// Total tracks on the album
    pub total_tracks: Option<u32>,
}

impl Song {
    /// Create a song with a title and no album/artist tags
    pub fn new(id: SongId, path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id,
            path: path.into(),
            sortable_title: sortable_title(&title),
            title,
            album: None,
            artist: None,
            track_number: None,
            total_tracks: None,
        }
    }

    /// Set the artist
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Set the album with its track position
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>, track_number: u32, total_tracks: u32) -> Self {
        self.album = Some(album.into());
        self.track_number = Some(track_number);
        self.total_tracks = Some(total_tracks);
        self
    }

    /// Value of a displayable field as text
    ///
    /// Missing tags come back as `None`, matching a NULL column.
    pub fn field(&self, field: SongField) -> Option<String> {
        match field {
            SongField::Path => Some(self.path.to_string_lossy().into_owned()),
            SongField::Title => Some(self.title.clone()),
            SongField::SortableTitle => Some(self.sortable_title.clone()),
            SongField::Album => self.album.clone(),
            SongField::Artist => self.artist.clone(),
            SongField::TrackNumber => self.track_number.map(|n| n.to_string()),
            SongField::TotalTracks => self.total_tracks.map(|n| n.to_string()),
        }
    }
}

/// A song attribute that can be fetched by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SongField {
    Path,
    Title,
    SortableTitle,
    Album,
    Artist,
    TrackNumber,
    TotalTracks,
}

impl SongField {
    /// Column name in the library table
    pub fn column(self) -> &'static str {
        match self {
            Self::Path => "filepath",
            Self::Title => "title",
            Self::SortableTitle => "sortable_title",
            Self::Album => "album",
            Self::Artist => "artist",
            Self::TrackNumber => "track_number",
            Self::TotalTracks => "total_tracks",
        }
    }
}

/// Normalize a title for ordering
///
/// Lowercases, drops punctuation and collapses runs of whitespace, so
/// `"(What's the Story) Morning Glory?"` sorts as
/// `"whats the story morning glory"`.
pub fn sortable_title(title: &str) -> String {
    let stripped: String = title
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
