/// Library scanner implementation
use crate::error::{Result, StorageError};
use crate::library::SqliteLibrary;
use crate::songs::NewSong;
use lofty::{Accessor, AudioFile, TaggedFileExt};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Largest number of songs written per transaction
pub const MAX_BATCH_SIZE: usize = 500;

const NON_UTF8_PATH: &str = "path is not valid UTF-8";

/// Scan configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to pick up, compared case-insensitively
    pub extensions: Vec<String>,

    /// Songs per insert transaction (capped at `MAX_BATCH_SIZE`)
    pub batch_size: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".to_string()],
            batch_size: MAX_BATCH_SIZE,
        }
    }
}

/// Scan statistics
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Number of matching files found
    pub files_discovered: usize,

    /// Number of songs added to the library
    pub songs_added: usize,

    /// Number of songs skipped (path already in the library)
    pub songs_skipped: usize,

    /// Songs removed before scanning (full rescan only)
    pub songs_removed: u64,

    /// Errors encountered
    pub errors: Vec<(PathBuf, String)>,
}

/// Reads tags from music directories into a `SqliteLibrary`
#[derive(Debug, Clone, Default)]
pub struct LibraryScanner {
    config: ScanConfig,
}

impl LibraryScanner {
    /// Create a scanner with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scanner with custom configuration
    pub fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan `directories` into `library`
    ///
    /// With `full`, the library is emptied first and ids are reassigned.
    /// Unreadable files are recorded in the stats and skipped.
    pub fn scan(
        &self,
        library: &SqliteLibrary,
        directories: &[PathBuf],
        full: bool,
    ) -> Result<ScanStats> {
        let mut stats = ScanStats::default();
        if full {
            stats.songs_removed = library.clear()?;
        }

        let batch_size = self.config.batch_size.clamp(1, MAX_BATCH_SIZE);
        let mut batch = Vec::with_capacity(batch_size);

        for directory in directories {
            info!(directory = %directory.display(), "Scanning music directory");
            for path in self.discover_files(directory, &mut stats) {
                stats.files_discovered += 1;
                match read_song(&path) {
                    Ok(song) => batch.push(song),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Skipping unreadable file");
                        stats.errors.push((path, e.to_string()));
                    }
                }

                if batch.len() >= batch_size {
                    Self::flush(library, &mut batch, &mut stats)?;
                }
            }
        }
        Self::flush(library, &mut batch, &mut stats)?;

        info!(
            discovered = stats.files_discovered,
            added = stats.songs_added,
            skipped = stats.songs_skipped,
            errors = stats.errors.len(),
            "Library scan finished"
        );
        Ok(stats)
    }

    fn flush(library: &SqliteLibrary, batch: &mut Vec<NewSong>, stats: &mut ScanStats) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let added = library.insert_songs(batch)?;
        stats.songs_added += added;
        stats.songs_skipped += batch.len() - added;
        batch.clear();
        Ok(())
    }

    /// Files under `directory` with a configured extension
    fn discover_files(&self, directory: &Path, stats: &mut ScanStats) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in WalkDir::new(directory).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map_or_else(|| directory.to_path_buf(), Path::to_path_buf);
                    let error = StorageError::Scan {
                        path: path.clone(),
                        message: e.to_string(),
                    };
                    warn!(error = %error, "Directory walk error");
                    stats.errors.push((path, e.to_string()));
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.is_supported(entry.path()) {
                continue;
            }
            // Stored paths are text and go back to the decoder verbatim
            if entry.path().to_str().is_none() {
                warn!(path = %entry.path().display(), "Skipping file with non-UTF-8 path");
                stats
                    .errors
                    .push((entry.into_path(), NON_UTF8_PATH.to_string()));
                continue;
            }
            files.push(entry.into_path());
        }
        files.sort();
        debug!(directory = %directory.display(), count = files.len(), "Discovered files");
        files
    }

    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.config
                    .extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
    }
}

/// Read tags for one file
///
/// A file without tags is still a song: it is titled after its file name.
pub fn read_song(path: &Path) -> Result<NewSong> {
    let tagged_file = lofty::read_from_path(path).map_err(|source| StorageError::Metadata {
        path: path.to_path_buf(),
        source,
    })?;

    let mut song = NewSong::untagged(path);
    let length = tagged_file.properties().duration().as_secs();
    song.length = u32::try_from(length).ok();

    let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
        return Ok(song);
    };

    if let Some(title) = tag.title().filter(|t| !t.trim().is_empty()) {
        song.title = title.into_owned();
    }
    song.artist = tag.artist().map(|a| a.into_owned());
    song.album = tag.album().map(|a| a.into_owned());
    song.track_number = tag.track();
    song.total_tracks = tag.track_total();
    Ok(song)
}
