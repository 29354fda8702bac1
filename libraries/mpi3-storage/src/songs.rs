//! Queries against the `library` table
//!
//! Filters and orderings are only known at runtime, so statements are built
//! with `QueryBuilder`. Column names come from `FilterField::column`,
//! `SongField::column` and `OrderBy::column`; every value is bound.

use crate::error::{Result, StorageError};
use mpi3_core::{Filter, FilterField, OrderBy, SongField, SongId};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashMap;
use std::path::PathBuf;

/// A song as read from disk, before it has a library id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub path: PathBuf,
    /// Length in whole seconds
    pub length: Option<u32>,
    pub title: String,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub track_number: Option<u32>,
    pub total_tracks: Option<u32>,
}

impl NewSong {
    /// Song with no tags: titled after the file stem
    pub fn untagged(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            path,
            length: None,
            title,
            album: None,
            artist: None,
            track_number: None,
            total_tracks: None,
        }
    }
}

/// Append `WHERE`/`AND` clauses for `filter`
///
/// Returns whether a `WHERE` was written.
fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &Filter) -> bool {
    let mut has_where = false;
    for (field, values) in filter.iter() {
        builder.push(if has_where { " AND " } else { " WHERE " });
        has_where = true;

        builder.push(field.column()).push(" IN (");
        let mut separated = builder.separated(", ");
        for value in values {
            separated.push_bind(value.clone());
        }
        separated.push_unseparated(")");
    }
    has_where
}

/// Ordered ids matching `filter`
pub async fn get_list(
    pool: &SqlitePool,
    filter: &Filter,
    order_by: OrderBy,
    limit: Option<usize>,
    offset: usize,
) -> Result<Vec<SongId>> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT id FROM library");
    push_filter(&mut builder, filter);
    builder
        .push(" ORDER BY ")
        .push(order_by.column())
        .push(" ASC, id ASC");

    // SQLite needs a LIMIT before an OFFSET; -1 means unbounded
    match limit {
        Some(limit) => {
            builder.push(" LIMIT ").push_bind(limit as i64);
        }
        None if offset > 0 => {
            builder.push(" LIMIT -1");
        }
        None => {}
    }
    if offset > 0 {
        builder.push(" OFFSET ").push_bind(offset as i64);
    }

    let ids: Vec<i64> = builder.build_query_scalar().fetch_all(pool).await?;
    Ok(ids.into_iter().map(SongId::new).collect())
}

/// Number of songs matching `filter`
pub async fn get_count(pool: &SqlitePool, filter: &Filter) -> Result<usize> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM library");
    push_filter(&mut builder, filter);
    let count: i64 = builder.build_query_scalar().fetch_one(pool).await?;
    Ok(count as usize)
}

/// One field for each id, as text; NULLs and unknown ids are left out
pub async fn get_by_id(
    pool: &SqlitePool,
    ids: &[SongId],
    field: SongField,
) -> Result<HashMap<SongId, String>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let column = field.column();
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT id, CAST(");
    builder
        .push(column)
        .push(" AS TEXT) FROM library WHERE ")
        .push(column)
        .push(" IS NOT NULL AND id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.as_i64());
    }
    separated.push_unseparated(")");

    let rows: Vec<(i64, String)> = builder.build_query_as().fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|(id, value)| (SongId::new(id), value))
        .collect())
}

/// Distinct non-NULL values of `field` among songs matching `filter`
pub async fn get_values(
    pool: &SqlitePool,
    field: FilterField,
    filter: &Filter,
) -> Result<Vec<String>> {
    let column = field.column();
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT DISTINCT ");
    builder.push(column).push(" FROM library");
    let has_where = push_filter(&mut builder, filter);
    builder
        .push(if has_where { " AND " } else { " WHERE " })
        .push(column)
        .push(" IS NOT NULL ORDER BY ")
        .push(column)
        .push(" ASC");

    let values: Vec<String> = builder.build_query_scalar().fetch_all(pool).await?;
    Ok(values)
}

/// Insert songs in one transaction, ignoring paths already present
///
/// Returns the number of rows actually added.
pub async fn insert_batch(pool: &SqlitePool, songs: &[NewSong]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut added = 0u64;

    for song in songs {
        let Some(path) = song.path.to_str() else {
            return Err(StorageError::Scan {
                path: song.path.clone(),
                message: "path is not valid UTF-8".to_string(),
            });
        };
        let sortable = mpi3_core::sortable_title(&song.title);
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO library
                (filepath, length, title, sortable_title, album, artist, track_number, total_tracks)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(path)
        .bind(song.length.map(i64::from))
        .bind(&song.title)
        .bind(sortable)
        .bind(&song.album)
        .bind(&song.artist)
        .bind(song.track_number.map(i64::from))
        .bind(song.total_tracks.map(i64::from))
        .execute(&mut *tx)
        .await?;
        added += result.rows_affected();
    }

    tx.commit().await?;
    Ok(added as usize)
}

/// Remove every song
pub async fn delete_all(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM library").execute(pool).await?;
    Ok(result.rows_affected())
}
