//! Paged song queue
//!
//! The queue is a filtered, ordered view of the library plus a cursor. Only
//! one page of ids is held in memory:
//!
//! ```text
//! library (filtered, ordered):  [ 0 1 2 3 | 4 5 6 7 | 8 9 ]
//!                                           ^^^^^^^ cached page (page = 1)
//!                                             ^ cursor_position = 5
//! ```
//!
//! The cached page is always `cursor_position / page_size`; moving the
//! cursor off it re-queries the library for the new page.

use crate::error::Result;
use crate::history::ShuffleHistory;
use crate::shuffle;
use crate::types::{Direction, PlaybackMode};
use mpi3_core::{Filter, Library, OrderBy, SongId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{debug, warn};

/// Song queue (playlist) over a filtered library view
pub struct SongQueue {
    library: Arc<dyn Library>,

    /// Active filter
    filter: Filter,

    /// Ordering derived from the filter at refresh time
    order_by: OrderBy,

    /// Rows per page
    page_size: usize,

    /// Index of the cached page
    page: usize,

    /// Ids of the cached page
    page_ids: Vec<SongId>,

    /// Songs matching the filter
    len: usize,

    /// Absolute index into the filtered list
    cursor_position: usize,

    /// Whether `refresh` has run at least once
    refreshed: bool,

    /// Indices left by shuffle draws
    history: ShuffleHistory,

    rng: StdRng,
}

impl SongQueue {
    /// Create an empty queue
    ///
    /// The queue holds nothing until `refresh` is called.
    pub fn new(library: Arc<dyn Library>, page_size: usize, history_size: usize) -> Self {
        if page_size == 0 {
            warn!("Queue page size of 0 requested, using 1");
        }
        Self {
            library,
            filter: Filter::new(),
            order_by: OrderBy::SortableTitle,
            page_size: page_size.max(1),
            page: 0,
            page_ids: Vec::new(),
            len: 0,
            cursor_position: 0,
            refreshed: false,
            history: ShuffleHistory::new(history_size),
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a seeded random source for shuffle draws
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Re-query the library for `filter`
    ///
    /// Resets the cursor to 0 and forgets shuffle history.
    pub fn refresh(&mut self, filter: Filter) -> Result<()> {
        let order_by = filter.order_by();
        let len = self.library.get_count(&filter)?;

        self.filter = filter;
        self.order_by = order_by;
        self.len = len;
        self.cursor_position = 0;
        self.history.clear();
        self.refreshed = true;
        self.load_page(0)?;

        debug!(len, ?order_by, "Queue refreshed");
        Ok(())
    }

    /// Jump to an absolute index
    ///
    /// Used when a song is picked from a menu. Out-of-range indices are
    /// ignored with a warning.
    pub fn seek(&mut self, index: usize) -> Result<Option<SongId>> {
        if !self.refreshed {
            warn!("Seek on a queue that was never refreshed");
            return Ok(None);
        }
        if index >= self.len {
            warn!(index, len = self.len, "Seek past end of queue");
            return Ok(None);
        }
        self.move_to(index)?;
        Ok(self.current_id())
    }

    /// Step the cursor under `mode`
    ///
    /// Returns the id at the new cursor, or `None` when there is nowhere to
    /// go (end of a NORMAL queue, empty queue, empty shuffle history). The
    /// cursor does not move when `None` is returned.
    pub fn advance(&mut self, direction: Direction, mode: PlaybackMode) -> Result<Option<SongId>> {
        if !self.refreshed {
            warn!("Advance on a queue that was never refreshed");
            return Ok(None);
        }
        if self.len == 0 {
            return Ok(None);
        }

        let cursor = self.cursor_position;
        let len = self.len;
        let target = match (mode, direction) {
            (PlaybackMode::Normal, Direction::Forward) => (cursor + 1 < len).then_some(cursor + 1),
            (PlaybackMode::Normal, Direction::Backward) => cursor.checked_sub(1),
            (PlaybackMode::Loop, Direction::Forward) => Some((cursor + 1) % len),
            (PlaybackMode::Loop, Direction::Backward) => Some((cursor + len - 1) % len),
            (PlaybackMode::Repeat, _) => Some(cursor),
            (PlaybackMode::Shuffle, Direction::Forward) => {
                Some(shuffle::draw_index(&mut self.rng, len, cursor))
            }
            (PlaybackMode::Shuffle, Direction::Backward) => self.pop_history(),
        };

        let Some(target) = target else {
            debug!(?mode, ?direction, cursor, "No song to advance to");
            return Ok(None);
        };

        // History only changes once the move has gone through
        let shuffle = mode == PlaybackMode::Shuffle;
        if let Err(e) = self.move_to(target) {
            if shuffle && direction == Direction::Backward {
                self.history.push(target);
            }
            return Err(e);
        }
        if shuffle && direction == Direction::Forward {
            self.history.push(cursor);
        }
        Ok(self.current_id())
    }

    /// Id at the cursor, `None` if the queue is empty
    pub fn current_id(&self) -> Option<SongId> {
        let start = self.page * self.page_size;
        self.cursor_position
            .checked_sub(start)
            .and_then(|offset| self.page_ids.get(offset))
            .copied()
    }

    /// Absolute cursor index
    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    /// Index of the cached page
    pub fn page(&self) -> usize {
        self.page
    }

    /// Rows per page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Ids of the cached page
    pub fn page_ids(&self) -> &[SongId] {
        &self.page_ids
    }

    /// Songs in the queue
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `refresh` has been called
    pub fn is_refreshed(&self) -> bool {
        self.refreshed
    }

    /// Active filter
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// The library this queue reads from
    pub fn library(&self) -> &Arc<dyn Library> {
        &self.library
    }

    /// Shuffle history depth
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn pop_history(&mut self) -> Option<usize> {
        // Entries can outlive a shrinking library; skip any that no longer fit
        while let Some(index) = self.history.pop() {
            if index < self.len {
                return Some(index);
            }
        }
        None
    }

    fn move_to(&mut self, index: usize) -> Result<()> {
        let page = index / self.page_size;
        if page != self.page {
            self.load_page(page)?;
        }
        self.cursor_position = index;
        Ok(())
    }

    fn load_page(&mut self, page: usize) -> Result<()> {
        let offset = page * self.page_size;
        self.page_ids =
            self.library
                .get_list(&self.filter, self.order_by, Some(self.page_size), offset)?;
        self.page = page;
        debug!(page, rows = self.page_ids.len(), "Queue page loaded");
        Ok(())
    }
}

impl std::fmt::Debug for SongQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SongQueue")
            .field("filter", &self.filter)
            .field("len", &self.len)
            .field("page", &self.page)
            .field("page_size", &self.page_size)
            .field("cursor_position", &self.cursor_position)
            .finish_non_exhaustive()
    }
}
