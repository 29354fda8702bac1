//! Cursor and page bookkeeping for a list of rows

use std::ops::Range;

/// How much of the display a change invalidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedrawScope {
    /// Only the cursor or row text changed; a fast partial refresh will do
    Partial,
    /// Frame or page changed; needs a full refresh
    Complete,
}

impl RedrawScope {
    /// The wider of two scopes
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        if self == Self::Complete || other == Self::Complete {
            Self::Complete
        } else {
            Self::Partial
        }
    }
}

/// Absolute cursor over `rows` rows shown `page_size` at a time
///
/// The cursor saturates at both ends. The visible page is always
/// `cursor / page_size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    rows: usize,
    page_size: usize,
    cursor: usize,
}

impl Pager {
    /// Pager at row 0
    pub fn new(rows: usize, page_size: usize) -> Self {
        Self {
            rows,
            page_size: page_size.max(1),
            cursor: 0,
        }
    }

    /// Absolute cursor row
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Rows per page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Index of the visible page
    pub fn page(&self) -> usize {
        self.cursor / self.page_size
    }

    /// Absolute rows on the visible page
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.page() * self.page_size;
        start..(start + self.page_size).min(self.rows)
    }

    /// Cursor position within the visible page
    pub fn visible_cursor(&self) -> usize {
        self.cursor - self.page() * self.page_size
    }

    /// Move down one row
    ///
    /// `Complete` when the move crosses onto the next page, `Partial`
    /// otherwise (including the no-op at the last row).
    pub fn move_down(&mut self) -> RedrawScope {
        if self.cursor + 1 >= self.rows {
            return RedrawScope::Partial;
        }
        self.move_to(self.cursor + 1)
    }

    /// Move up one row
    pub fn move_up(&mut self) -> RedrawScope {
        match self.cursor.checked_sub(1) {
            Some(row) => self.move_to(row),
            None => RedrawScope::Partial,
        }
    }

    fn move_to(&mut self, row: usize) -> RedrawScope {
        let page = self.page();
        self.cursor = row;
        if self.page() == page {
            RedrawScope::Partial
        } else {
            RedrawScope::Complete
        }
    }
}
