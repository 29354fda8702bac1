use crate::error::Result;
use crate::frame::MenuFrame;
use crate::item::{FrameContext, MenuItem};
use crate::pager::Pager;
use mpi3_core::{Filter, Library, OrderBy, SongField};
use std::sync::Arc;
use tracing::debug;

/// Songs matching a filter, one page in memory at a time
///
/// Row 0 is the back row; row `n` is song `n - 1` of the filtered list in
/// the filter's order.
pub struct SongListFrame {
    title: String,
    library: Arc<dyn Library>,
    filter: Filter,
    order_by: OrderBy,
    pager: Pager,
    visible: Vec<MenuItem>,
}

impl SongListFrame {
    pub fn new(title: impl Into<String>, filter: Filter, context: &FrameContext) -> Result<Self> {
        let count = context.library.get_count(&filter)?;
        let mut frame = Self {
            title: title.into(),
            library: Arc::clone(&context.library),
            order_by: filter.order_by(),
            filter,
            pager: Pager::new(count + 1, context.page_size),
            visible: Vec::new(),
        };
        frame.load_page()?;
        Ok(frame)
    }

    /// Filter this list shows
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Songs in the list (excluding the back row)
    pub fn song_count(&self) -> usize {
        self.pager.rows().saturating_sub(1)
    }
}

impl MenuFrame for SongListFrame {
    fn title(&self) -> &str {
        &self.title
    }

    fn pager(&self) -> &Pager {
        &self.pager
    }

    fn pager_mut(&mut self) -> &mut Pager {
        &mut self.pager
    }

    fn visible(&self) -> &[MenuItem] {
        &self.visible
    }

    fn load_page(&mut self) -> Result<()> {
        let rows = self.pager.visible_range();
        let mut visible = Vec::with_capacity(rows.len());
        if rows.start == 0 && !rows.is_empty() {
            visible.push(MenuItem::Back);
        }

        // Song rows are shifted by one for the back row
        let first_song_row = rows.start.max(1);
        if first_song_row < rows.end {
            let offset = first_song_row - 1;
            let count = rows.end - first_song_row;
            let ids = self
                .library
                .get_list(&self.filter, self.order_by, Some(count), offset)?;
            let mut titles = self.library.get_by_id(&ids, SongField::Title)?;

            for (position, id) in ids.into_iter().enumerate() {
                let title = titles.remove(&id).unwrap_or_else(|| format!("#{id}"));
                visible.push(MenuItem::Song {
                    id,
                    title,
                    filter: self.filter.clone(),
                    index: offset + position,
                });
            }
        }

        debug!(frame = %self.title, page = self.pager.page(), rows = visible.len(), "Song page loaded");
        self.visible = visible;
        Ok(())
    }
}

impl std::fmt::Debug for SongListFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SongListFrame")
            .field("title", &self.title)
            .field("filter", &self.filter)
            .field("pager", &self.pager)
            .finish_non_exhaustive()
    }
}
