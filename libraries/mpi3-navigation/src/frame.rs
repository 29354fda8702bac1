//! The shared frame interface

use crate::error::Result;
use crate::item::{Action, FrameContext, MenuItem};
use crate::pager::{Pager, RedrawScope};

/// One navigable screen on the menu stack
///
/// A frame owns its cursor (through its `Pager`) and exposes the rows of
/// the visible page. Frames with a back row keep it at absolute row 0.
pub trait MenuFrame: Send {
    /// Short name, used in logs
    fn title(&self) -> &str;

    fn pager(&self) -> &Pager;

    fn pager_mut(&mut self) -> &mut Pager;

    /// Items on the visible page, top to bottom
    fn visible(&self) -> &[MenuItem];

    /// Re-read the visible page after the page index changed
    fn load_page(&mut self) -> Result<()> {
        Ok(())
    }

    /// Labels of the visible page
    ///
    /// Built fresh on every call, so it can be iterated any number of times.
    fn items(&self) -> Vec<String> {
        self.visible()
            .iter()
            .map(|item| item.label().to_string())
            .collect()
    }

    /// Cursor row within the visible page
    fn cursor(&self) -> usize {
        self.pager().visible_cursor()
    }

    /// Item under the cursor
    fn selected(&self) -> Option<&MenuItem> {
        self.visible().get(self.cursor())
    }

    fn cursor_down(&mut self) -> Result<RedrawScope> {
        let saved = self.pager().clone();
        let scope = self.pager_mut().move_down();
        self.finish_move(saved, scope)
    }

    fn cursor_up(&mut self) -> Result<RedrawScope> {
        let saved = self.pager().clone();
        let scope = self.pager_mut().move_up();
        self.finish_move(saved, scope)
    }

    /// Load the new page after a page flip
    ///
    /// On failure the cursor goes back to `saved`, so it keeps pointing at
    /// the rows still on screen.
    fn finish_move(&mut self, saved: Pager, scope: RedrawScope) -> Result<RedrawScope> {
        if scope == RedrawScope::Complete {
            if let Err(e) = self.load_page() {
                *self.pager_mut() = saved;
                return Err(e);
            }
        }
        Ok(scope)
    }

    /// Activate the item under the cursor
    fn on_click(&self, context: &FrameContext) -> Result<Action> {
        match self.selected() {
            Some(item) => item.activate(context),
            None => Ok(Action::None),
        }
    }
}
