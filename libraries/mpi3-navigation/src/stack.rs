//! Menu stack
//!
//! LIFO stack of frames with the home frame at the bottom. The stack is
//! never empty and the home frame is never popped.

use crate::error::Result;
use crate::frame::MenuFrame;
use crate::frames::HomeFrame;
use crate::item::{Action, FrameContext, ShellAction};
use crate::pager::RedrawScope;
use mpi3_core::Filter;
use tracing::{debug, warn};

/// What a click asks of the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The menu changed (frame pushed, popped, or nothing at all)
    Navigated(RedrawScope),
    /// Adopt `filter` as the playback queue and play the song at `index`
    Play { filter: Filter, index: usize },
    /// Run a shell command
    Shell(ShellAction),
}

/// Stack of navigable frames
pub struct MenuStack {
    frames: Vec<Box<dyn MenuFrame>>,
    context: FrameContext,
}

impl MenuStack {
    /// Stack holding only `home`
    pub fn new(home: Box<dyn MenuFrame>, context: FrameContext) -> Self {
        Self {
            frames: vec![home],
            context,
        }
    }

    /// Stack rooted at the standard home menu
    pub fn with_home(context: FrameContext) -> Self {
        let home = HomeFrame::new(context.page_size);
        Self::new(Box::new(home), context)
    }

    /// Active frame
    pub fn peek(&self) -> &dyn MenuFrame {
        // The stack always holds the home frame
        self.frames[self.frames.len() - 1].as_ref()
    }

    fn peek_mut(&mut self) -> &mut dyn MenuFrame {
        let top = self.frames.len() - 1;
        self.frames[top].as_mut()
    }

    /// Number of frames, home included
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Context frames are built with
    pub fn context(&self) -> &FrameContext {
        &self.context
    }

    /// Open a frame on top
    pub fn push(&mut self, frame: Box<dyn MenuFrame>) -> RedrawScope {
        debug!(frame = frame.title(), depth = self.frames.len() + 1, "Menu push");
        self.frames.push(frame);
        RedrawScope::Complete
    }

    /// Return to the previous frame
    ///
    /// At the home frame this does nothing beyond a partial redraw.
    pub fn pop(&mut self) -> RedrawScope {
        if self.frames.len() <= 1 {
            warn!("Back pressed at the home menu, ignoring");
            return RedrawScope::Partial;
        }
        if let Some(frame) = self.frames.pop() {
            debug!(frame = frame.title(), depth = self.frames.len(), "Menu pop");
        }
        RedrawScope::Complete
    }

    pub fn cursor_down(&mut self) -> Result<RedrawScope> {
        self.peek_mut().cursor_down()
    }

    pub fn cursor_up(&mut self) -> Result<RedrawScope> {
        self.peek_mut().cursor_up()
    }

    /// Activate the item under the active frame's cursor
    pub fn on_click(&mut self) -> Result<ClickOutcome> {
        let action = self.peek().on_click(&self.context)?;
        Ok(match action {
            Action::None => ClickOutcome::Navigated(RedrawScope::Partial),
            Action::Push(frame) => ClickOutcome::Navigated(self.push(frame)),
            Action::Back => ClickOutcome::Navigated(self.pop()),
            Action::Play { filter, index } => ClickOutcome::Play { filter, index },
            Action::Shell(action) => ClickOutcome::Shell(action),
        })
    }
}

impl std::fmt::Debug for MenuStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let titles: Vec<&str> = self.frames.iter().map(|frame| frame.title()).collect();
        f.debug_struct("MenuStack")
            .field("frames", &titles)
            .finish_non_exhaustive()
    }
}
