//! Menu items and what activating them does
//!
//! Every selectable row is a `MenuItem`. Activation never mutates the menu
//! directly; it returns an `Action` for the stack (push, pop) or the
//! player (play, run a shell command) to carry out.

use crate::error::Result;
use crate::frame::MenuFrame;
use crate::frames::{CategoryFrame, SettingsFrame, SongListFrame};
use mpi3_core::{Filter, FilterField, Library, SongId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Label of the synthetic back row
pub const BACK_LABEL: &str = "<- Back";

/// A configured shell command shown in the settings menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellAction {
    /// Row text
    pub label: String,
    /// Command line passed to `sh -c`
    pub command: String,
}

impl ShellAction {
    pub fn new(label: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            command: command.into(),
        }
    }
}

/// What frames need to build their contents and children
#[derive(Clone)]
pub struct FrameContext {
    pub library: Arc<dyn Library>,
    pub page_size: usize,
    pub shell_actions: Vec<ShellAction>,
}

impl FrameContext {
    pub fn new(library: Arc<dyn Library>, page_size: usize, shell_actions: Vec<ShellAction>) -> Self {
        Self {
            library,
            page_size: page_size.max(1),
            shell_actions,
        }
    }
}

impl fmt::Debug for FrameContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameContext")
            .field("page_size", &self.page_size)
            .field("shell_actions", &self.shell_actions)
            .finish_non_exhaustive()
    }
}

/// Frame a submenu row opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuTarget {
    /// Songs matching a filter
    Songs { title: String, filter: Filter },
    /// Distinct values of a field under a filter
    Category { field: FilterField, filter: Filter },
    /// Shell actions
    Settings,
}

impl MenuTarget {
    /// Build the frame
    pub fn open(&self, context: &FrameContext) -> Result<Box<dyn MenuFrame>> {
        Ok(match self {
            Self::Songs { title, filter } => Box::new(SongListFrame::new(
                title.clone(),
                filter.clone(),
                context,
            )?),
            Self::Category { field, filter } => {
                Box::new(CategoryFrame::new(*field, filter.clone(), context)?)
            }
            Self::Settings => Box::new(SettingsFrame::new(context)),
        })
    }
}

/// A selectable menu row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    /// Return to the previous frame
    Back,

    /// A song in a song list
    Song {
        id: SongId,
        title: String,
        /// Filter of the list the song appears in
        filter: Filter,
        /// Position of the song within that list
        index: usize,
    },

    /// Opens another frame
    SubMenu { label: String, target: MenuTarget },

    /// Runs a shell command
    ShellAction(ShellAction),
}

impl MenuItem {
    /// Row text
    pub fn label(&self) -> &str {
        match self {
            Self::Back => BACK_LABEL,
            Self::Song { title, .. } => title,
            Self::SubMenu { label, .. } => label,
            Self::ShellAction(action) => &action.label,
        }
    }

    /// What selecting this row does
    pub fn activate(&self, context: &FrameContext) -> Result<Action> {
        Ok(match self {
            Self::Back => Action::Back,
            Self::Song { filter, index, .. } => Action::Play {
                filter: filter.clone(),
                index: *index,
            },
            Self::SubMenu { target, .. } => Action::Push(target.open(context)?),
            Self::ShellAction(action) => Action::Shell(action.clone()),
        })
    }
}

/// Result of activating a menu item
pub enum Action {
    /// Nothing to do (empty frame)
    None,
    /// Open a new frame
    Push(Box<dyn MenuFrame>),
    /// Leave the current frame
    Back,
    /// Adopt `filter` as the playback queue and play the song at `index`
    Play { filter: Filter, index: usize },
    /// Run a shell command
    Shell(ShellAction),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Push(frame) => f.debug_tuple("Push").field(&frame.title()).finish(),
            Self::Back => write!(f, "Back"),
            Self::Play { filter, index } => f
                .debug_struct("Play")
                .field("filter", filter)
                .field("index", index)
                .finish(),
            Self::Shell(action) => f.debug_tuple("Shell").field(action).finish(),
        }
    }
}
