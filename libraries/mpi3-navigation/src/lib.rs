//! mpi3 - Menu Navigation
//!
//! Button-driven menus for a small paged display.
//!
//! This crate provides:
//! - `MenuStack`: push/pop of frames with the home frame pinned at the bottom
//! - `MenuFrame`: the shared frame interface (items, cursor moves, click)
//! - Frames: `HomeFrame`, `SongListFrame`, `CategoryFrame`, `SettingsFrame`
//! - `MenuItem`: one tagged type for every selectable row
//! - `RedrawScope`: whether a change needs a partial or full refresh
//!
//! Frames read from an injected `mpi3_core::Library`; nothing here draws.
//!
//! # Example
//!
//! ```rust
//! use mpi3_core::MemoryLibrary;
//! use mpi3_navigation::{ClickOutcome, FrameContext, MenuStack, RedrawScope};
//! use std::sync::Arc;
//!
//! let context = FrameContext::new(Arc::new(MemoryLibrary::numbered(1, 20)), 6, Vec::new());
//! let mut stack = MenuStack::with_home(context);
//!
//! // "Songs" is the first home row
//! let outcome = stack.on_click().unwrap();
//! assert_eq!(outcome, ClickOutcome::Navigated(RedrawScope::Complete));
//! assert_eq!(stack.peek().title(), "Songs");
//! ```

pub mod error;
pub mod frame;
pub mod frames;
pub mod item;
pub mod pager;
pub mod stack;

pub use error::{NavigationError, Result};
pub use frame::MenuFrame;
pub use frames::{CategoryFrame, HomeFrame, SettingsFrame, SongListFrame};
pub use item::{Action, FrameContext, MenuItem, MenuTarget, ShellAction, BACK_LABEL};
pub use pager::{Pager, RedrawScope};
pub use stack::{ClickOutcome, MenuStack};
