//! mpi3 - Player Application
//!
//! Wires the library, playback and navigation crates to buttons, a display
//! and the system mixer.
//!
//! This crate provides:
//! - `PlayerConfig`: TOML + environment configuration
//! - `Controller`: the button dispatcher with its NORMAL/VOLUME/PLAYBACK modes
//! - Button sources (stdin, sysfs GPIO), the console renderer and the
//!   `amixer` mixer
//! - `player::run`: the heartbeat loop

pub mod buttons;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod mixer;
pub mod player;
pub mod render;
pub mod shell;

pub use buttons::Button;
pub use config::PlayerConfig;
pub use controller::{Controller, SharedController, UiMode};
pub use error::{AppError, Result};
pub use render::{ConsoleRenderer, Renderer};
