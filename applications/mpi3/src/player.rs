//! Startup wiring and the main loop

use crate::buttons::Button;
use crate::config::PlayerConfig;
use crate::controller::{Controller, SharedController};
use crate::error::Result;
use crate::render::Renderer;
use crossbeam_channel::{select, tick, Receiver};
use mpi3_core::{Filter, Library};
use mpi3_navigation::{FrameContext, MenuStack, RedrawScope};
use mpi3_playback::{
    DecoderBackend, Mixer, PlaybackProcessController, SongQueue, VolumeController, VolumeTable,
};
use mpi3_storage::{LibraryScanner, ScanConfig, SqliteLibrary};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Open the song library, scanning the music directories when asked
///
/// `rescan` empties the library first; `scan_on_start` only adds new files.
pub fn open_library(config: &PlayerConfig, rescan: bool) -> Result<SqliteLibrary> {
    let settings = &config.library;
    let library = SqliteLibrary::open(&settings.database)?;

    if rescan || settings.scan_on_start {
        let scanner = LibraryScanner::with_config(ScanConfig {
            extensions: settings.extensions.clone(),
            ..ScanConfig::default()
        });
        let stats = scanner.scan(&library, &settings.directories, rescan)?;
        info!(
            discovered = stats.files_discovered,
            added = stats.songs_added,
            skipped = stats.songs_skipped,
            removed = stats.songs_removed,
            errors = stats.errors.len(),
            "Library scan complete"
        );
        for (path, message) in &stats.errors {
            warn!(path = %path.display(), %message, "Skipped file during scan");
        }
    }

    Ok(library)
}

/// Build the controller from configuration and injected collaborators
///
/// The queue starts out holding the whole library.
pub fn build_controller(
    config: &PlayerConfig,
    library: Arc<dyn Library>,
    mixer: Box<dyn Mixer>,
    backend: Box<dyn DecoderBackend>,
    renderer: Box<dyn Renderer>,
) -> Result<Controller> {
    let page_size = config.page_size();

    let table = VolumeTable::build(
        config.volume.low_step,
        config.volume.low_ceiling,
        config.volume.high_step,
    )?;
    let volume = VolumeController::new(table, config.volume.default, mixer);

    let mut queue = SongQueue::new(
        Arc::clone(&library),
        page_size,
        config.playback.shuffle_history,
    );
    queue.refresh(Filter::new())?;

    let context = FrameContext::new(library, page_size, config.menu.shell_actions.clone());
    let menu = MenuStack::with_home(context);

    let decoder = PlaybackProcessController::new(
        backend,
        Duration::from_millis(config.playback.status_timeout_ms),
    )?;

    info!(page_size, songs = queue.len(), "Player ready");
    Ok(Controller::new(menu, queue, volume, decoder, renderer))
}

/// Dispatch button presses and heartbeats until button input closes
///
/// Presses that arrived while the previous one was being handled are
/// dropped rather than replayed.
pub fn run(controller: &SharedController, buttons: &Receiver<Button>, heartbeat: Duration) {
    let ticker = tick(heartbeat);
    controller.lock().render(RedrawScope::Complete);

    loop {
        select! {
            recv(buttons) -> message => {
                let Ok(button) = message else {
                    info!("Button input closed, shutting down");
                    break;
                };
                controller.press(button);
                let dropped = buttons.try_iter().count();
                if dropped > 0 {
                    debug!(dropped, "Dropped button presses received while busy");
                }
            }
            recv(ticker) -> _ => controller.tick(),
        }
    }
}
