//! Button dispatch
//!
//! The `Controller` owns every piece of player state and gives each button
//! a meaning that depends on the UI mode:
//!
//! | Mode     | up / down          | select      | play / volume              |
//! |----------|--------------------|-------------|----------------------------|
//! | NORMAL   | move menu cursor   | click item  | enter PLAYBACK / VOLUME    |
//! | VOLUME   | volume up / down   | mute toggle | next playback mode, NORMAL |
//! | PLAYBACK | next / previous    | pause       | next playback mode, NORMAL |

use crate::buttons::Button;
use crate::error::{AppError, Result};
use crate::render::{title_line, Renderer};
use mpi3_core::SongId;
use mpi3_navigation::{ClickOutcome, MenuStack, RedrawScope, ShellAction};
use mpi3_playback::{
    DecoderState, Direction, PlaybackMode, PlaybackModeCycle, PlaybackProcessController,
    SongQueue, VolumeController,
};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use tracing::{debug, error, info, warn};

/// What the up/down/select/play/volume buttons currently do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    #[default]
    Normal,
    Volume,
    Playback,
}

impl UiMode {
    /// Title-line marker, if the mode shows one
    pub fn marker(self) -> Option<char> {
        match self {
            UiMode::Normal => None,
            UiMode::Volume => Some('V'),
            UiMode::Playback => Some('P'),
        }
    }
}

type ShellRunner = Box<dyn FnMut(&ShellAction) -> bool + Send>;

/// Event dispatcher tying buttons to the menu, queue, volume and decoder
pub struct Controller {
    menu: MenuStack,
    queue: SongQueue,
    volume: VolumeController,
    modes: PlaybackModeCycle,
    decoder: PlaybackProcessController,
    renderer: Box<dyn Renderer>,
    shell: ShellRunner,
    ui_mode: UiMode,
}

impl Controller {
    pub fn new(
        menu: MenuStack,
        queue: SongQueue,
        volume: VolumeController,
        decoder: PlaybackProcessController,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        Self {
            menu,
            queue,
            volume,
            modes: PlaybackModeCycle::default(),
            decoder,
            renderer,
            shell: Box::new(crate::shell::run),
            ui_mode: UiMode::Normal,
        }
    }

    /// Replace how settings-menu shell actions are run
    pub fn with_shell_runner(
        mut self,
        runner: impl FnMut(&ShellAction) -> bool + Send + 'static,
    ) -> Self {
        self.shell = Box::new(runner);
        self
    }

    pub fn ui_mode(&self) -> UiMode {
        self.ui_mode
    }

    pub fn playback_mode(&self) -> PlaybackMode {
        self.modes.current()
    }

    pub fn menu(&self) -> &MenuStack {
        &self.menu
    }

    pub fn queue(&self) -> &SongQueue {
        &self.queue
    }

    pub fn volume(&self) -> &VolumeController {
        &self.volume
    }

    pub fn decoder_state(&self) -> DecoderState {
        self.decoder.state()
    }

    /// Current title line
    pub fn title(&self) -> String {
        title_line(
            self.modes.glyph(),
            self.ui_mode.marker(),
            &chrono::Local::now(),
            self.volume.current(),
        )
    }

    /// Draw the active menu frame
    pub fn render(&mut self, scope: RedrawScope) {
        let title = self.title();
        let frame = self.menu.peek();
        let items = frame.items();
        let cursor = frame.cursor();
        self.renderer.render(&title, &items, cursor, scope);
    }

    /// Show an error screen in place of the menu
    pub fn render_error(&mut self, message: &str) {
        self.renderer.render_error(message);
    }

    /// Act on one button press
    pub fn handle(&mut self, button: Button) -> Result<()> {
        debug!(%button, mode = ?self.ui_mode, "Button pressed");
        match self.ui_mode {
            UiMode::Normal => self.handle_normal(button),
            UiMode::Volume => self.handle_volume(button),
            UiMode::Playback => self.handle_playback(button),
        }
    }

    fn handle_normal(&mut self, button: Button) -> Result<()> {
        match button {
            Button::Up => {
                let scope = self.menu.cursor_up()?;
                self.render(scope);
            }
            Button::Down => {
                let scope = self.menu.cursor_down()?;
                self.render(scope);
            }
            Button::Select => self.click()?,
            Button::Play => self.enter_mode(UiMode::Playback),
            Button::Volume => self.enter_mode(UiMode::Volume),
        }
        Ok(())
    }

    fn handle_volume(&mut self, button: Button) -> Result<()> {
        match button {
            Button::Up => {
                self.volume.increase();
            }
            Button::Down => {
                self.volume.decrease();
            }
            Button::Select => {
                self.volume.mute();
            }
            Button::Play | Button::Volume => {
                self.cycle_playback_mode();
                return Ok(());
            }
        }
        self.render(RedrawScope::Complete);
        Ok(())
    }

    fn handle_playback(&mut self, button: Button) -> Result<()> {
        let result = match button {
            Button::Up => self.change_song(Direction::Forward),
            Button::Down => self.change_song(Direction::Backward),
            Button::Select => self.decoder.pause().map(|_| ()).map_err(AppError::from),
            Button::Play | Button::Volume => {
                self.cycle_playback_mode();
                return Ok(());
            }
        };
        self.render(RedrawScope::Complete);
        result
    }

    fn enter_mode(&mut self, mode: UiMode) {
        debug!(from = ?self.ui_mode, to = ?mode, "UI mode changed");
        self.ui_mode = mode;
        self.render(RedrawScope::Complete);
    }

    fn cycle_playback_mode(&mut self) {
        let mode = self.modes.next();
        info!(%mode, "Playback mode changed");
        self.enter_mode(UiMode::Normal);
    }

    fn click(&mut self) -> Result<()> {
        match self.menu.on_click()? {
            ClickOutcome::Navigated(scope) => self.render(scope),
            ClickOutcome::Play { filter, index } => {
                self.queue.refresh(filter)?;
                let result = match self.queue.seek(index)? {
                    Some(id) => self.play_skipping_missing(id, Direction::Forward),
                    None => Ok(()),
                };
                self.render(RedrawScope::Complete);
                result?;
            }
            ClickOutcome::Shell(action) => {
                (self.shell)(&action);
                self.render(RedrawScope::Partial);
            }
        }
        Ok(())
    }

    /// Move the queue one song in `direction` and play it
    ///
    /// Running off the end going forward stops playback; going backward
    /// leaves the current song alone.
    pub fn change_song(&mut self, direction: Direction) -> Result<()> {
        match self.advance(direction)? {
            Some(id) => self.play_skipping_missing(id, direction),
            None if direction == Direction::Forward => {
                info!("End of queue, stopping");
                self.decoder.stop()?;
                Ok(())
            }
            None => {
                debug!("Start of queue, nothing to go back to");
                Ok(())
            }
        }
    }

    fn advance(&mut self, direction: Direction) -> Result<Option<SongId>> {
        Ok(self.queue.advance(direction, self.modes.current())?)
    }

    /// Play `id`; songs missing from the library are skipped in `direction`
    fn play_skipping_missing(&mut self, id: SongId, direction: Direction) -> Result<()> {
        let mut next = Some(id);
        // Every song in the queue is tried at most once
        for _ in 0..self.queue.len().max(1) {
            let Some(id) = next else {
                if direction == Direction::Forward {
                    self.decoder.stop()?;
                }
                return Ok(());
            };
            match self.play_id(id) {
                Err(e) if e.is_no_such_song() => {
                    warn!(%id, "Song missing from library, skipping");
                    next = self.advance(direction)?;
                }
                other => return other,
            }
        }
        warn!("No playable song found in queue, stopping");
        self.decoder.stop()?;
        Ok(())
    }

    fn play_id(&mut self, id: SongId) -> Result<()> {
        let path = self.queue.library().get_path(id)?;
        self.decoder.play(&path)?;
        Ok(())
    }

    /// Heartbeat: poll the decoder, follow finished tracks, refresh the title
    pub fn tick(&mut self) -> Result<()> {
        let result = if self.decoder.poll_status() == DecoderState::Done {
            debug!("Track finished");
            self.change_song(Direction::Forward)
        } else {
            Ok(())
        };
        self.render(RedrawScope::Partial);
        result
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("ui_mode", &self.ui_mode)
            .field("playback_mode", &self.modes.current())
            .field("menu", &self.menu)
            .field("queue", &self.queue)
            .field("volume", &self.volume)
            .field("decoder", &self.decoder)
            .finish_non_exhaustive()
    }
}

/// Controller behind the single update lock
///
/// Button presses that find the lock held are dropped, so a press during a
/// render never queues up behind it. Heartbeat ticks wait for the lock.
#[derive(Clone)]
pub struct SharedController {
    inner: Arc<Mutex<Controller>>,
}

impl SharedController {
    pub fn new(controller: Controller) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    /// Handle a press unless another update is running
    ///
    /// Returns whether the press was handled.
    pub fn press(&self, button: Button) -> bool {
        let mut controller = match self.inner.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => {
                debug!(%button, "Busy, dropping button press");
                return false;
            }
            Err(TryLockError::Poisoned(poisoned)) => {
                warn!("Controller lock poisoned, recovering");
                poisoned.into_inner()
            }
        };
        if let Err(e) = controller.handle(button) {
            error!(%button, error = %e, "Button action failed");
        }
        true
    }

    /// Run one heartbeat
    pub fn tick(&self) {
        if let Err(e) = self.lock().tick() {
            error!(error = %e, "Heartbeat failed");
        }
    }

    /// Block until the controller is free, then borrow it
    pub fn lock(&self) -> MutexGuard<'_, Controller> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("Controller lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl std::fmt::Debug for SharedController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedController").finish_non_exhaustive()
    }
}
