//! Controller tests against an in-memory library and a scripted decoder

use crossbeam_channel::unbounded;
use mpi3::config::PlayerConfig;
use mpi3::{player, Button, Controller, Renderer, SharedController, UiMode};
use mpi3_core::{Filter, FilterField, Library, MemoryLibrary, OrderBy, SongField, SongId};
use mpi3_navigation::{RedrawScope, ShellAction};
use mpi3_playback::testing::ScriptedBackend;
use mpi3_playback::{DecoderState, Mixer, PlaybackMode};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
struct Screen {
    title: String,
    rows: Vec<String>,
    cursor: usize,
    scope: RedrawScope,
}

#[derive(Clone, Default)]
struct RecordingRenderer {
    screens: Arc<Mutex<Vec<Screen>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl RecordingRenderer {
    fn last(&self) -> Screen {
        self.screens.lock().unwrap().last().cloned().unwrap()
    }

    fn count(&self) -> usize {
        self.screens.lock().unwrap().len()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, title: &str, rows: &[String], cursor: usize, scope: RedrawScope) {
        self.screens.lock().unwrap().push(Screen {
            title: title.to_string(),
            rows: rows.to_vec(),
            cursor,
            scope,
        });
    }

    fn render_error(&mut self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

#[derive(Clone, Default)]
struct RecordingMixer {
    levels: Arc<Mutex<Vec<u8>>>,
}

impl Mixer for RecordingMixer {
    fn set_volume(&mut self, percent: u8) -> mpi3_playback::Result<()> {
        self.levels.lock().unwrap().push(percent);
        Ok(())
    }
}

/// Library whose path lookup misses one song
/// Library whose `missing` songs have no path
struct GappyLibrary {
    inner: MemoryLibrary,
    missing: Mutex<Vec<SongId>>,
}

impl GappyLibrary {
    fn new(inner: MemoryLibrary, missing: &[i64]) -> Self {
        Self {
            inner,
            missing: Mutex::new(missing.iter().copied().map(SongId::new).collect()),
        }
    }

    fn remove_paths(&self, ids: &[i64]) {
        let mut missing = self.missing.lock().unwrap();
        missing.extend(ids.iter().copied().map(SongId::new));
    }
}

impl Library for GappyLibrary {
    fn get_list(
        &self,
        filter: &Filter,
        order_by: OrderBy,
        limit: Option<usize>,
        offset: usize,
    ) -> mpi3_core::Result<Vec<SongId>> {
        self.inner.get_list(filter, order_by, limit, offset)
    }

    fn get_count(&self, filter: &Filter) -> mpi3_core::Result<usize> {
        self.inner.get_count(filter)
    }

    fn get_by_id(
        &self,
        ids: &[SongId],
        field: SongField,
    ) -> mpi3_core::Result<HashMap<SongId, String>> {
        let mut values = self.inner.get_by_id(ids, field)?;
        if field == SongField::Path {
            for id in self.missing.lock().unwrap().iter() {
                values.remove(id);
            }
        }
        Ok(values)
    }

    fn get_values(&self, field: FilterField, filter: &Filter) -> mpi3_core::Result<Vec<String>> {
        self.inner.get_values(field, filter)
    }
}

struct Harness {
    controller: Controller,
    backend: ScriptedBackend,
    renderer: RecordingRenderer,
    mixer: RecordingMixer,
}

fn test_config() -> PlayerConfig {
    let mut config = PlayerConfig::default();
    config.playback.status_timeout_ms = 500;
    config.menu.shell_actions = vec![ShellAction::new("Halt", "sudo halt")];
    config
}

fn create_harness_with(library: Arc<dyn Library>) -> Harness {
    let backend = ScriptedBackend::new();
    let renderer = RecordingRenderer::default();
    let mixer = RecordingMixer::default();
    let controller = player::build_controller(
        &test_config(),
        library,
        Box::new(mixer.clone()),
        Box::new(backend.clone()),
        Box::new(renderer.clone()),
    )
    .unwrap();
    Harness {
        controller,
        backend,
        renderer,
        mixer,
    }
}

/// Songs 10, 11, 12, 13
fn create_harness() -> Harness {
    create_harness_with(Arc::new(MemoryLibrary::numbered(10, 4)))
}

fn press(harness: &mut Harness, buttons: &[Button]) {
    for &button in buttons {
        harness.controller.handle(button).unwrap();
    }
}

/// From the home menu, open "Songs" and play the song at `index`
fn play_from_menu(harness: &mut Harness, index: usize) {
    press(harness, &[Button::Select]);
    for _ in 0..=index {
        press(harness, &[Button::Down]);
    }
    press(harness, &[Button::Select]);
}

fn last_command(harness: &Harness) -> String {
    harness.backend.commands().last().cloned().unwrap()
}

#[test]
fn startup_silences_decoder() {
    let harness = create_harness();
    assert_eq!(harness.backend.commands(), vec!["SILENCE"]);
    assert_eq!(harness.controller.ui_mode(), UiMode::Normal);
    assert_eq!(harness.controller.queue().len(), 4);
    assert_eq!(harness.controller.decoder_state(), DecoderState::Stopped);
    // Initial volume reaches the mixer
    assert_eq!(*harness.mixer.levels.lock().unwrap(), vec![20]);
}

#[test]
fn cursor_moves_render_partial() {
    let mut harness = create_harness();
    press(&mut harness, &[Button::Down]);

    let screen = harness.renderer.last();
    assert_eq!(screen.scope, RedrawScope::Partial);
    assert_eq!(screen.cursor, 1);
    assert_eq!(screen.rows, vec!["Songs", "Artists", "Albums", "Settings"]);
}

#[test]
fn opening_a_menu_renders_complete() {
    let mut harness = create_harness();
    press(&mut harness, &[Button::Select]);

    let screen = harness.renderer.last();
    assert_eq!(screen.scope, RedrawScope::Complete);
    assert_eq!(screen.rows[0], "<- Back");
    assert_eq!(screen.rows[1], "Song 000010");
    assert_eq!(harness.controller.menu().depth(), 2);
}

#[test]
fn clicking_a_song_plays_it() {
    let mut harness = create_harness();
    play_from_menu(&mut harness, 1);

    assert_eq!(last_command(&harness), "LOAD /music/000011.mp3");
    assert_eq!(harness.controller.decoder_state(), DecoderState::Loading);
    assert_eq!(harness.controller.queue().cursor_position(), 1);
    // The menu stays on the song list
    assert_eq!(harness.controller.menu().peek().title(), "Songs");
}

#[test]
fn playback_mode_up_down_change_song() {
    let mut harness = create_harness();
    play_from_menu(&mut harness, 0);
    press(&mut harness, &[Button::Play]);
    assert_eq!(harness.controller.ui_mode(), UiMode::Playback);

    press(&mut harness, &[Button::Up]);
    let commands = harness.backend.commands();
    let tail = &commands[commands.len() - 2..];
    assert_eq!(tail, ["STOP", "LOAD /music/000011.mp3"]);

    press(&mut harness, &[Button::Down]);
    assert_eq!(last_command(&harness), "LOAD /music/000010.mp3");
}

#[test]
fn playback_select_pauses() {
    let mut harness = create_harness();
    play_from_menu(&mut harness, 0);
    press(&mut harness, &[Button::Play, Button::Select]);

    assert_eq!(last_command(&harness), "PAUSE");
    assert_eq!(harness.controller.decoder_state(), DecoderState::Paused);
}

#[test]
fn backward_at_start_keeps_playing() {
    let mut harness = create_harness();
    play_from_menu(&mut harness, 0);
    let before = harness.backend.commands().len();

    press(&mut harness, &[Button::Play, Button::Down]);
    assert_eq!(harness.backend.commands().len(), before);
    assert_eq!(harness.controller.decoder_state(), DecoderState::Loading);
}

#[test]
fn play_and_volume_cycle_mode_and_return_to_normal() {
    let mut harness = create_harness();

    press(&mut harness, &[Button::Play, Button::Play]);
    assert_eq!(harness.controller.ui_mode(), UiMode::Normal);
    assert_eq!(harness.controller.playback_mode(), PlaybackMode::Shuffle);

    press(&mut harness, &[Button::Volume, Button::Volume]);
    assert_eq!(harness.controller.ui_mode(), UiMode::Normal);
    assert_eq!(harness.controller.playback_mode(), PlaybackMode::Loop);

    press(&mut harness, &[Button::Play, Button::Volume]);
    assert_eq!(harness.controller.playback_mode(), PlaybackMode::Repeat);
    assert_eq!(harness.renderer.last().scope, RedrawScope::Complete);
}

#[test]
fn title_shows_mode_marker_and_volume() {
    let mut harness = create_harness();

    press(&mut harness, &[Button::Volume]);
    let title = harness.renderer.last().title;
    assert!(title.starts_with(" V"), "{title:?}");
    assert!(title.ends_with("   20"), "{title:?}");

    press(&mut harness, &[Button::Volume]);
    let title = harness.renderer.last().title;
    // Shuffle glyph, no marker
    assert!(title.starts_with("X "), "{title:?}");
}

#[test]
fn volume_mode_buttons() {
    let mut harness = create_harness();
    press(&mut harness, &[Button::Volume, Button::Up]);
    assert_eq!(harness.controller.volume().current(), 30);

    press(&mut harness, &[Button::Select]);
    assert_eq!(harness.controller.volume().current(), 0);
    press(&mut harness, &[Button::Select]);
    assert_eq!(harness.controller.volume().current(), 30);

    press(&mut harness, &[Button::Down, Button::Down]);
    assert_eq!(harness.controller.volume().current(), 10);
    assert_eq!(
        *harness.mixer.levels.lock().unwrap(),
        vec![20, 30, 0, 30, 20, 10]
    );
    assert_eq!(harness.controller.ui_mode(), UiMode::Volume);
}

#[test]
fn finished_track_at_end_stops() {
    let mut harness = create_harness();
    play_from_menu(&mut harness, 3);
    assert_eq!(last_command(&harness), "LOAD /music/000013.mp3");

    harness.backend.emit("@P 2");
    harness.controller.tick().unwrap();
    assert_eq!(harness.controller.decoder_state(), DecoderState::Playing);

    harness.backend.emit("@P 0");
    harness.controller.tick().unwrap();
    assert_eq!(harness.controller.decoder_state(), DecoderState::Stopped);
    assert_eq!(last_command(&harness), "LOAD /music/000013.mp3");
    assert_eq!(harness.controller.queue().cursor_position(), 3);
}

#[test]
fn finished_track_under_loop_wraps() {
    let mut harness = create_harness();
    // Normal -> Shuffle -> Loop
    press(
        &mut harness,
        &[Button::Play, Button::Play, Button::Play, Button::Play],
    );
    assert_eq!(harness.controller.playback_mode(), PlaybackMode::Loop);
    play_from_menu(&mut harness, 3);

    harness.backend.emit("@P 2");
    harness.controller.tick().unwrap();
    harness.backend.emit("@P 0");
    harness.controller.tick().unwrap();

    assert_eq!(last_command(&harness), "LOAD /music/000010.mp3");
    assert_eq!(harness.controller.decoder_state(), DecoderState::Loading);
    assert_eq!(harness.renderer.last().scope, RedrawScope::Partial);
}

#[test]
fn stop_acknowledgement_is_not_a_finished_track() {
    let mut harness = create_harness();
    play_from_menu(&mut harness, 0);
    press(&mut harness, &[Button::Play, Button::Up]);

    // The decoder acknowledges the STOP before loading the next song
    harness.backend.emit("@P 0");
    harness.controller.tick().unwrap();
    assert_eq!(harness.controller.decoder_state(), DecoderState::Loading);
    assert_eq!(last_command(&harness), "LOAD /music/000011.mp3");
}

#[test]
fn missing_song_is_skipped() {
    let library = GappyLibrary::new(MemoryLibrary::numbered(10, 4), &[11]);
    let mut harness = create_harness_with(Arc::new(library));
    play_from_menu(&mut harness, 0);
    press(&mut harness, &[Button::Play, Button::Up]);

    assert_eq!(last_command(&harness), "LOAD /music/000012.mp3");
    assert_eq!(harness.controller.queue().cursor_position(), 2);
}

#[test]
fn no_playable_song_stops_following_the_queue() {
    let library = Arc::new(GappyLibrary::new(MemoryLibrary::numbered(10, 4), &[]));
    let mut harness = create_harness_with(library.clone());
    // Normal -> Shuffle -> Loop
    press(
        &mut harness,
        &[Button::Play, Button::Play, Button::Play, Button::Play],
    );
    play_from_menu(&mut harness, 0);
    harness.backend.emit("@P 2");
    harness.controller.tick().unwrap();

    library.remove_paths(&[10, 11, 12, 13]);
    harness.backend.emit("@P 0");
    harness.controller.tick().unwrap();
    assert_eq!(harness.controller.decoder_state(), DecoderState::Stopped);

    let commands = harness.backend.commands().len();
    let cursor = harness.controller.queue().cursor_position();
    harness.controller.tick().unwrap();
    assert_eq!(harness.backend.commands().len(), commands);
    assert_eq!(harness.controller.queue().cursor_position(), cursor);
    assert_eq!(last_command(&harness), "LOAD /music/000010.mp3");
}

#[test]
fn decoder_write_failure_is_recoverable() {
    let mut harness = create_harness();
    play_from_menu(&mut harness, 0);
    press(&mut harness, &[Button::Play]);

    harness.backend.fail_writes(true);
    let err = harness.controller.handle(Button::Up).unwrap_err();
    assert!(err.to_string().contains("decoder"), "{err}");
    assert_eq!(harness.controller.decoder_state(), DecoderState::Stopped);

    harness.backend.fail_writes(false);
    press(&mut harness, &[Button::Up]);
    assert_eq!(harness.backend.spawn_count(), 2);
    assert_eq!(last_command(&harness), "LOAD /music/000012.mp3");
}

#[test]
fn shell_action_runs_from_settings() {
    let ran = Arc::new(Mutex::new(Vec::new()));
    let mut harness = create_harness();
    let recorded = Arc::clone(&ran);
    harness.controller = harness.controller.with_shell_runner(move |action| {
        recorded.lock().unwrap().push(action.label.clone());
        true
    });

    press(
        &mut harness,
        &[Button::Down, Button::Down, Button::Down, Button::Select],
    );
    assert_eq!(harness.controller.menu().peek().title(), "Settings");
    press(&mut harness, &[Button::Down, Button::Select]);

    assert_eq!(*ran.lock().unwrap(), vec!["Halt"]);
    assert_eq!(harness.renderer.last().scope, RedrawScope::Partial);
}

#[test]
fn back_at_home_is_harmless() {
    let mut harness = create_harness();
    press(&mut harness, &[Button::Select, Button::Select]);
    assert_eq!(harness.controller.menu().depth(), 1);
    assert_eq!(harness.renderer.last().scope, RedrawScope::Complete);
}

#[test]
fn busy_controller_drops_presses() {
    let harness = create_harness();
    let renderer = harness.renderer.clone();
    let shared = SharedController::new(harness.controller);

    let guard = shared.lock();
    let other = shared.clone();
    let handled = std::thread::spawn(move || other.press(Button::Down))
        .join()
        .unwrap();
    drop(guard);

    assert!(!handled);
    assert_eq!(renderer.count(), 0);
    assert!(shared.press(Button::Down));
    assert_eq!(shared.lock().menu().peek().cursor(), 1);
}

#[test]
fn run_stops_when_input_closes() {
    let harness = create_harness();
    let renderer = harness.renderer.clone();
    let shared = SharedController::new(harness.controller);

    let (tx, rx) = unbounded();
    tx.send(Button::Down).unwrap();
    // Arrives while the first press is being handled
    tx.send(Button::Down).unwrap();
    drop(tx);

    player::run(&shared, &rx, Duration::from_secs(3600));

    // Initial screen plus one press
    assert_eq!(renderer.count(), 2);
    assert_eq!(shared.lock().menu().peek().cursor(), 1);
}
