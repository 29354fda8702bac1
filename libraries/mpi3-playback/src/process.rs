//! Decoder process control
//!
//! Drives a long-lived `mpg123 --remote` style decoder over its stdin/stdout.
//!
//! Commands are single lines, flushed immediately:
//!
//! ```text
//! LOAD <path>   start a track
//! STOP          stop the current track
//! PAUSE         toggle pause
//! SILENCE       stop frame-progress chatter (sent once per spawn)
//! ```
//!
//! The decoder answers with `@P <n>` status lines (0 = finished or stopped,
//! 1 = paused, 2 = playing). A dedicated reader thread parses those lines
//! and hands them over a bounded channel, so the control loop never blocks
//! on the decoder's output.

use crate::error::{PlaybackError, Result};
use crate::types::DecoderState;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Status lines buffered between the reader thread and the poller
const STATUS_CHANNEL_CAPACITY: usize = 64;

/// Status reported by the decoder on its output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportedStatus {
    /// `@P 0`
    Finished,
    /// `@P 1`
    Paused,
    /// `@P 2`
    Playing,
}

/// Parse a decoder output line
///
/// Anything other than a well-formed `@P <n>` line yields `None`.
pub fn parse_status_line(line: &str) -> Option<ReportedStatus> {
    let code = line.trim().strip_prefix("@P")?.trim();
    match code {
        "0" => Some(ReportedStatus::Finished),
        "1" => Some(ReportedStatus::Paused),
        "2" => Some(ReportedStatus::Playing),
        _ => None,
    }
}

/// Handle on a running decoder process
pub trait DecoderProcess: Send {
    /// Whether the process is still running
    fn is_alive(&mut self) -> bool;

    /// Terminate the process
    fn kill(&mut self);
}

impl DecoderProcess for Child {
    fn is_alive(&mut self) -> bool {
        matches!(self.try_wait(), Ok(None))
    }

    fn kill(&mut self) {
        if let Err(e) = Child::kill(self) {
            debug!(error = %e, "Decoder already exited");
        }
        // Reap to avoid a zombie
        let _ = self.wait();
    }
}

/// Pipes and handle of a freshly spawned decoder
pub struct SpawnedDecoder {
    /// Command stream (decoder stdin)
    pub input: Box<dyn Write + Send>,

    /// Status stream (decoder stdout)
    pub output: Box<dyn BufRead + Send>,

    /// Liveness and termination
    pub process: Box<dyn DecoderProcess>,
}

/// Starts decoder processes
pub trait DecoderBackend: Send {
    /// Spawn a new decoder
    fn spawn(&mut self) -> Result<SpawnedDecoder>;
}

/// `mpg123 --remote` backend
#[derive(Debug, Clone)]
pub struct Mpg123Backend {
    command: String,
    args: Vec<String>,
}

impl Mpg123Backend {
    /// Backend running `command` with `args`
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }
}

impl Default for Mpg123Backend {
    fn default() -> Self {
        Self::new("mpg123", vec!["--remote".to_string()])
    }
}

impl DecoderBackend for Mpg123Backend {
    fn spawn(&mut self) -> Result<SpawnedDecoder> {
        let spawn_error = |source| PlaybackError::DecoderSpawn {
            command: self.command.clone(),
            source,
        };

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(spawn_error)?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            DecoderProcess::kill(&mut child);
            return Err(spawn_error(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "decoder pipes unavailable",
            )));
        };

        info!(command = %self.command, pid = child.id(), "Decoder started");
        Ok(SpawnedDecoder {
            input: Box::new(stdin),
            output: Box::new(BufReader::new(stdout)),
            process: Box::new(child),
        })
    }
}

struct RunningDecoder {
    input: Box<dyn Write + Send>,
    process: Box<dyn DecoderProcess>,
    status_rx: Receiver<ReportedStatus>,
}

impl Drop for RunningDecoder {
    fn drop(&mut self) {
        self.process.kill();
    }
}

/// Owns the decoder subprocess and tracks its state
///
/// Nothing else in the player talks to the process. A dead process is
/// respawned into `Stopped` before the next command; a failed write is
/// reported to the caller as "song not started".
pub struct PlaybackProcessController {
    backend: Box<dyn DecoderBackend>,
    decoder: Option<RunningDecoder>,
    state: DecoderState,

    /// STOPs sent whose `@P 0` acknowledgement has not been read yet
    pending_stop_acks: usize,

    /// How long `poll_status` waits for a status line
    status_timeout: Duration,
}

impl PlaybackProcessController {
    /// Spawn the decoder and return a controller in `Stopped`
    pub fn new(backend: Box<dyn DecoderBackend>, status_timeout: Duration) -> Result<Self> {
        let mut controller = Self {
            backend,
            decoder: None,
            state: DecoderState::Stopped,
            pending_stop_acks: 0,
            status_timeout,
        };
        controller.ensure_running()?;
        Ok(controller)
    }

    /// Last known state
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Start playing `path`
    ///
    /// Stops the current track first so two LOADs never overlap.
    pub fn play(&mut self, path: &Path) -> Result<DecoderState> {
        self.ensure_running()?;
        if self.state.is_active() {
            self.send_stop()?;
        }
        self.send(&format!("LOAD {}", path.display()))?;
        self.state = DecoderState::Loading;
        info!(path = %path.display(), "Loading track");
        Ok(self.state)
    }

    /// Toggle pause
    ///
    /// Only meaningful with a track loaded; otherwise a logged no-op.
    pub fn pause(&mut self) -> Result<DecoderState> {
        self.ensure_running()?;
        let next = match self.state {
            DecoderState::Playing | DecoderState::Loading => DecoderState::Paused,
            DecoderState::Paused => DecoderState::Playing,
            DecoderState::Stopped | DecoderState::Done => {
                warn!(state = ?self.state, "Pause with nothing playing, ignoring");
                return Ok(self.state);
            }
        };
        self.send("PAUSE")?;
        self.state = next;
        debug!(state = ?self.state, "Pause toggled");
        Ok(self.state)
    }

    /// Stop the current track
    pub fn stop(&mut self) -> Result<DecoderState> {
        self.ensure_running()?;
        if self.state.is_active() {
            self.send_stop()?;
        }
        self.state = DecoderState::Stopped;
        debug!("Playback stopped");
        Ok(self.state)
    }

    /// Read pending status lines
    ///
    /// Waits up to the status timeout for the first line, then drains
    /// whatever else is queued. Returns the last known state when nothing
    /// arrives.
    pub fn poll_status(&mut self) -> DecoderState {
        let Some(decoder) = self.decoder.as_ref() else {
            return self.state;
        };

        let mut statuses = Vec::new();
        match decoder.status_rx.recv_timeout(self.status_timeout) {
            Ok(status) => {
                statuses.push(status);
                statuses.extend(decoder.status_rx.try_iter());
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                warn!("Decoder output closed, will respawn on next command");
                self.decoder = None;
                self.state = DecoderState::Stopped;
                self.pending_stop_acks = 0;
                return self.state;
            }
        }

        for status in statuses {
            self.apply(status);
        }
        self.state
    }

    fn apply(&mut self, status: ReportedStatus) {
        let previous = self.state;
        match status {
            ReportedStatus::Finished if self.pending_stop_acks > 0 => {
                self.pending_stop_acks -= 1;
            }
            ReportedStatus::Finished => {
                if self.state.is_active() {
                    self.state = DecoderState::Done;
                }
            }
            ReportedStatus::Paused => {
                self.clear_stale_stop_acks();
                if self.state.is_active() {
                    self.state = DecoderState::Paused;
                }
            }
            ReportedStatus::Playing => {
                self.clear_stale_stop_acks();
                if self.state.is_active() {
                    self.state = DecoderState::Playing;
                }
            }
        }
        if previous != self.state {
            debug!(?status, from = ?previous, to = ?self.state, "Decoder status");
        }
    }

    /// A track reporting in means every earlier STOP was already handled.
    /// mpg123 never answers a STOP sent while no track is loaded.
    fn clear_stale_stop_acks(&mut self) {
        if self.pending_stop_acks > 0 {
            debug!(pending = self.pending_stop_acks, "Dropping unanswered STOPs");
            self.pending_stop_acks = 0;
        }
    }

    fn send_stop(&mut self) -> Result<()> {
        self.send("STOP")?;
        self.pending_stop_acks += 1;
        Ok(())
    }

    /// Write one command line to the decoder
    fn send(&mut self, command: &str) -> Result<()> {
        self.ensure_running()?;
        let Some(decoder) = self.decoder.as_mut() else {
            return Err(PlaybackError::DecoderWrite {
                command: command.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotConnected, "no decoder"),
            });
        };

        let written = writeln!(decoder.input, "{command}").and_then(|()| decoder.input.flush());
        if let Err(source) = written {
            error!(command, error = %source, "Decoder write failed");
            self.decoder = None;
            self.state = DecoderState::Stopped;
            self.pending_stop_acks = 0;
            return Err(PlaybackError::DecoderWrite {
                command: command.to_string(),
                source,
            });
        }
        Ok(())
    }

    /// Respawn the decoder if it is missing or dead
    fn ensure_running(&mut self) -> Result<()> {
        if let Some(decoder) = self.decoder.as_mut() {
            if decoder.process.is_alive() {
                return Ok(());
            }
            warn!(state = ?self.state, "Decoder process died, respawning");
            self.decoder = None;
        }

        let spawned = self.backend.spawn()?;
        let (tx, rx) = bounded(STATUS_CHANNEL_CAPACITY);
        spawn_reader(spawned.output, tx)?;

        self.decoder = Some(RunningDecoder {
            input: spawned.input,
            process: spawned.process,
            status_rx: rx,
        });
        self.state = DecoderState::Stopped;
        self.pending_stop_acks = 0;

        if let Some(decoder) = self.decoder.as_mut() {
            let silenced = writeln!(decoder.input, "SILENCE").and_then(|()| decoder.input.flush());
            if let Err(e) = silenced {
                warn!(error = %e, "Failed to silence decoder");
            }
        }
        Ok(())
    }
}

impl Drop for PlaybackProcessController {
    fn drop(&mut self) {
        if self.decoder.take().is_some() {
            debug!("Decoder shut down");
        }
    }
}

impl std::fmt::Debug for PlaybackProcessController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackProcessController")
            .field("state", &self.state)
            .field("running", &self.decoder.is_some())
            .field("pending_stop_acks", &self.pending_stop_acks)
            .finish_non_exhaustive()
    }
}

/// Forward parsed status lines until the stream ends or the poller is gone
fn spawn_reader(output: Box<dyn BufRead + Send>, tx: Sender<ReportedStatus>) -> Result<()> {
    thread::Builder::new()
        .name("decoder-reader".to_string())
        .spawn(move || {
            for line in output.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        debug!(error = %e, "Decoder output read failed");
                        break;
                    }
                };
                if let Some(status) = parse_status_line(&line) {
                    if tx.send(status).is_err() {
                        break;
                    }
                }
            }
            debug!("Decoder reader finished");
        })?;
    Ok(())
}
