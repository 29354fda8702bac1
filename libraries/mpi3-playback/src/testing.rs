//! Scripted decoder backend
//!
//! Stands in for `mpg123` in tests: records every command line written to
//! the decoder and lets the test feed status lines back through the same
//! reader-thread path a real process uses.

use crate::error::{PlaybackError, Result};
use crate::process::{DecoderBackend, DecoderProcess, SpawnedDecoder};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::io::{self, BufReader, Read, Write};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Script {
    commands: Vec<String>,
    spawns: usize,
    generation: usize,
    alive: bool,
    fail_writes: bool,
    fail_spawn: bool,
    lines: Option<Sender<String>>,
}

/// Decoder backend driven by the test
///
/// Clones share state, so keep one clone and hand the other to the
/// controller.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Feed a line to the current decoder's output
    pub fn emit(&self, line: &str) {
        if let Some(tx) = &self.lock().lines {
            let _ = tx.send(line.to_string());
        }
    }

    /// Every command written so far, across all spawns
    pub fn commands(&self) -> Vec<String> {
        self.lock().commands.clone()
    }

    /// Number of decoder spawns
    pub fn spawn_count(&self) -> usize {
        self.lock().spawns
    }

    /// Simulate the decoder crashing: dead process, closed output
    pub fn kill_process(&self) {
        let mut script = self.lock();
        script.alive = false;
        script.lines = None;
    }

    /// Make writes to the decoder fail
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Make the next spawns fail
    pub fn fail_spawn(&self, fail: bool) {
        self.lock().fail_spawn = fail;
    }
}

impl DecoderBackend for ScriptedBackend {
    fn spawn(&mut self) -> Result<SpawnedDecoder> {
        let mut script = self.lock();
        if script.fail_spawn {
            return Err(PlaybackError::DecoderSpawn {
                command: "scripted".to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "spawn disabled"),
            });
        }

        let (tx, rx) = unbounded();
        script.spawns += 1;
        script.generation += 1;
        script.alive = true;
        script.lines = Some(tx);
        let generation = script.generation;

        Ok(SpawnedDecoder {
            input: Box::new(ScriptWriter {
                script: self.script.clone(),
                pending: Vec::new(),
            }),
            output: Box::new(BufReader::new(ChannelReader {
                lines: rx,
                buffer: Vec::new(),
                position: 0,
            })),
            process: Box::new(ScriptProcess {
                script: self.script.clone(),
                generation,
            }),
        })
    }
}

struct ScriptWriter {
    script: Arc<Mutex<Script>>,
    pending: Vec<u8>,
}

impl Write for ScriptWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut script = self.script.lock().unwrap_or_else(|e| e.into_inner());
        if script.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "decoder gone"));
        }
        self.pending.extend_from_slice(buf);
        while let Some(end) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=end).collect();
            let text = String::from_utf8_lossy(&line[..end]).into_owned();
            script.commands.push(text);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Blocking reader over lines sent through a channel; EOF once the sender
/// is dropped
struct ChannelReader {
    lines: Receiver<String>,
    buffer: Vec<u8>,
    position: usize,
}

impl Read for ChannelReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.position >= self.buffer.len() {
            match self.lines.recv() {
                Ok(line) => {
                    self.buffer = format!("{line}\n").into_bytes();
                    self.position = 0;
                }
                Err(_) => return Ok(0),
            }
        }
        let available = &self.buffer[self.position..];
        let count = available.len().min(buf.len());
        buf[..count].copy_from_slice(&available[..count]);
        self.position += count;
        Ok(count)
    }
}

struct ScriptProcess {
    script: Arc<Mutex<Script>>,
    generation: usize,
}

impl DecoderProcess for ScriptProcess {
    fn is_alive(&mut self) -> bool {
        let script = self.script.lock().unwrap_or_else(|e| e.into_inner());
        script.alive && script.generation == self.generation
    }

    fn kill(&mut self) {
        let mut script = self.script.lock().unwrap_or_else(|e| e.into_inner());
        if script.generation == self.generation {
            script.alive = false;
            script.lines = None;
        }
    }
}
