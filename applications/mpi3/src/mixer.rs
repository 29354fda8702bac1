//! ALSA mixer through `amixer`

use mpi3_playback::{Mixer, PlaybackError};
use std::process::{Command, Stdio};
use tracing::debug;

/// Sets the system volume with `amixer sset <control> <n>%`
#[derive(Debug, Clone)]
pub struct AmixerMixer {
    command: String,
    control: String,
}

impl AmixerMixer {
    pub fn new(command: impl Into<String>, control: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            control: control.into(),
        }
    }

    fn args(&self, percent: u8) -> [String; 3] {
        ["sset".to_string(), self.control.clone(), format!("{percent}%")]
    }
}

impl Default for AmixerMixer {
    fn default() -> Self {
        Self::new("amixer", "Master")
    }
}

impl Mixer for AmixerMixer {
    fn set_volume(&mut self, percent: u8) -> mpi3_playback::Result<()> {
        debug!(control = %self.control, percent, "Setting mixer volume");
        let status = Command::new(&self.command)
            .args(self.args(percent))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| PlaybackError::Mixer(format!("{}: {e}", self.command)))?;

        if status.success() {
            Ok(())
        } else {
            Err(PlaybackError::Mixer(format!(
                "{} exited with {status}",
                self.command
            )))
        }
    }
}
