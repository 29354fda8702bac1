//! Button input sources
//!
//! Each source runs on its own thread and sends `Button` events into a
//! channel; the main loop hands them to the controller.

use crate::config::{ButtonPins, ButtonSettings};
use crate::error::{AppError, Result};
use crossbeam_channel::Sender;
use std::fmt;
use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Physical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Select,
    Play,
    Volume,
}

impl Button {
    pub const ALL: [Button; 5] = [
        Button::Up,
        Button::Down,
        Button::Select,
        Button::Play,
        Button::Volume,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Button::Up => "up",
            Button::Down => "down",
            Button::Select => "select",
            Button::Play => "play",
            Button::Volume => "volume",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Button {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(Button::Up),
            "down" | "d" => Ok(Button::Down),
            "select" | "s" => Ok(Button::Select),
            "play" | "p" => Ok(Button::Play),
            "volume" | "vol" | "v" => Ok(Button::Volume),
            other => Err(AppError::UnknownButton(other.to_string())),
        }
    }
}

/// Reads one button name per line, for bench use
pub struct StdinButtons;

impl StdinButtons {
    /// Forward lines of `reader` as button presses until EOF
    pub fn spawn<R>(reader: R, tx: Sender<Button>) -> Result<JoinHandle<()>>
    where
        R: BufRead + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name("stdin-buttons".to_string())
            .spawn(move || {
                for line in reader.lines() {
                    let line = match line {
                        Ok(line) => line,
                        Err(e) => {
                            warn!(error = %e, "Button input read failed");
                            break;
                        }
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<Button>() {
                        Ok(button) => {
                            if tx.send(button).is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("{e}"),
                    }
                }
                debug!("Button input closed");
            })?;
        Ok(handle)
    }
}

/// Polls sysfs GPIO value files and reports falling edges
///
/// No debouncing: every high-to-low transition seen between polls is one
/// press.
pub struct GpioButtons {
    pins: Vec<GpioPin>,
    poll_interval: Duration,
}

struct GpioPin {
    button: Button,
    value_path: PathBuf,
    last: Option<bool>,
}

impl GpioButtons {
    /// Watch `pins` under the sysfs GPIO directory `root`
    ///
    /// Pins that are not yet exported are exported as inputs.
    pub fn new(root: &Path, pins: &[(Button, u32)], poll_interval: Duration) -> Result<Self> {
        let mut watched = Vec::with_capacity(pins.len());
        for &(button, pin) in pins {
            let pin_dir = root.join(format!("gpio{pin}"));
            if !pin_dir.exists() {
                debug!(pin, "Exporting GPIO pin");
                fs::write(root.join("export"), pin.to_string())?;
            }
            let direction = pin_dir.join("direction");
            if let Err(e) = fs::write(&direction, "in") {
                warn!(pin, error = %e, "Could not set GPIO direction");
            }
            info!(pin, button = %button, "Watching GPIO pin");
            watched.push(GpioPin {
                button,
                value_path: pin_dir.join("value"),
                last: None,
            });
        }
        Ok(Self {
            pins: watched,
            poll_interval,
        })
    }

    /// Build from the `[buttons]` config section
    pub fn from_settings(settings: &ButtonSettings) -> Result<Self> {
        let pins = configured_pins(&settings.pins)?;
        Self::new(
            &settings.gpio_root,
            &pins,
            Duration::from_millis(settings.gpio_poll_ms),
        )
    }

    /// Read every pin once and return the buttons that saw a falling edge
    pub fn poll(&mut self) -> Vec<Button> {
        let mut pressed = Vec::new();
        for pin in &mut self.pins {
            let level = match fs::read_to_string(&pin.value_path) {
                Ok(text) => text.trim() == "1",
                Err(e) => {
                    warn!(path = %pin.value_path.display(), error = %e, "GPIO read failed");
                    continue;
                }
            };
            if pin.last == Some(true) && !level {
                pressed.push(pin.button);
            }
            pin.last = Some(level);
        }
        pressed
    }

    /// Poll on a background thread until the receiver goes away
    pub fn spawn(mut self, tx: Sender<Button>) -> Result<JoinHandle<()>> {
        let handle = thread::Builder::new()
            .name("gpio-buttons".to_string())
            .spawn(move || loop {
                for button in self.poll() {
                    if tx.send(button).is_err() {
                        return;
                    }
                }
                thread::sleep(self.poll_interval);
            })?;
        Ok(handle)
    }
}

/// Pairs each button with its configured pin
fn configured_pins(pins: &ButtonPins) -> Result<Vec<(Button, u32)>> {
    Button::ALL
        .iter()
        .zip(pins.named())
        .map(|(&button, (name, pin))| {
            pin.map(|pin| (button, pin))
                .ok_or_else(|| AppError::Config(format!("No GPIO pin for `{name}`")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::io::Cursor;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("up".parse::<Button>().unwrap(), Button::Up);
        assert_eq!(" VOL \n".parse::<Button>().unwrap(), Button::Volume);
        assert_eq!("s".parse::<Button>().unwrap(), Button::Select);
        assert!(matches!(
            "left".parse::<Button>(),
            Err(AppError::UnknownButton(name)) if name == "left"
        ));
    }

    #[test]
    fn stdin_forwards_known_buttons() {
        let (tx, rx) = unbounded();
        let input = Cursor::new("down\n\nbogus\nplay\n");
        StdinButtons::spawn(input, tx).unwrap().join().unwrap();

        let received: Vec<Button> = rx.try_iter().collect();
        assert_eq!(received, vec![Button::Down, Button::Play]);
    }

    fn fake_pin(root: &Path, pin: u32, level: &str) {
        let dir = root.join(format!("gpio{pin}"));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("value"), level).unwrap();
    }

    #[test]
    fn gpio_reports_falling_edges() {
        let root = tempfile::tempdir().unwrap();
        fake_pin(root.path(), 17, "1\n");
        fake_pin(root.path(), 27, "1\n");

        let mut gpio = GpioButtons::new(
            root.path(),
            &[(Button::Up, 17), (Button::Down, 27)],
            Duration::from_millis(1),
        )
        .unwrap();
        assert!(gpio.poll().is_empty());

        fake_pin(root.path(), 17, "0\n");
        assert_eq!(gpio.poll(), vec![Button::Up]);
        // Held low: no repeat
        assert!(gpio.poll().is_empty());

        fake_pin(root.path(), 17, "1\n");
        fake_pin(root.path(), 27, "0\n");
        assert_eq!(gpio.poll(), vec![Button::Down]);
    }

    #[test]
    fn gpio_exports_missing_pins() {
        let root = tempfile::tempdir().unwrap();
        GpioButtons::new(root.path(), &[(Button::Play, 23)], Duration::from_millis(1)).unwrap();
        assert_eq!(fs::read_to_string(root.path().join("export")).unwrap(), "23");
    }

    #[test]
    fn configured_pins_requires_all() {
        let pins = ButtonPins {
            up: Some(1),
            down: Some(2),
            select: Some(3),
            play: Some(4),
            volume: Some(5),
        };
        let paired = configured_pins(&pins).unwrap();
        assert_eq!(paired[4], (Button::Volume, 5));

        let missing = ButtonPins {
            select: None,
            ..pins
        };
        assert!(configured_pins(&missing).is_err());
    }
}
