/// Player configuration
use crate::error::{AppError, Result};
use mpi3_navigation::ShellAction;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default = "default_display")]
    pub display: DisplaySettings,

    #[serde(default = "default_volume")]
    pub volume: VolumeSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_library")]
    pub library: LibrarySettings,

    #[serde(default = "default_controller")]
    pub controller: ControllerSettings,

    #[serde(default = "default_buttons")]
    pub buttons: ButtonSettings,

    #[serde(default)]
    pub menu: MenuSettings,
}

/// Panel geometry, in pixels
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplaySettings {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_title_row_height")]
    pub title_row_height: u32,

    #[serde(default = "default_row_height")]
    pub row_height: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VolumeSettings {
    /// Startup volume, in percent
    #[serde(default = "default_volume_level")]
    pub default: u8,

    #[serde(default = "default_low_step")]
    pub low_step: u8,

    #[serde(default = "default_low_ceiling")]
    pub low_ceiling: u8,

    #[serde(default = "default_high_step")]
    pub high_step: u8,

    #[serde(default = "default_mixer_control")]
    pub mixer_control: String,

    #[serde(default = "default_mixer_command")]
    pub mixer_command: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_decoder_command")]
    pub decoder_command: String,

    #[serde(default = "default_decoder_args")]
    pub decoder_args: Vec<String>,

    /// How long one status poll waits for a decoder line
    #[serde(default = "default_status_timeout_ms")]
    pub status_timeout_ms: u64,

    #[serde(default = "default_shuffle_history")]
    pub shuffle_history: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    #[serde(default = "default_database")]
    pub database: PathBuf,

    #[serde(default = "default_directories")]
    pub directories: Vec<PathBuf>,

    #[serde(default = "default_scan_on_start")]
    pub scan_on_start: bool,

    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControllerSettings {
    /// Interval between status polls and title refreshes
    #[serde(default = "default_heartbeat_ms")]
    pub heartbeat_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonSource {
    /// One button name per line on standard input
    Stdin,
    /// Falling edges on sysfs GPIO value files
    Gpio,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ButtonSettings {
    #[serde(default = "default_button_source")]
    pub source: ButtonSource,

    #[serde(default)]
    pub pins: ButtonPins,

    #[serde(default = "default_gpio_root")]
    pub gpio_root: PathBuf,

    #[serde(default = "default_gpio_poll_ms")]
    pub gpio_poll_ms: u64,
}

/// BCM pin numbers, one per button
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ButtonPins {
    pub up: Option<u32>,
    pub down: Option<u32>,
    pub select: Option<u32>,
    pub play: Option<u32>,
    pub volume: Option<u32>,
}

impl ButtonPins {
    /// Pins paired with the button names they report
    pub fn named(&self) -> [(&'static str, Option<u32>); 5] {
        [
            ("up", self.up),
            ("down", self.down),
            ("select", self.select),
            ("play", self.play),
            ("volume", self.volume),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MenuSettings {
    /// Entries of the settings menu
    #[serde(default)]
    pub shell_actions: Vec<ShellAction>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            display: default_display(),
            volume: default_volume(),
            playback: default_playback(),
            library: default_library(),
            controller: default_controller(),
            buttons: default_buttons(),
            menu: MenuSettings::default(),
        }
    }
}

impl PlayerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicitly given file must exist; the default file is optional.
    /// Variables such as `MPI3_VOLUME__DEFAULT=30` override file values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("MPI3")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))
    }

    /// Rows of the menu that fit below the title line
    pub fn page_size(&self) -> usize {
        let display = &self.display;
        if display.row_height == 0 {
            return 0;
        }
        (display.height.saturating_sub(display.title_row_height) / display.row_height) as usize
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.page_size() < 1 {
            return Err(AppError::Config(format!(
                "Display of height {} with a {}px title and {}px rows has no room for menu rows",
                self.display.height, self.display.title_row_height, self.display.row_height
            )));
        }

        let volume = &self.volume;
        if volume.low_step == 0 || volume.high_step == 0 {
            return Err(AppError::Config(
                "Volume steps must be greater than zero".to_string(),
            ));
        }
        if volume.low_ceiling > 100 {
            return Err(AppError::Config(format!(
                "Volume low_ceiling {} exceeds 100",
                volume.low_ceiling
            )));
        }
        if volume.default > 100 {
            return Err(AppError::Config(format!(
                "Default volume {} exceeds 100",
                volume.default
            )));
        }

        if self.controller.heartbeat_ms == 0 {
            return Err(AppError::Config(
                "Heartbeat interval must be greater than zero".to_string(),
            ));
        }

        if self.library.directories.is_empty() {
            return Err(AppError::Config(
                "At least one library directory is required".to_string(),
            ));
        }

        if self.buttons.source == ButtonSource::Gpio {
            for (name, pin) in self.buttons.pins.named() {
                if pin.is_none() {
                    return Err(AppError::Config(format!(
                        "GPIO button source needs a pin for `{name}`"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Render as TOML, the format `load` reads
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))
    }
}

/// `~/.config/mpi3/config.toml`
pub fn default_config_path() -> PathBuf {
    home_dir().join(".config").join("mpi3").join("config.toml")
}

/// `~/.mpi3/logs/mpi3.log`
pub fn default_log_path() -> PathBuf {
    home_dir().join(".mpi3").join("logs").join("mpi3.log")
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from)
}

// Default values
fn default_display() -> DisplaySettings {
    DisplaySettings {
        width: default_width(),
        height: default_height(),
        title_row_height: default_title_row_height(),
        row_height: default_row_height(),
    }
}

fn default_width() -> u32 {
    200
}

fn default_height() -> u32 {
    96
}

fn default_title_row_height() -> u32 {
    16
}

fn default_row_height() -> u32 {
    16
}

fn default_volume() -> VolumeSettings {
    VolumeSettings {
        default: default_volume_level(),
        low_step: default_low_step(),
        low_ceiling: default_low_ceiling(),
        high_step: default_high_step(),
        mixer_control: default_mixer_control(),
        mixer_command: default_mixer_command(),
    }
}

fn default_volume_level() -> u8 {
    20
}

fn default_low_step() -> u8 {
    10
}

fn default_low_ceiling() -> u8 {
    90
}

fn default_high_step() -> u8 {
    5
}

fn default_mixer_control() -> String {
    "Master".to_string()
}

fn default_mixer_command() -> String {
    "amixer".to_string()
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        decoder_command: default_decoder_command(),
        decoder_args: default_decoder_args(),
        status_timeout_ms: default_status_timeout_ms(),
        shuffle_history: default_shuffle_history(),
    }
}

fn default_decoder_command() -> String {
    "mpg123".to_string()
}

fn default_decoder_args() -> Vec<String> {
    vec!["--remote".to_string()]
}

fn default_status_timeout_ms() -> u64 {
    50
}

fn default_shuffle_history() -> usize {
    50
}

fn default_library() -> LibrarySettings {
    LibrarySettings {
        database: default_database(),
        directories: default_directories(),
        scan_on_start: default_scan_on_start(),
        extensions: default_extensions(),
    }
}

fn default_database() -> PathBuf {
    home_dir().join(".mpi3").join("library.db")
}

fn default_directories() -> Vec<PathBuf> {
    vec![home_dir().join("music")]
}

fn default_scan_on_start() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    vec!["mp3".to_string()]
}

fn default_controller() -> ControllerSettings {
    ControllerSettings {
        heartbeat_ms: default_heartbeat_ms(),
    }
}

fn default_heartbeat_ms() -> u64 {
    1000
}

fn default_buttons() -> ButtonSettings {
    ButtonSettings {
        source: default_button_source(),
        pins: ButtonPins::default(),
        gpio_root: default_gpio_root(),
        gpio_poll_ms: default_gpio_poll_ms(),
    }
}

fn default_button_source() -> ButtonSource {
    ButtonSource::Stdin
}

fn default_gpio_root() -> PathBuf {
    PathBuf::from("/sys/class/gpio")
}

fn default_gpio_poll_ms() -> u64 {
    20
}
