//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mpi3")]
#[command(about = "Button-driven MP3 player for an e-ink Raspberry Pi", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ~/.config/mpi3/config.toml)
    #[arg(short, long = "config-file", env = "MPI3_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Default log level; RUST_LOG overrides it
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Log file (default: ~/.mpi3/logs/mpi3.log), or `false` to log to stdout
    #[arg(long)]
    pub log_file: Option<String>,

    /// Number of rotated log files to keep
    #[arg(long, default_value_t = 5)]
    pub log_file_count: usize,

    /// Rebuild the song library from scratch before starting
    #[arg(long)]
    pub rescan: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    pub generate_config: bool,
}

/// Where log output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    File(PathBuf),
}

impl Cli {
    pub fn log_target(&self) -> LogTarget {
        match self.log_file.as_deref() {
            Some(value) if value.eq_ignore_ascii_case("false") => LogTarget::Stdout,
            Some(value) => LogTarget::File(PathBuf::from(value)),
            None => LogTarget::File(crate::config::default_log_path()),
        }
    }
}
