/// mpi3 - button-driven MP3 player
use clap::Parser;
use crossbeam_channel::unbounded;
use mpi3::buttons::{GpioButtons, StdinButtons};
use mpi3::cli::Cli;
use mpi3::config::{ButtonSource, PlayerConfig};
use mpi3::mixer::AmixerMixer;
use mpi3::{player, ConsoleRenderer, Renderer, SharedController};
use mpi3_playback::Mpg123Backend;
use std::io::BufReader;
use std::sync::Arc;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.generate_config {
        print!("{}", PlayerConfig::default().to_toml()?);
        return Ok(());
    }

    let _log_guard = mpi3::logging::init(&cli.log_level, &cli.log_target(), cli.log_file_count)?;
    tracing::info!("Starting mpi3");

    match start(&cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("Startup failed: {e:#}");
            ConsoleRenderer::stdout().render_error(&format!("{e:#}"));
            Err(e)
        }
    }
}

fn start(cli: &Cli) -> anyhow::Result<()> {
    let config = PlayerConfig::load(cli.config_file.as_deref())?;
    config.validate()?;

    let library = player::open_library(&config, cli.rescan)?;
    let mixer = AmixerMixer::new(
        config.volume.mixer_command.clone(),
        config.volume.mixer_control.clone(),
    );
    let backend = Mpg123Backend::new(
        config.playback.decoder_command.clone(),
        config.playback.decoder_args.clone(),
    );
    let controller = player::build_controller(
        &config,
        Arc::new(library),
        Box::new(mixer),
        Box::new(backend),
        Box::new(ConsoleRenderer::stdout()),
    )?;
    let controller = SharedController::new(controller);

    let (tx, rx) = unbounded();
    match config.buttons.source {
        ButtonSource::Stdin => {
            StdinButtons::spawn(BufReader::new(std::io::stdin()), tx)?;
        }
        ButtonSource::Gpio => {
            GpioButtons::from_settings(&config.buttons)?.spawn(tx)?;
        }
    }

    player::run(
        &controller,
        &rx,
        Duration::from_millis(config.controller.heartbeat_ms),
    );
    tracing::info!("mpi3 stopped");
    Ok(())
}
