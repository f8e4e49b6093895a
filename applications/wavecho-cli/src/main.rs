/// Wavecho - echo and three-band equalizer for WAV playback
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use wavecho_engine::{CpalSinkOpener, Engine, EngineConfig, WavFileSinkOpener, WavSourceOpener};

mod menu;

use menu::{Command, HELP};

#[derive(Parser)]
#[command(name = "wavecho")]
#[command(about = "Play WAV files through an echo and a three-band equalizer", long_about = None)]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, env = "WAVECHO_CONFIG")]
    config: Option<PathBuf>,

    /// Render to this WAV file instead of the audio device
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Input WAV file selected at startup
    #[arg(short, long)]
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wavecho=info,wavecho_engine=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::load(cli.config.as_deref()).context("loading configuration")?;

    let mut engine = match &cli.output {
        Some(path) => {
            info!(path = %path.display(), "rendering to file");
            Engine::start(config, WavSourceOpener::new(), WavFileSinkOpener::new(path))?
        }
        None => {
            let sinks = CpalSinkOpener::new(config.output_queue_slots())?;
            Engine::start(config, WavSourceOpener::new(), sinks)?
        }
    };

    if let Some(path) = &cli.file {
        engine.register().set_input_path(path);
    }

    println!("{HELP}");
    run_menu(&engine)?;

    engine.shutdown()?;
    Ok(())
}

/// Read commands from stdin until `quit` or end of input
fn run_menu(engine: &Engine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("wavecho> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e:#}");
                continue;
            }
        };
        if command == Command::Quit {
            return Ok(());
        }

        match command.apply(engine) {
            Ok(Some(text)) => println!("{text}"),
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "command rejected");
                println!("{e:#}");
            }
        }
    }
}
