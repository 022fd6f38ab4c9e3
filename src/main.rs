//! # Buoy Matrix Application Entry Point
//!
//! Loads the configuration, sprites and station data, builds the playlist and
//! runs it until SIGINT/SIGTERM. It supports both production mode (LED panel,
//! `hardware` feature) and development mode (`--stdout`, ANSI output).


use anyhow::Context;
use buoy_matrix_lib::{
    animation::{Animation, UniformPicker},
    config::{Config, CONFIG_FILE},
    display::Display,
    observation::{self, ObservationError, StationReport},
    playlist::{self, Assets, StationSlot},
    render_loop::{CancellationToken, RenderLoop, ThreadPacer},
    sprite::Sprite,
    text::Glyphs,
    COLUMNS,
};
use clap::Parser;
use std::{path::PathBuf, rc::Rc};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Ocean buoy conditions on an RGB LED matrix
#[derive(Parser, Debug)]
#[command(name = "buoy-matrix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Render to the terminal instead of the LED panel
    #[arg(long)]
    stdout: bool,

    /// JSON report document to show instead of the configured stations
    /// (takes precedence over `--lines`)
    #[arg(long)]
    observations: Option<PathBuf>,

    /// Headline file with one `<+|-><label>` line per station (no charts)
    #[arg(long)]
    lines: Option<PathBuf>,

    /// Seed for the chart's column picker, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Station data from whichever source the command line selected.
fn load_stations(cli: &Cli, config: &Config) -> anyhow::Result<Vec<StationSlot>> {
    if let Some(path) = &cli.observations {
        let reports = observation::load_reports(path)
            .with_context(|| format!("loading reports from {}", path.display()))?;
        return Ok(reports.iter().map(StationSlot::from).collect());
    }

    if let Some(path) = &cli.lines {
        let headlines = observation::load_headlines(path)
            .with_context(|| format!("loading headlines from {}", path.display()))?;
        return Ok(headlines.into_iter().map(StationSlot::from).collect());
    }

    config
        .stations
        .iter()
        .map(|station| -> anyhow::Result<StationSlot> {
            let history = observation::load_noaa_file(&station.data_file).with_context(|| {
                format!("loading observations from {}", station.data_file.display())
            })?;
            let report = StationReport::from_observations(&station.name, &history, COLUMNS)
                .ok_or_else(|| ObservationError::NoObservations(station.name.clone()))?;
            info!("{}", report.format_line());
            Ok(StationSlot::from(&report))
        })
        .collect()
}

fn load_assets(config: &Config) -> anyhow::Result<Assets> {
    let wave = Sprite::load_file(&config.assets.wave_sprite).with_context(|| {
        format!(
            "loading wave sprite {}",
            config.assets.wave_sprite.display()
        )
    })?;
    let arrows = Sprite::load_file(&config.assets.arrow_sprite).with_context(|| {
        format!(
            "loading arrow sprite {}",
            config.assets.arrow_sprite.display()
        )
    })?;
    let glyphs = Glyphs::by_name(&config.assets.font)?;

    Ok(Assets {
        wave: Rc::new(wave),
        arrows: Rc::new(arrows),
        glyphs,
    })
}

fn play<D: Display>(
    mut display: D,
    animations: Vec<Animation>,
    token: &CancellationToken,
) -> anyhow::Result<()> {
    let mut render = RenderLoop::new(animations)?;
    let frames = render.run(&mut display, &mut ThreadPacer, token);
    display.shutdown();
    info!(frames, "display released");
    Ok(())
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with the terminal display
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load_from_path(&cli.config);

    // Everything below must load before the first frame is shown
    let assets = load_assets(&config)?;
    let stations = load_stations(&cli, &config)?;

    let picker = match cli.seed {
        Some(seed) => UniformPicker::seeded(seed),
        None => UniformPicker::from_entropy(),
    };
    let animations = playlist::build(&config, &assets, &stations, &picker);

    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || handler_token.cancel()).context("installing signal handler")?;

    let (width, height) = (config.display.width(), config.display.height());

    // Development mode: ANSI output for testing
    if cli.stdout {
        return play(
            buoy_matrix_lib::display::TerminalDisplay::stdout(width, height),
            animations,
            &token,
        );
    }

    // Production mode: the LED panel needs GPIO access (usually root)
    #[cfg(feature = "hardware")]
    {
        let display = buoy_matrix_lib::display::MatrixDisplay::new(&config.display)?;
        play(display, animations, &token)
    }

    #[cfg(not(feature = "hardware"))]
    {
        Err(anyhow::anyhow!(
            "LED panel support not enabled. Rebuild with --features hardware, or use --stdout"
        ))
    }
}
