//! Gaze window replay tool: landmark frames in, window records out.

use anyhow::{Context, Result};
use clap::Parser;
use gaze_window::{
    app::{AppConfig, GazeWindowApp},
    condition::Condition,
    config::{Config, EXAMPLE_CONFIG},
};
use log::info;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded frames as JSON lines (stdin when omitted)
    #[arg(short, long)]
    frames: Option<PathBuf>,

    /// Condition id (1-6) or name, overrides the config file
    #[arg(short, long)]
    condition: Option<Condition>,

    /// Local participant id, overrides the config file
    #[arg(short, long)]
    participant_id: Option<i64>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Print each window record as a data channel JSON line
    #[arg(short, long)]
    emit: bool,

    /// Record a head direction measurement from the first frame
    #[arg(short, long)]
    measure: bool,

    /// Directory for measurement logs, overrides the config file
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    info!("Gaze Window");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if let Some(condition) = args.condition {
        config.session.condition = condition.id();
    }
    if let Some(participant_id) = args.participant_id {
        config.session.participant_id = participant_id;
    }
    if let Some(output_dir) = args.output_dir {
        config.session.output_dir = output_dir;
    }

    let mut app = GazeWindowApp::new(AppConfig::new(config, args.emit, args.measure))?;

    let stdout = io::stdout();
    let summary = if let Some(path) = &args.frames {
        let file = File::open(path).with_context(|| format!("Failed to open frames file {}", path.display()))?;
        app.run_with(BufReader::new(file), stdout.lock())?
    } else {
        app.run_with(io::stdin().lock(), stdout.lock())?
    };

    for path in &summary.measurement_files {
        info!("Measurement saved: {}", path.display());
    }

    Ok(())
}
