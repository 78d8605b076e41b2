use anyhow::{Context, Result};
use clap::Parser;
use labterm::LayoutConfig;
use log::{info, warn};
use std::fs::File;
use std::path::PathBuf;

/// labterm - Terminal dashboard for lab instruments
#[derive(Parser, Debug, Clone)]
#[command(name = "labterm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Layout file to load (defaults to the saved layout, or the sample)
    #[arg(value_name = "LAYOUT_FILE")]
    layout_file: Option<PathBuf>,

    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Write diagnostic logs to this file (the terminal belongs to the dashboard)
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Stop the cursor at the grid edges instead of wrapping around
    #[arg(long = "no-cycle")]
    no_cycle: bool,

    /// Pause between instrument polls, in milliseconds
    #[arg(long = "interval-ms", value_name = "MS")]
    interval_ms: Option<u64>,

    /// Print the sample layout as JSON and exit
    #[arg(long = "print-default")]
    print_default: bool,

    /// Save the sample layout to the user config directory and exit
    #[arg(long = "init")]
    init: bool,
}

fn init_logging(cli: &Cli) -> Result<()> {
    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Allow RUST_LOG to override CLI setting
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level));
    let target = match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            env_logger::Target::Pipe(Box::new(file))
        }
        None => env_logger::Target::Pipe(Box::new(std::io::sink())),
    };
    builder.target(target).init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default {
        println!("{}", LayoutConfig::sample().to_json()?);
        return Ok(());
    }
    if cli.init {
        let sample = LayoutConfig::sample();
        sample.save()?;
        println!("Saved sample layout to {}", LayoutConfig::config_path()?.display());
        return Ok(());
    }

    init_logging(&cli)?;
    warn!("Starting labterm v{}", env!("CARGO_PKG_VERSION"));

    let mut layout = match &cli.layout_file {
        Some(path) => LayoutConfig::load_from_path(path)?,
        None => LayoutConfig::load()?,
    };

    if cli.no_cycle {
        layout.dashboard.cycle = false;
    }
    if let Some(ms) = cli.interval_ms {
        layout.dashboard.update_interval_ms = ms;
    }
    info!(
        "Loaded layout with {} instruments and {} items",
        layout.instruments.len(),
        layout.items.len()
    );

    let mut dashboard = layout.build()?;
    dashboard.run()?;

    info!("labterm exiting");
    Ok(())
}
