//! watchtime - viewing history statistics from the command line.
//!
//! Reads a viewing-activity export and prints watch-time totals.

use chrono::TimeZone;
use clap::Parser;
use std::path::PathBuf;
use watchtime::{load_activity_file, Config, OutputFormat, ViewingHistory, ViewingRecord};

#[derive(Debug, Parser)]
#[command(name = "watchtime", version, about = "Summarize a viewing-activity export")]
struct Cli {
    /// Viewing-activity JSON file.
    input: PathBuf,

    /// Report format.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Read calendar fields at this UTC offset instead of the host zone.
    #[arg(long, allow_hyphen_values = true)]
    utc_offset: Option<i32>,

    /// Config file (defaults to the user config directory).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Config::load(path),
        None => Config::load_default(),
    };

    // Initialize logging
    let log_filter = loaded
        .as_ref()
        .map(|config| config.log_filter.clone())
        .unwrap_or_else(|_| watchtime::config::DEFAULT_LOG_FILTER.to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(%e, "Failed to load configuration");
            return Err(e.into());
        }
    };
    if let Some(format) = cli.format {
        config.output = format;
    }
    if cli.utc_offset.is_some() {
        config.utc_offset_minutes = cli.utc_offset;
    }

    if let Err(e) = run(&cli, &config) {
        tracing::error!(%e, "Failed to summarize viewing activity");
        return Err(e);
    }

    Ok(())
}

fn run(cli: &Cli, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_activity_file(&cli.input)?;
    if records.is_empty() {
        tracing::warn!(path = ?cli.input, "Activity file contains no viewed items");
    }

    match config.utc_offset()? {
        Some(offset) => print_report(records, offset, config.output),
        None => print_report(records, chrono::Local, config.output),
    }
}

fn print_report<Tz: TimeZone>(
    records: Vec<ViewingRecord>,
    tz: Tz,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = ViewingHistory::with_timezone(records, tz).summarize();

    match format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
