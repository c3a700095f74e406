//! Railpool CLI
//!
//! Loads a ticket feed into fresh in-memory stores and answers one
//! remaining-seat lookup. Handy for checking an inventory export by hand.

use anyhow::{Context, Result};
use clap::Parser;
use railpool_cache::{TicketFeed, TicketServices};
use railpool_common::Config;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "railpool-cli")]
#[command(about = "Look up a route and its remaining seats")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "railpool.toml")]
    config: PathBuf,

    /// JSON ticket feed to load before the lookup
    #[arg(short, long)]
    feed: Option<PathBuf>,

    /// Log level (overrides the config file)
    #[arg(long)]
    log_level: Option<String>,

    /// Print store statistics in Prometheus format after the lookup
    #[arg(long)]
    metrics: bool,

    /// Departure station
    from: String,

    /// Arrival station
    to: String,
}

/// Read the config file, or fall back to defaults if it does not exist
fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let config_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&config_str).with_context(|| format!("invalid config file {}", path.display()))
}

fn parse_config(config_str: &str) -> Result<Config> {
    Ok(toml::from_str(config_str)?)
}

fn load_feed(path: &Path) -> Result<TicketFeed> {
    let file =
        File::open(path).with_context(|| format!("failed to open feed {}", path.display()))?;
    Ok(TicketFeed::from_reader(BufReader::new(file))?)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    // CLI flag takes precedence over the config file
    let log_level = args
        .log_level
        .unwrap_or_else(|| config.logging.level.clone());

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Config file: {}", args.config.display());
    let services = TicketServices::new(&config.cache);

    if let Some(feed_path) = &args.feed {
        let report = load_feed(feed_path)?.apply(&services)?;
        info!(
            "Loaded feed {}: {} new, {} replaced, {} counters",
            feed_path.display(),
            report.inserted,
            report.replaced,
            report.counters
        );
    }

    let code = match services.remaining().get(&args.from, &args.to) {
        Some(view) => {
            println!("{}", serde_json::to_string_pretty(&view)?);
            ExitCode::SUCCESS
        }
        None => {
            warn!("No ticket for {} -> {}", args.from, args.to);
            println!("not found: {} -> {}", args.from, args.to);
            ExitCode::FAILURE
        }
    };

    if args.metrics {
        print!("{}", services.render_prometheus());
    }
    Ok(code)
}
