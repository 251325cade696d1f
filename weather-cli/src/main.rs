//! Binary crate for the `route-weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Human-friendly output and route charts

use std::{fs::OpenOptions, path::Path, sync::Mutex};

use anyhow::{Context, anyhow};
use clap::Parser;
use route_weather_core::Config;
use tracing_subscriber::EnvFilter;

mod charts;
mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    let config = cmd.config_for(Config::load())?;
    init_tracing(config.log_file.as_deref())?;

    cmd.run(config).await
}

/// Log filter comes from `RUST_LOG`, defaulting to warnings only.
fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(|e| anyhow!("Failed to initialise logging: {e}"))
}
