//! spinchart - rolling listening charts from a streaming-history export

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::Parser;
use spinchart_cli::{run, RunOptions};
use spinchart_common::init_logging;
use spinchart_config::ConfigLoader;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing StreamingHistory<N>.json files
    #[arg(short, long)]
    input: PathBuf,

    /// Configuration file path (YAML or TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report destination; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level, overriding the configured one
    #[arg(short, long)]
    log_level: Option<String>,

    /// Year the listening-time statistics are relative to
    #[arg(short = 'y', long, env = "SPINCHART_REFERENCE_YEAR")]
    reference_year: Option<i32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_config(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ConfigLoader::load()?,
    };
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    init_logging(&config.logging)?;

    info!("Starting spinchart {}", env!("CARGO_PKG_VERSION"));

    let options = RunOptions {
        input: args.input,
        reference_year: args.reference_year.unwrap_or_else(|| Utc::now().year()),
    };
    let report = match run(&config, &options).await {
        Ok(report) => report,
        Err(e) => {
            error!("Run failed: {}", e);
            return Err(e.into());
        }
    };

    match args.output {
        Some(path) => {
            report.write_to(&path)?;
            info!("Report written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            report.write_json(stdout.lock())?;
            stdout.lock().flush()?;
        }
    }

    Ok(())
}
