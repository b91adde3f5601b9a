//! Structured logging setup for spinchart

use crate::{Result, SpinchartError};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "spinchart_charts=debug")
    pub level: String,
    /// Emit one JSON object per event instead of human-readable lines
    pub json_format: bool,
    /// Optional file path for log output; stderr when absent
    pub file_path: Option<String>,
    /// Whether to log span open/close events
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

impl LoggingConfig {
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }

    fn span_events(&self) -> FmtSpan {
        if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    /// Where log lines go: the file path, or `stderr`.
    pub fn output_target(&self) -> &str {
        self.file_path.as_deref().unwrap_or("stderr")
    }

    fn open_file(&self) -> Result<Option<File>> {
        self.file_path
            .as_deref()
            .map(|path| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| SpinchartError::config_with_source(format!("cannot open log file {path}"), e))
            })
            .transpose()
    }
}

/// Initialize the global tracing subscriber with the given configuration.
///
/// Logs go to stderr (or the configured file) so that stdout stays free for
/// report output. Fails if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(config.env_filter());
    let file = config.open_file()?;

    let installed = if config.json_format {
        let layer = fmt::layer()
            .json()
            .with_span_events(config.span_events())
            .with_target(config.include_targets);

        match file {
            Some(file) => registry.with(layer.with_writer(Mutex::new(file))).try_init(),
            None => registry.with(layer.with_writer(std::io::stderr)).try_init(),
        }
    } else {
        let layer = fmt::layer()
            .with_span_events(config.span_events())
            .with_target(config.include_targets);

        match file {
            Some(file) => registry
                .with(layer.with_ansi(false).with_writer(Mutex::new(file)))
                .try_init(),
            None => registry.with(layer.with_writer(std::io::stderr)).try_init(),
        }
    };

    installed.map_err(|e| SpinchartError::config_with_source("failed to install tracing subscriber", e))?;

    debug!(
        level = %config.level,
        output = config.output_target(),
        json = config.json_format,
        "Logging initialized"
    );
    Ok(())
}
