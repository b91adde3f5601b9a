//! Application-wide error types using thiserror.

use spinchart_common::SpinchartError;
use spinchart_config::ConfigError;
use std::path::PathBuf;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Import, aggregation or ranking failure.
    #[error(transparent)]
    Spinchart(#[from] SpinchartError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Report could not be serialized.
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Report could not be written.
    #[error("Failed to write report to {}: {source}", path.display())]
    Output {
        /// Destination that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A background task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for the command line application.
pub type CliResult<T> = Result<T, CliError>;
