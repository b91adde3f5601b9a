//! Configuration loading from YAML or TOML files with environment overrides.

use crate::schema::Config;
use spinchart_common::{RankBase, Result as SpinchartResult, SpinchartError};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SPINCHART_CONFIG_PATH";

/// File names searched, in order, when no path is given.
pub const DEFAULT_CONFIG_FILES: [&str; 3] = ["spinchart.yaml", "spinchart.yml", "spinchart.toml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// File extension is neither YAML nor TOML
    #[error("Unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable name.
        var: String,
        /// Underlying parse failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A value failed validation
    #[error("Invalid configuration value for '{field}': {message}")]
    Invalid {
        /// Dotted path of the offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

impl ConfigError {
    /// Creates an [`ConfigError::Invalid`].
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<ConfigError> for SpinchartError {
    fn from(err: ConfigError) -> Self {
        Self::config_with_source(err.to_string(), err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML or TOML file with environment variable
    /// overrides, then validate it.
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::load_config_with(path, |var| env::var(var).ok())
    }

    /// Like [`ConfigLoader::load_config`] with an explicit variable lookup.
    pub fn load_config_with<P, F>(path: P, lookup: F) -> Result<Config, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let mut config = Self::parse_file(path)?;
        Self::apply_env_overrides_from(&mut config, lookup)?;
        config.validate()?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration using the standard discovery order: the file named
    /// by `SPINCHART_CONFIG_PATH`, then the first default file found in the
    /// working directory, otherwise built-in defaults.
    pub fn load() -> SpinchartResult<Config> {
        Ok(Self::load_from(Path::new("."), |var| env::var(var).ok())?)
    }

    /// Discovery as in [`ConfigLoader::load`], searching `dir` for default
    /// files and reading variables through `lookup`.
    pub fn load_from<F>(dir: &Path, lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(CONFIG_PATH_ENV) {
            return Self::load_config_with(path, lookup);
        }
        if let Some(path) = Self::discover(dir) {
            return Self::load_config_with(path, lookup);
        }

        debug!("No configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_env_overrides_from(&mut config, lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// First default config file present in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Parse a config file by extension without overrides or validation.
    pub fn parse_file(path: &Path) -> Result<Config, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let content = std::fs::read_to_string(path)?;
        match extension.as_deref() {
            Some("yaml" | "yml") => Self::parse_yaml(&content),
            Some("toml") => Ok(toml::from_str(&content)?),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    fn parse_yaml(content: &str) -> Result<Config, ConfigError> {
        // an empty document means "all defaults"
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_env_overrides_from(config, |var| env::var(var).ok())
    }

    /// Apply overrides read through `lookup`.
    pub fn apply_env_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("SPINCHART_WINDOW_MS") {
            config.aggregation.window_length_ms = parse_var("SPINCHART_WINDOW_MS", &value)?;
        }

        if let Some(value) = lookup("SPINCHART_ROLLING_WINDOW") {
            config.leaderboard.rolling_window_size = parse_var("SPINCHART_ROLLING_WINDOW", &value)?;
        }

        if let Some(value) = lookup("SPINCHART_CHART_SIZE") {
            config.leaderboard.chart_size = parse_var("SPINCHART_CHART_SIZE", &value)?;
        }

        if let Some(value) = lookup("SPINCHART_RANK_BASE") {
            config.leaderboard.rank_base =
                RankBase::from_str(&value).map_err(|e| ConfigError::EnvParseError {
                    var: "SPINCHART_RANK_BASE".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Some(value) = lookup("SPINCHART_CHUNK_SIZE") {
            config.processing.chunk_size = parse_var("SPINCHART_CHUNK_SIZE", &value)?;
        }

        if let Some(value) = lookup("SPINCHART_TIMEZONE") {
            config.import.timezone = value;
        }

        if let Some(value) = lookup("SPINCHART_LOG_LEVEL") {
            config.logging.level = value;
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e| ConfigError::EnvParseError {
        var: var.to_string(),
        source: Box::new(e),
    })
}
