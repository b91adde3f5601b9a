//! Runtime validation of loaded configuration.

use crate::loader::ConfigError;
use crate::schema::Config;
use chrono_tz::Tz;
use spinchart_common::max_window_length_ms;
use tracing::warn;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first offending field.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let result = Self::check(config);
        if let Err(err) = &result {
            warn!("Rejected configuration: {err}");
        }
        result
    }

    fn check(config: &Config) -> Result<(), ConfigError> {
        let window = config.aggregation.window_length_ms;
        if window == 0 {
            return Err(ConfigError::invalid(
                "aggregation.window_length_ms",
                "must be positive",
            ));
        }
        let max = max_window_length_ms();
        if window > max {
            return Err(ConfigError::invalid(
                "aggregation.window_length_ms",
                format!("{window} exceeds {max}, the span from the earliest representable time to the epoch"),
            ));
        }

        let positive = [
            ("leaderboard.rolling_window_size", config.leaderboard.rolling_window_size),
            ("leaderboard.chart_size", config.leaderboard.chart_size),
            ("processing.chunk_size", config.processing.chunk_size),
            ("statistics.top_artists", config.statistics.top_artists),
        ];
        if let Some((field, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::invalid(*field, "must be positive"));
        }

        parse_timezone(&config.import.timezone)?;

        if config.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid("logging.level", "cannot be empty"));
        }
        if matches!(config.logging.file_path.as_deref(), Some(path) if path.trim().is_empty()) {
            return Err(ConfigError::invalid("logging.file_path", "cannot be empty if specified"));
        }

        Ok(())
    }
}

/// Parse an IANA timezone name such as `"Europe/Berlin"` or `"UTC"`.
pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ConfigError::invalid("import.timezone", format!("unknown timezone '{name}'")))
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigValidator::validate(self)
    }

    /// The configured import timezone.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        parse_timezone(&self.import.timezone)
    }
}
