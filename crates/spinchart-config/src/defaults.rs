//! Default values for every configuration section.

use crate::schema::*;

/// One day in milliseconds.
pub const DEFAULT_WINDOW_LENGTH_MS: u64 = 24 * 60 * 60 * 1000;

/// Four weeks of daily intervals.
pub const DEFAULT_ROLLING_WINDOW_SIZE: usize = 28;

/// Entries per chart.
pub const DEFAULT_CHART_SIZE: usize = 15;

/// Events or intervals processed between yields.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Artists listed in the statistics.
pub const DEFAULT_TOP_ARTISTS: usize = 50;

/// Timezone used when none is configured.
pub const DEFAULT_TIMEZONE: &str = "UTC";

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            window_length_ms: DEFAULT_WINDOW_LENGTH_MS,
        }
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            rolling_window_size: DEFAULT_ROLLING_WINDOW_SIZE,
            chart_size: DEFAULT_CHART_SIZE,
            rank_base: spinchart_common::RankBase::default(),
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            top_artists: DEFAULT_TOP_ARTISTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spinchart_common::RankBase;

    #[test]
    fn test_defaults_match_reference_values() {
        let config = Config::default();
        assert_eq!(config.aggregation.window_length_ms, 86_400_000);
        assert_eq!(config.leaderboard.rolling_window_size, 28);
        assert_eq!(config.leaderboard.chart_size, 15);
        assert_eq!(config.leaderboard.rank_base, RankBase::One);
        assert_eq!(config.processing.chunk_size, 10_000);
        assert_eq!(config.import.timezone, "UTC");
        assert_eq!(config.statistics.top_artists, 50);
        assert_eq!(config.logging.level, "info");
    }
}
