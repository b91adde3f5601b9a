//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use spinchart_common::{LoggingConfig, RankBase};

/// Main configuration structure for spinchart.
///
/// Every section is optional in a config file; missing sections and fields
/// take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interval bucketing.
    pub aggregation: AggregationConfig,
    /// Rolling chart parameters.
    pub leaderboard: LeaderboardConfig,
    /// Chunked processing.
    pub processing: ProcessingConfig,
    /// Streaming history import.
    pub import: ImportConfig,
    /// Whole-history statistics.
    pub statistics: StatisticsConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Interval bucketing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Bucket length in milliseconds.
    pub window_length_ms: u64,
}

/// Rolling chart configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// Number of intervals summed for each chart.
    pub rolling_window_size: usize,
    /// Number of entries per chart.
    pub chart_size: usize,
    /// Numbering of ranks in reports.
    pub rank_base: RankBase,
}

/// Chunked processing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Events (or intervals) handled between yields.
    pub chunk_size: usize,
}

/// Streaming history import configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// IANA timezone whose calendar days the buckets should follow.
    pub timezone: String,
}

/// Statistics configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    /// Number of artists in the top-artists list.
    pub top_artists: usize,
}
