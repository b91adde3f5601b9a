//! The end-to-end run: import, aggregate, rank, summarize.

use crate::error::CliResult;
use crate::import::load_events;
use crate::report::Report;
use chrono::Utc;
use spinchart_charts::{
    top_artists, AggregationProgress, IntervalAggregator, LeaderboardBuilder, ListeningTimeStats,
};
use spinchart_common::{format_hours, format_timestamp};
use spinchart_config::Config;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// Per-invocation inputs that do not come from the config file.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Extracted export directory.
    pub input: PathBuf,
    /// Year the listening-time split is relative to.
    pub reference_year: i32,
}

/// Run the whole pipeline and return the report.
#[instrument(skip(config), fields(input = %options.input.display()))]
pub async fn run(config: &Config, options: &RunOptions) -> CliResult<Report> {
    let tz = config.timezone()?;
    let aggregator = IntervalAggregator::new(config.aggregation.window_length_ms)?;
    let builder = LeaderboardBuilder::new(
        config.leaderboard.rolling_window_size,
        config.leaderboard.chart_size,
    )?;
    let chunk_size = config.processing.chunk_size;

    let input = options.input.clone();
    let events = tokio::task::spawn_blocking(move || load_events(&input, tz)).await??;

    let (progress_tx, progress_rx) = mpsc::unbounded_channel();
    let progress_logger = tokio::spawn(log_progress(progress_rx));

    let result = aggregator
        .aggregate_chunked(&events, chunk_size, Some(progress_tx.clone()))
        .await?;
    let leaderboard = builder
        .build_history_chunked(&result, chunk_size, Some(progress_tx))
        .await?;
    progress_logger.await?;

    let stats = ListeningTimeStats::from_events(&events, options.reference_year)?;
    let top = top_artists(&result.totals, config.statistics.top_artists);

    if let (Some(first), Some(last)) = (leaderboard.dates().first(), leaderboard.dates().last()) {
        info!(
            "Charted {} tracks from {} to {}, {} listened",
            leaderboard.len(),
            format_timestamp(*first),
            format_timestamp(*last),
            format_hours(stats.total_ms, 0)
        );
    }

    Ok(Report::new(
        Utc::now(),
        config.leaderboard.rank_base,
        &leaderboard,
        result.totals,
        stats,
        top,
    ))
}

/// Drain progress updates until every sender is gone.
async fn log_progress(mut rx: mpsc::UnboundedReceiver<AggregationProgress>) {
    while let Some(update) = rx.recv().await {
        debug!(
            stage = ?update.stage,
            processed = update.processed,
            total = update.total,
            "{} ({:.0}%)",
            update.message,
            update.progress * 100.0
        );
    }
}
