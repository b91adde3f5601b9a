//! Rolling leaderboard: a top-N chart per interval computed over a trailing
//! window of intervals, recorded as a per-track rank history.

use crate::aggregator::{AggregationResult, Interval};
use crate::progress::{check_chunk_size, send_progress, AggregationStage, ProgressSender};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use spinchart_common::{Rank, RankBase, Result, SpinchartError, TrackKey};
use tracing::{debug, info, instrument, warn};

/// Number of intervals in the trailing window by default.
pub const DEFAULT_ROLLING_WINDOW_SIZE: usize = 28;

/// Number of chart entries per interval by default.
pub const DEFAULT_CHART_SIZE: usize = 15;

/// Per-track rank sequence, one slot per interval. `None` means off the chart.
pub type RankingHistory = IndexMap<TrackKey, Vec<Option<Rank>>>;

/// Rank histories aligned with the interval start dates.
///
/// Keys are ordered by first chart appearance. Every sequence is at most
/// `dates.len()` long and slot `j` always refers to `dates[j]`; a sequence
/// stops after the last interval in which its track charted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Leaderboard {
    history: RankingHistory,
    dates: Vec<DateTime<Utc>>,
}

impl Leaderboard {
    /// Rank history per track.
    pub const fn history(&self) -> &RankingHistory {
        &self.history
    }

    /// Interval start dates.
    pub fn dates(&self) -> &[DateTime<Utc>] {
        &self.dates
    }

    /// Number of tracks that charted at least once.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether no track ever charted.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Rank history of one track.
    pub fn get(&self, key: &TrackKey) -> Option<&[Option<Rank>]> {
        self.history.get(key).map(Vec::as_slice)
    }

    /// Rank history looked up by its `"<track> - <artist>"` label.
    pub fn get_by_label(&self, label: &str) -> Option<&[Option<Rank>]> {
        self.history
            .iter()
            .find(|(key, _)| key.label() == label)
            .map(|(_, ranks)| ranks.as_slice())
    }

    /// Rank of `key` at interval `index`, if it charted there.
    pub fn rank_at(&self, key: &TrackKey, index: usize) -> Option<Rank> {
        self.history.get(key)?.get(index).copied().flatten()
    }

    /// The chart at interval `index`, ordered by rank. `None` when `index`
    /// is past the last interval.
    pub fn chart_at(&self, index: usize) -> Option<Vec<(&TrackKey, Rank)>> {
        if index >= self.dates.len() {
            return None;
        }
        let mut chart: Vec<_> = self
            .history
            .iter()
            .filter_map(|(key, ranks)| ranks.get(index).copied().flatten().map(|rank| (key, rank)))
            .collect();
        chart.sort_by_key(|(_, rank)| *rank);
        Some(chart)
    }

    /// History keyed by label with ranks shown under `base`.
    pub fn display_history(&self, base: RankBase) -> IndexMap<String, Vec<Option<u32>>> {
        self.history
            .iter()
            .map(|(key, ranks)| {
                let shown = ranks.iter().map(|rank| rank.map(|r| r.display(base))).collect();
                (key.label(), shown)
            })
            .collect()
    }
}

/// Computes rolling charts over an [`AggregationResult`].
#[derive(Debug, Clone, Copy)]
pub struct LeaderboardBuilder {
    rolling_window_size: usize,
    chart_size: usize,
}

impl LeaderboardBuilder {
    /// Creates a builder; both sizes must be positive.
    pub fn new(rolling_window_size: usize, chart_size: usize) -> Result<Self> {
        if rolling_window_size == 0 {
            return Err(SpinchartError::validation_field(
                "rolling_window_size must be positive",
                "rolling_window_size",
            ));
        }
        if chart_size == 0 {
            return Err(SpinchartError::validation_field(
                "chart_size must be positive",
                "chart_size",
            ));
        }
        Ok(Self {
            rolling_window_size,
            chart_size,
        })
    }

    /// Starts an incremental run over `result`.
    pub fn start<'a>(&self, result: &'a AggregationResult) -> RollingChart<'a> {
        RollingChart {
            intervals: &result.intervals,
            rolling_window_size: self.rolling_window_size,
            chart_size: self.chart_size,
            next_index: 0,
            rolling_sums: IndexMap::new(),
            history: IndexMap::new(),
            dates: Vec::with_capacity(result.intervals.len()),
        }
    }

    /// Build the full history in one call.
    #[instrument(skip(self, result), fields(intervals = result.intervals.len()))]
    pub fn build_history(&self, result: &AggregationResult) -> Result<Leaderboard> {
        let mut chart = self.start(result);
        while chart.advance()? {}
        let leaderboard = chart.finish();

        debug!(
            "Built rank history for {} tracks over {} intervals",
            leaderboard.len(),
            leaderboard.dates.len()
        );
        Ok(leaderboard)
    }

    /// Build the history `chunk_size` intervals at a time, yielding to the
    /// runtime between chunks. Produces the same result as
    /// [`LeaderboardBuilder::build_history`].
    #[instrument(skip(self, result, progress_tx), fields(intervals = result.intervals.len()))]
    pub async fn build_history_chunked(
        &self,
        result: &AggregationResult,
        chunk_size: usize,
        progress_tx: Option<ProgressSender>,
    ) -> Result<Leaderboard> {
        check_chunk_size(chunk_size)?;
        let tx = progress_tx.as_ref();
        let total = result.intervals.len();
        send_progress(tx, AggregationStage::Initializing, 0, total, "Starting rank history");

        let mut chart = self.start(result);
        let mut processed = 0;
        loop {
            send_progress(
                tx,
                AggregationStage::Processing,
                processed,
                total,
                format!("Ranking intervals {}..{}", processed, (processed + chunk_size).min(total)),
            );

            let mut done = false;
            for _ in 0..chunk_size {
                if !chart.advance()? {
                    done = true;
                    break;
                }
                processed += 1;
            }
            if done || processed == total {
                break;
            }

            tokio::task::yield_now().await;
        }

        send_progress(tx, AggregationStage::Finalizing, processed, total, "Collecting history");
        let leaderboard = chart.finish();
        send_progress(tx, AggregationStage::Complete, processed, total, "Rank history complete");

        info!(
            "Chunked rank history completed: {} tracks over {} intervals",
            leaderboard.len(),
            processed
        );
        Ok(leaderboard)
    }
}

impl Default for LeaderboardBuilder {
    fn default() -> Self {
        Self {
            rolling_window_size: DEFAULT_ROLLING_WINDOW_SIZE,
            chart_size: DEFAULT_CHART_SIZE,
        }
    }
}

/// Build the rank history for `result` with the given window and chart size.
pub fn build_history(
    result: &AggregationResult,
    rolling_window_size: usize,
    chart_size: usize,
) -> Result<Leaderboard> {
    LeaderboardBuilder::new(rolling_window_size, chart_size)?.build_history(result)
}

/// An in-progress leaderboard run, advanced one interval at a time.
///
/// Rolling sums are maintained by adding the entering interval and
/// subtracting the one that falls out of the window, so each step costs
/// the size of two intervals plus one sort of the tracks seen so far.
#[derive(Debug)]
pub struct RollingChart<'a> {
    intervals: &'a [Interval],
    rolling_window_size: usize,
    chart_size: usize,
    next_index: usize,
    rolling_sums: IndexMap<TrackKey, i64>,
    history: RankingHistory,
    dates: Vec<DateTime<Utc>>,
}

impl RollingChart<'_> {
    /// Processes the next interval. Returns `false` once every interval has
    /// been processed.
    pub fn advance(&mut self) -> Result<bool> {
        let index = self.next_index;
        let Some(entering) = self.intervals.get(index) else {
            return Ok(false);
        };

        self.dates.push(entering.start);
        for (artist, track, ms) in entering.totals.iter() {
            self.adjust(TrackKey::new(track, artist), ms, true)?;
        }
        if index >= self.rolling_window_size {
            let exiting = &self.intervals[index - self.rolling_window_size];
            for (artist, track, ms) in exiting.totals.iter() {
                self.adjust(TrackKey::new(track, artist), ms, false)?;
            }
        }

        let mut snapshot: Vec<(&TrackKey, i64)> =
            self.rolling_sums.iter().map(|(key, sum)| (key, *sum)).collect();
        // sort_by is stable: equal sums keep first-seen order
        snapshot.sort_by(|a, b| b.1.cmp(&a.1));
        snapshot.truncate(self.chart_size);

        for (position, (key, _)) in snapshot.into_iter().enumerate() {
            let rank = u32::try_from(position).map(Rank).map_err(|_| {
                SpinchartError::validation_field("chart position exceeds u32", "chart_size")
            })?;
            let slots = self.history.entry(key.clone()).or_default();
            if slots.len() < index {
                slots.resize(index, None);
            }
            slots.push(Some(rank));
        }

        self.next_index += 1;
        Ok(true)
    }

    /// Current trailing-window sum for `key`, zero when never seen.
    pub fn rolling_sum(&self, key: &TrackKey) -> i64 {
        self.rolling_sums.get(key).copied().unwrap_or(0)
    }

    /// Number of intervals processed so far.
    pub const fn processed(&self) -> usize {
        self.next_index
    }

    /// Stops the run and returns what has been built so far.
    pub fn finish(self) -> Leaderboard {
        Leaderboard {
            history: self.history,
            dates: self.dates,
        }
    }

    fn adjust(&mut self, key: TrackKey, ms: u64, entering: bool) -> Result<()> {
        let sum = self.rolling_sums.entry(key).or_insert(0);
        let updated = i64::try_from(ms).ok().and_then(|delta| {
            if entering {
                sum.checked_add(delta)
            } else {
                sum.checked_sub(delta)
            }
        });
        let Some(value) = updated else {
            warn!(ms, "Rolling sum left the i64 range");
            return Err(SpinchartError::validation_field(
                "rolling sum overflows i64 milliseconds",
                "ms_played",
            ));
        };
        *sum = value;
        Ok(())
    }
}
