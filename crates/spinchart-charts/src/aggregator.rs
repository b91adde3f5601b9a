//! Interval aggregation: folds a sorted play-event stream into contiguous,
//! fixed-length time buckets of per-(artist, track) listening time.
//!
//! Bucket boundaries are multiples of the window length measured from the
//! Unix epoch. Buckets are half-open (`[start, start + window)`) and gapless:
//! a bucket in which nothing was played is still emitted, because the
//! leaderboard relies on one bucket per window step.

use crate::duration_map::DurationMap;
use crate::progress::{check_chunk_size, send_progress, AggregationStage, ProgressSender};
use chrono::{DateTime, Utc};
use serde::Serialize;
use spinchart_common::{max_window_length_ms, PlayEvent, Result, SpinchartError, MS_PER_DAY};
use tracing::{debug, info, instrument, warn};

/// One fixed-length time bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interval {
    /// Inclusive lower bound.
    pub start: DateTime<Utc>,
    /// Listening time within this bucket only.
    pub totals: DurationMap,
}

impl Interval {
    /// Whether `at` falls in `[start, start + window_length_ms)`.
    pub fn contains(&self, at: DateTime<Utc>, window_length_ms: i64) -> bool {
        let start = self.start.timestamp_millis();
        let at = at.timestamp_millis();
        at >= start && at < start.saturating_add(window_length_ms)
    }
}

/// Output of an aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationResult {
    /// Grand total across all buckets.
    pub totals: DurationMap,
    /// Buckets in chronological order.
    pub intervals: Vec<Interval>,
    /// Bucket length the run used.
    pub window_length_ms: i64,
}

impl AggregationResult {
    /// A result with no buckets, as produced for an empty event list.
    pub fn empty(window_length_ms: i64) -> Self {
        Self {
            totals: DurationMap::new(),
            intervals: Vec::new(),
            window_length_ms,
        }
    }

    /// Index of the bucket containing `at`, if it lies within the covered span.
    pub fn interval_index_of(&self, at: DateTime<Utc>) -> Option<usize> {
        let first = self.intervals.first()?.start.timestamp_millis();
        let offset = at.timestamp_millis().checked_sub(first)?;
        if offset < 0 {
            return None;
        }
        let index = usize::try_from(offset / self.window_length_ms).ok()?;
        (index < self.intervals.len()).then_some(index)
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether no buckets were produced.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

/// Buckets play events into fixed-length intervals.
#[derive(Debug, Clone, Copy)]
pub struct IntervalAggregator {
    window_length_ms: i64,
}

impl IntervalAggregator {
    /// Creates an aggregator with the given bucket length in milliseconds.
    ///
    /// The length may not exceed [`max_window_length_ms`].
    pub fn new(window_length_ms: u64) -> Result<Self> {
        if window_length_ms == 0 {
            return Err(SpinchartError::validation_field(
                "window_length_ms must be positive",
                "window_length_ms",
            ));
        }
        let max = max_window_length_ms();
        if window_length_ms > max {
            warn!(window_length_ms, max, "Window length outside the representable time range");
            return Err(SpinchartError::validation_field(
                format!(
                    "window_length_ms {window_length_ms} exceeds {max}, \
                     the span from the earliest representable time to the epoch"
                ),
                "window_length_ms",
            ));
        }
        let window_length_ms = i64::try_from(window_length_ms).map_err(|_| {
            SpinchartError::validation_field(
                format!("window_length_ms {window_length_ms} exceeds i64 milliseconds"),
                "window_length_ms",
            )
        })?;
        Ok(Self { window_length_ms })
    }

    /// One-day buckets.
    pub fn daily() -> Self {
        Self {
            window_length_ms: MS_PER_DAY as i64,
        }
    }

    /// Aggregate a sorted event list in a single pass.
    #[instrument(skip(self, events), fields(events = events.len(), window_ms = self.window_length_ms))]
    pub fn aggregate(&self, events: &[PlayEvent]) -> Result<AggregationResult> {
        let Some(first) = events.first() else {
            debug!("No events to aggregate");
            return Ok(AggregationResult::empty(self.window_length_ms));
        };

        let mut folder = IntervalFolder::new(self.window_length_ms, first);
        for (index, event) in events.iter().enumerate() {
            folder.push(index, event)?;
        }
        let result = folder.finish()?;

        debug!(
            "Aggregated {} events into {} intervals ({} tracks)",
            events.len(),
            result.intervals.len(),
            result.totals.len()
        );
        Ok(result)
    }

    /// Aggregate in chunks of `chunk_size` events, yielding to the runtime
    /// between chunks and reporting progress. Produces the same result as
    /// [`IntervalAggregator::aggregate`].
    #[instrument(skip(self, events, progress_tx), fields(events = events.len()))]
    pub async fn aggregate_chunked(
        &self,
        events: &[PlayEvent],
        chunk_size: usize,
        progress_tx: Option<ProgressSender>,
    ) -> Result<AggregationResult> {
        check_chunk_size(chunk_size)?;
        let tx = progress_tx.as_ref();
        let total = events.len();
        send_progress(tx, AggregationStage::Initializing, 0, total, "Starting aggregation");

        let Some(first) = events.first() else {
            send_progress(tx, AggregationStage::Complete, 0, 0, "Nothing to aggregate");
            return Ok(AggregationResult::empty(self.window_length_ms));
        };

        let mut folder = IntervalFolder::new(self.window_length_ms, first);
        let chunk_count = total.div_ceil(chunk_size);
        let mut processed = 0;

        for (chunk_index, chunk) in events.chunks(chunk_size).enumerate() {
            send_progress(
                tx,
                AggregationStage::Processing,
                processed,
                total,
                format!("Processing chunk {}/{}", chunk_index + 1, chunk_count),
            );

            for event in chunk {
                folder.push(processed, event)?;
                processed += 1;
            }

            // Yield control to allow other tasks to run
            tokio::task::yield_now().await;
        }

        send_progress(tx, AggregationStage::Finalizing, processed, total, "Closing final interval");
        let result = folder.finish()?;
        send_progress(tx, AggregationStage::Complete, processed, total, "Aggregation complete");

        info!(
            "Chunked aggregation completed: {} events into {} intervals",
            processed,
            result.intervals.len()
        );
        Ok(result)
    }
}

impl Default for IntervalAggregator {
    fn default() -> Self {
        Self::daily()
    }
}

/// Aggregate `events` (sorted ascending by end time) into buckets of
/// `window_length_ms`.
pub fn aggregate(events: &[PlayEvent], window_length_ms: u64) -> Result<AggregationResult> {
    IntervalAggregator::new(window_length_ms)?.aggregate(events)
}

/// Running state of one aggregation pass.
struct IntervalFolder {
    window_length_ms: i64,
    interval_start: i64,
    current: DurationMap,
    totals: DurationMap,
    intervals: Vec<Interval>,
    last_end_ms: i64,
}

impl IntervalFolder {
    fn new(window_length_ms: i64, first: &PlayEvent) -> Self {
        let first_ms = first.end_time_ms();
        Self {
            window_length_ms,
            interval_start: first_ms.div_euclid(window_length_ms) * window_length_ms,
            current: DurationMap::new(),
            totals: DurationMap::new(),
            intervals: Vec::new(),
            last_end_ms: first_ms,
        }
    }

    fn push(&mut self, index: usize, event: &PlayEvent) -> Result<()> {
        let end_ms = event.end_time_ms();
        if end_ms < self.last_end_ms {
            warn!(index, "Play events are not sorted by end time");
            return Err(SpinchartError::validation_field(
                format!(
                    "event {index} ends at {} which is before the previous event ({} ms)",
                    event.end_time, self.last_end_ms
                ),
                "events",
            ));
        }
        self.last_end_ms = end_ms;

        while end_ms >= self.interval_start.saturating_add(self.window_length_ms) {
            self.close_current()?;
        }

        self.current
            .add(&event.artist_name, &event.track_name, event.ms_played)?;
        self.totals
            .add(&event.artist_name, &event.track_name, event.ms_played)
    }

    fn close_current(&mut self) -> Result<()> {
        let start = DateTime::from_timestamp_millis(self.interval_start).ok_or_else(|| {
            SpinchartError::validation(format!(
                "interval start {} ms is outside the representable time range",
                self.interval_start
            ))
        })?;
        self.intervals.push(Interval {
            start,
            totals: std::mem::take(&mut self.current),
        });
        self.interval_start = self.interval_start.saturating_add(self.window_length_ms);
        Ok(())
    }

    fn finish(mut self) -> Result<AggregationResult> {
        self.close_current()?;
        Ok(AggregationResult {
            totals: self.totals,
            intervals: self.intervals,
            window_length_ms: self.window_length_ms,
        })
    }
}
