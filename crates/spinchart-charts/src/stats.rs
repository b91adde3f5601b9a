//! Whole-history listening statistics: time by calendar year and the
//! most-played artists.

use crate::duration_map::DurationMap;
use chrono::Datelike;
use serde::Serialize;
use spinchart_common::{PlayEvent, Result, SpinchartError};
use tracing::debug;

/// Number of artists reported by default.
pub const DEFAULT_TOP_ARTISTS: usize = 50;

/// Listening time split by calendar year relative to a reference year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListeningTimeStats {
    /// Year the split is relative to.
    pub reference_year: i32,
    /// Sum of every bucket below, `future_ms` included. This differs from a
    /// this + last + older total whenever the history has plays dated after
    /// the reference year.
    pub total_ms: u64,
    /// Plays ending in the reference year.
    pub this_year_ms: u64,
    /// Plays ending in the year before.
    pub last_year_ms: u64,
    /// Plays ending two or more years before.
    pub older_ms: u64,
    /// Plays ending after the reference year.
    pub future_ms: u64,
}

impl ListeningTimeStats {
    /// Sum `ms_played` by the UTC calendar year of each event's end time.
    ///
    /// `reference_year` must have a previous year (`i32::MIN` is rejected).
    pub fn from_events(events: &[PlayEvent], reference_year: i32) -> Result<Self> {
        let last_year = reference_year.checked_sub(1).ok_or_else(|| {
            SpinchartError::validation_field(
                format!("reference year {reference_year} has no previous year"),
                "reference_year",
            )
        })?;
        let mut stats = Self {
            reference_year,
            ..Self::default()
        };

        for event in events {
            let year = event.end_time.year();
            let bucket = if year == reference_year {
                &mut stats.this_year_ms
            } else if year == last_year {
                &mut stats.last_year_ms
            } else if year < last_year {
                &mut stats.older_ms
            } else {
                &mut stats.future_ms
            };
            *bucket = checked_sum(*bucket, event.ms_played)?;
            stats.total_ms = checked_sum(stats.total_ms, event.ms_played)?;
        }

        debug!(
            reference_year,
            total_ms = stats.total_ms,
            "Computed listening time statistics"
        );
        Ok(stats)
    }
}

fn checked_sum(current: u64, ms: u64) -> Result<u64> {
    current.checked_add(ms).ok_or_else(|| {
        SpinchartError::validation_field("listening time overflows u64 milliseconds", "ms_played")
    })
}

/// One artist's share of listening time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistShare {
    /// Artist name.
    pub artist: String,
    /// Total across all of the artist's tracks.
    pub ms_played: u64,
    /// `ms_played` relative to the first-place artist, in `0.0..=1.0`.
    pub proportion: f64,
}

/// The `limit` most-played artists in `totals`, most-played first.
///
/// Artists with equal time keep the order in which they were first seen.
/// When the first-place artist has no listening time every proportion is 0.
pub fn top_artists(totals: &DurationMap, limit: usize) -> Vec<ArtistShare> {
    let mut by_artist: Vec<(&str, u64)> = totals
        .artists()
        .map(|(artist, _)| (artist, totals.artist_total(artist)))
        .collect();
    by_artist.sort_by(|a, b| b.1.cmp(&a.1));
    by_artist.truncate(limit);

    let first = by_artist.first().map_or(0, |(_, ms)| *ms);
    by_artist
        .into_iter()
        .map(|(artist, ms_played)| {
            #[allow(clippy::cast_precision_loss)]
            let proportion = if first == 0 { 0.0 } else { ms_played as f64 / first as f64 };
            ArtistShare {
                artist: artist.to_string(),
                ms_played,
                proportion,
            }
        })
        .collect()
}
