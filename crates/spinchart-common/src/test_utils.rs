//! Test utilities and shared test helpers for spinchart.
//!
//! Fixtures, timestamp helpers and proptest strategies used by the unit and
//! integration tests of every crate in the workspace. Enabled with the
//! `testing` feature.

use crate::PlayEvent;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Once;

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));

        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Test fixture for creating a mock timestamp.
pub fn mock_timestamp(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(any(test, feature = "tempfile"))]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Play event fixtures.
pub mod event_fixtures {
    use super::*;

    /// Shorthand for a play event.
    pub fn play(end_time: DateTime<Utc>, artist: &str, track: &str, ms_played: u64) -> PlayEvent {
        PlayEvent::new(end_time, artist, track, ms_played)
    }

    /// The three-event, two-day scenario: A/X twice on day one, B/Y at the
    /// first instant of day two.
    pub fn two_day_scenario() -> Vec<PlayEvent> {
        vec![
            play(mock_timestamp(2024, 1, 1, 0, 0, 0), "A", "X", 1000),
            play(mock_timestamp(2024, 1, 1, 12, 0, 0), "A", "X", 2000),
            play(mock_timestamp(2024, 1, 2, 0, 0, 0), "B", "Y", 5000),
        ]
    }

    /// One play per day for `days` days, cycling through `tracks` tracks by
    /// three artists, with durations that vary by day.
    pub fn daily_rotation(start: DateTime<Utc>, days: i64, tracks: usize) -> Vec<PlayEvent> {
        let tracks = tracks.max(1);
        (0..days)
            .map(|day| {
                let slot = usize::try_from(day).unwrap_or_default() % tracks;
                play(
                    start + Duration::days(day) + Duration::hours(9),
                    &format!("Artist {}", slot % 3),
                    &format!("Track {slot}"),
                    60_000 + (u64::try_from(day).unwrap_or_default() % 7) * 30_000,
                )
            })
            .collect()
    }
}

/// Property-based testing utilities using proptest.
#[cfg(any(test, feature = "proptest"))]
pub mod property_testing {
    use super::*;
    use proptest::prelude::*;

    /// Small artist vocabulary so that collisions (and ties) actually occur.
    pub fn artist_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["A", "B", "C", "D"]).prop_map(|s| s.to_string())
    }

    /// Small track vocabulary; the same title appears under several artists.
    pub fn track_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["Intro", "Song", "Outro", "Reprise", "Interlude"])
            .prop_map(|s| s.to_string())
    }

    /// A non-empty, ascending event stream starting in March 2023. About a
    /// quarter of the gaps are zero (tied end times); the rest are up to
    /// nine hours, so buckets hold several plays and some stay empty.
    pub fn sorted_events_strategy(max_len: usize) -> impl Strategy<Value = Vec<PlayEvent>> {
        let start = mock_timestamp(2023, 3, 1, 0, 0, 0);
        prop::collection::vec(
            (
                0i64..(3 * 24 * 60 * 60 * 1000),
                artist_strategy(),
                track_strategy(),
                0u64..600_000,
            ),
            1..max_len.max(2),
        )
        .prop_map(move |raw| {
            let mut at = start;
            raw.into_iter()
                .map(|(gap_ms, artist, track, ms_played)| {
                    let step = if gap_ms % 4 == 0 { 0 } else { gap_ms / 8 };
                    at = at + Duration::milliseconds(step);
                    PlayEvent::new(at, artist, track, ms_played)
                })
                .collect()
        })
    }
}
