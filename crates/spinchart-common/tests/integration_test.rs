//! Integration tests for spinchart-common crate.

use chrono::{TimeZone, Utc};
use spinchart_common::{
    format_hours, format_timestamp, truncate_string, PlayEvent, Rank, RankBase, SpinchartError,
    TrackKey, MS_PER_HOUR,
};

#[test]
fn test_track_key_label() {
    let key = TrackKey::new("Song", "Artist");
    assert_eq!(format!("{key}"), "Song - Artist");
    assert_eq!(serde_json::to_string(&key).unwrap(), r#""Song - Artist""#);
}

#[test]
fn test_play_event_from_json() {
    let json = r#"{
        "endTime": "2024-01-01T12:00:00Z",
        "artistName": "A",
        "trackName": "X",
        "msPlayed": 2000
    }"#;
    let event: PlayEvent = serde_json::from_str(json).unwrap();

    assert_eq!(event.end_time, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
    assert_eq!(event.artist_name, "A");
    assert_eq!(event.track_name, "X");
    assert_eq!(event.ms_played, 2000);
}

#[test]
fn test_rank_display_bases() {
    assert_eq!(Rank(0).display(RankBase::One), 1);
    assert_eq!(Rank(0).display(RankBase::Zero), 0);
    assert_eq!("one".parse::<RankBase>().unwrap(), RankBase::One);
    assert_eq!(RankBase::default(), RankBase::One);
}

#[test]
fn test_validation_error_carries_field() {
    let err: SpinchartError = "two".parse::<RankBase>().unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.field(), Some("rank_base"));
}

#[test]
fn test_format_timestamp() {
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let formatted = format_timestamp(timestamp);
    assert_eq!(formatted, "2024-01-01 12:00:00 UTC");
}

#[test]
fn test_format_hours() {
    assert_eq!(format_hours(90 * MS_PER_HOUR, 0), "90 hours");
}

#[test]
fn test_truncate_string() {
    let input = "This is a very long track title that should be truncated";
    let truncated = truncate_string(input, 20);
    assert_eq!(truncated, "This is a very lo...");

    let short = "Short";
    let not_truncated = truncate_string(short, 20);
    assert_eq!(not_truncated, "Short");
}
