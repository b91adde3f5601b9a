//! Integration tests for reading streaming-history exports.

use spinchart_cli::{discover_history_files, load_events, read_history_file};
use spinchart_common::test_utils::{create_temp_dir, mock_timestamp};
use std::fs;
use std::path::Path;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("Failed to write fixture");
}

fn record(end_time: &str, artist: &str, track: &str, ms: u64) -> String {
    format!(
        r#"{{"endTime":"{end_time}","artistName":"{artist}","trackName":"{track}","msPlayed":{ms}}}"#
    )
}

#[test]
fn test_discovery_orders_by_numeric_index() {
    let dir = create_temp_dir();
    for name in [
        "StreamingHistory10.json",
        "StreamingHistory2.json",
        "streaminghistory0.json",
        "Playlist1.json",
        "StreamingHistory1.txt",
    ] {
        write(dir.path(), name, "[]");
    }
    fs::create_dir(dir.path().join("StreamingHistory3.json")).unwrap();

    let files = discover_history_files(dir.path()).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["streaminghistory0.json", "StreamingHistory2.json", "StreamingHistory10.json"]
    );
}

#[test]
fn test_load_events_concatenates_and_sorts() {
    let dir = create_temp_dir();
    write(
        dir.path(),
        "StreamingHistory1.json",
        &format!(
            "[{},{}]",
            record("2024-01-02 08:00", "B", "Y", 5000),
            record("2024-01-01 12:00", "A", "X", 2000)
        ),
    );
    write(
        dir.path(),
        "StreamingHistory0.json",
        &format!(
            "[{},{}]",
            record("2024-01-01 00:00", "A", "X", 1000),
            record("2024-01-02 08:00", "C", "Z", 10)
        ),
    );

    let events = load_events(dir.path(), chrono_tz::UTC).unwrap();
    let summary: Vec<_> = events
        .iter()
        .map(|event| (event.end_time, event.artist_name.as_str(), event.ms_played))
        .collect();

    // equal end times keep file order: file 0 before file 1
    assert_eq!(
        summary,
        vec![
            (mock_timestamp(2024, 1, 1, 0, 0, 0), "A", 1000),
            (mock_timestamp(2024, 1, 1, 12, 0, 0), "A", 2000),
            (mock_timestamp(2024, 1, 2, 8, 0, 0), "C", 10),
            (mock_timestamp(2024, 1, 2, 8, 0, 0), "B", 5000),
        ]
    );
}

#[test]
fn test_timezone_shift_applied() {
    let dir = create_temp_dir();
    write(
        dir.path(),
        "StreamingHistory0.json",
        &format!("[{}]", record("2024-07-01 22:30", "A", "X", 1)),
    );

    let events = load_events(dir.path(), chrono_tz::Europe::Oslo).unwrap();
    assert_eq!(events[0].end_time, mock_timestamp(2024, 7, 2, 0, 30, 0));
}

#[test]
fn test_malformed_file_names_path() {
    let dir = create_temp_dir();
    write(dir.path(), "StreamingHistory0.json", r#"[{"endTime": 5}]"#);

    let err = load_events(dir.path(), chrono_tz::UTC).unwrap_err();
    assert!(err.to_string().contains("malformed history file"));
    match err {
        spinchart_common::SpinchartError::Import { path, .. } => {
            assert_eq!(path, Some(dir.path().join("StreamingHistory0.json")));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_bad_end_time_rejected() {
    let dir = create_temp_dir();
    let path = dir.path().join("StreamingHistory0.json");
    fs::write(&path, format!("[{}]", record("last tuesday", "A", "X", 1))).unwrap();

    let err = read_history_file(&path, chrono_tz::UTC).unwrap_err();
    assert!(err.to_string().contains("record 0"));
}

#[test]
fn test_empty_directory_is_an_error() {
    let dir = create_temp_dir();
    assert!(load_events(dir.path(), chrono_tz::UTC).is_err());
    assert!(discover_history_files(&dir.path().join("missing")).is_err());
}
