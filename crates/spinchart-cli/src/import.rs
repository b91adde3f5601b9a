//! Reading an extracted streaming-history export.
//!
//! An export directory holds `StreamingHistory0.json`, `StreamingHistory1.json`
//! and so on, each a JSON array of play records. Files are concatenated in
//! numeric index order and the resulting events are sorted by end time.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::Deserialize;
use spinchart_common::{truncate_string, PlayEvent, Result, SpinchartError};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, instrument, warn};

/// Matches history file names and captures their numeric index.
pub static HISTORY_FILE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^StreamingHistory(\d+)\.json$").expect("Invalid history file regex pattern")
});

/// Format of `endTime` in exported records, always UTC.
const EXPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One record as it appears in an export file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStreamingRecord {
    end_time: String,
    artist_name: String,
    track_name: String,
    ms_played: u64,
}

/// History files in `dir`, ordered by their numeric index.
///
/// `StreamingHistory10.json` sorts after `StreamingHistory9.json`. Names that
/// do not match are ignored.
pub fn discover_history_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        SpinchartError::import_with_source("cannot read export directory", dir, e)
    })?;

    let mut indexed = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let Some(index) = HISTORY_FILE_REGEX
            .captures(name)
            .and_then(|captures| captures[1].parse::<u64>().ok())
        else {
            debug!("Skipping {}", path.display());
            continue;
        };
        indexed.push((index, path));
    }

    indexed.sort();
    Ok(indexed.into_iter().map(|(_, path)| path).collect())
}

/// Parse an export `endTime`: `"YYYY-MM-DD HH:MM"` in UTC, or RFC 3339.
pub fn parse_end_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, EXPORT_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc)))
        .ok()
}

/// Re-label a UTC instant with its wall-clock reading in `tz`.
///
/// Buckets are aligned to UTC midnight, so shifting every event this way
/// makes daily buckets follow the listener's calendar days.
pub fn to_local_wall_clock(instant: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    instant.with_timezone(&tz).naive_local().and_utc()
}

/// Read one export file into play events, in file order.
pub fn read_history_file(path: &Path, tz: Tz) -> Result<Vec<PlayEvent>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SpinchartError::import_with_source("cannot read history file", path, e))?;
    let records: Vec<RawStreamingRecord> = serde_json::from_str(&content)
        .map_err(|e| SpinchartError::import_with_source("malformed history file", path, e))?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let Some(end_time) = parse_end_time(&record.end_time) else {
                warn!(file = %path.display(), index, "Unparseable endTime");
                return Err(SpinchartError::import(
                    format!(
                        "record {index} has invalid endTime '{}'",
                        truncate_string(&record.end_time, 40)
                    ),
                    path,
                ));
            };
            Ok(PlayEvent::new(
                to_local_wall_clock(end_time, tz),
                record.artist_name,
                record.track_name,
                record.ms_played,
            ))
        })
        .collect()
}

/// Load every history file in `dir`, shifted to `tz` and sorted by end time.
///
/// Events with equal end times keep their file order.
#[instrument(skip(dir, tz), fields(dir = %dir.display(), tz = %tz))]
pub fn load_events(dir: &Path, tz: Tz) -> Result<Vec<PlayEvent>> {
    let files = discover_history_files(dir)?;
    if files.is_empty() {
        return Err(SpinchartError::import(
            "no StreamingHistory<N>.json files found",
            dir,
        ));
    }

    let mut events = Vec::new();
    for file in &files {
        let mut batch = read_history_file(file, tz)?;
        debug!("Read {} records from {}", batch.len(), file.display());
        events.append(&mut batch);
    }

    events.sort_by_key(|event| event.end_time);
    info!("Imported {} play events from {} files", events.len(), files.len());
    Ok(events)
}
