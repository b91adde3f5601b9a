//! The JSON report written by the `spinchart` binary.

use crate::error::{CliError, CliResult};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use spinchart_charts::{ArtistShare, DurationMap, Leaderboard, ListeningTimeStats};
use spinchart_common::RankBase;
use std::io::Write;
use std::path::Path;

/// Everything computed for one export.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Numbering used for `history` ranks.
    pub rank_base: RankBase,
    /// Interval start dates.
    pub dates: Vec<DateTime<Utc>>,
    /// `"<track> - <artist>"` to rank per interval, `null` when off the chart.
    pub history: IndexMap<String, Vec<Option<u32>>>,
    /// Listening time per artist and track across the whole export.
    pub totals: DurationMap,
    /// Listening time by year.
    pub stats: ListeningTimeStats,
    /// Most-played artists.
    pub top_artists: Vec<ArtistShare>,
}

impl Report {
    /// Assemble a report, converting ranks to `rank_base`.
    pub fn new(
        generated_at: DateTime<Utc>,
        rank_base: RankBase,
        leaderboard: &Leaderboard,
        totals: DurationMap,
        stats: ListeningTimeStats,
        top_artists: Vec<ArtistShare>,
    ) -> Self {
        Self {
            generated_at,
            rank_base,
            dates: leaderboard.dates().to_vec(),
            history: leaderboard.display_history(rank_base),
            totals,
            stats,
            top_artists,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> CliResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON report to any writer.
    pub fn write_json<W: Write>(&self, mut writer: W) -> CliResult<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer).map_err(serde_json::Error::io)?;
        Ok(())
    }

    /// Write the JSON report to `path`, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> CliResult<()> {
        let output = |source| CliError::Output {
            path: path.to_path_buf(),
            source,
        };
        let file = std::fs::File::create(path).map_err(output)?;
        let mut writer = std::io::BufWriter::new(file);
        self.write_json(&mut writer)?;
        writer.flush().map_err(output)
    }
}
