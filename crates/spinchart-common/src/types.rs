//! Common type definitions and newtype wrappers for domain modeling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// One listening record: a track that finished playing at `end_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayEvent {
    /// When playback ended, normalized to UTC by the caller.
    pub end_time: DateTime<Utc>,
    /// Performer or creator.
    pub artist_name: String,
    /// Title of the item played.
    pub track_name: String,
    /// How long the item was played, in milliseconds.
    pub ms_played: u64,
}

impl PlayEvent {
    /// Creates a new play event.
    pub fn new(
        end_time: DateTime<Utc>,
        artist_name: impl Into<String>,
        track_name: impl Into<String>,
        ms_played: u64,
    ) -> Self {
        Self {
            end_time,
            artist_name: artist_name.into(),
            track_name: track_name.into(),
            ms_played,
        }
    }

    /// End time as milliseconds since the Unix epoch.
    pub fn end_time_ms(&self) -> i64 {
        self.end_time.timestamp_millis()
    }
}

/// Ranking identity of a track: the (track, artist) pair.
///
/// Displays and serializes as `"<track> - <artist>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackKey {
    /// Track name.
    pub track: String,
    /// Artist name.
    pub artist: String,
}

impl TrackKey {
    /// Creates a new track key.
    pub fn new(track: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            track: track.into(),
            artist: artist.into(),
        }
    }

    /// The `"<track> - <artist>"` label used by chart consumers.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.track, self.artist)
    }
}

impl Serialize for TrackKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A 0-based chart position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rank(pub u32);

impl Rank {
    /// 0-based position on the chart.
    pub const fn position(self) -> u32 {
        self.0
    }

    /// Position as presented under the given numbering convention.
    pub const fn display(self, base: RankBase) -> u32 {
        match base {
            RankBase::Zero => self.0,
            RankBase::One => self.0 + 1,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numbering convention for ranks shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankBase {
    /// First place is 0.
    Zero,
    /// First place is 1.
    #[default]
    One,
}

impl std::str::FromStr for RankBase {
    type Err = crate::SpinchartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" | "0" => Ok(Self::Zero),
            "one" | "1" => Ok(Self::One),
            other => Err(crate::SpinchartError::validation_field(
                format!("unknown rank base '{other}', expected 'zero' or 'one'"),
                "rank_base",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_track_key_label() {
        let key = TrackKey::new("Song", "Artist");
        assert_eq!(key.label(), "Song - Artist");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"Song - Artist\"");
    }

    #[test]
    fn test_same_track_name_different_artists() {
        let a = TrackKey::new("Intro", "A");
        let b = TrackKey::new("Intro", "B");
        assert_ne!(a, b);
    }

    #[test]
    fn test_play_event_serde_field_names() {
        let event = PlayEvent::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            "A",
            "X",
            1000,
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["artistName"], "A");
        assert_eq!(json["trackName"], "X");
        assert_eq!(json["msPlayed"], 1000);
        assert_eq!(event.end_time_ms(), 1_704_067_200_000);
    }

    #[test]
    fn test_rank_display_base() {
        let rank = Rank(0);
        assert_eq!(rank.display(RankBase::Zero), 0);
        assert_eq!(rank.display(RankBase::One), 1);
        assert_eq!("one".parse::<RankBase>().unwrap(), RankBase::One);
        assert_eq!("0".parse::<RankBase>().unwrap(), RankBase::Zero);
        assert!("two".parse::<RankBase>().is_err());
    }
}
