//! Two-level artist -> track -> milliseconds accumulator.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use spinchart_common::{Result, SpinchartError};

/// Listening time keyed by artist, then by track.
///
/// Iteration is grouped by artist: artists in first-insertion order, and each
/// artist's tracks in first-insertion order within that artist. A pair added
/// late for an early artist therefore comes before every later artist. Rank
/// ties are broken by this order, so it must stay reproducible run to run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationMap {
    artists: IndexMap<String, IndexMap<String, u64>>,
}

impl DurationMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `ms` to the (artist, track) entry, creating it at zero first.
    pub fn add(&mut self, artist: &str, track: &str, ms: u64) -> Result<()> {
        let artist_index = match self.artists.get_index_of(artist) {
            Some(index) => index,
            None => self.artists.insert_full(artist.to_string(), IndexMap::new()).0,
        };
        let tracks = &mut self.artists[artist_index];

        let track_index = match tracks.get_index_of(track) {
            Some(index) => index,
            None => tracks.insert_full(track.to_string(), 0).0,
        };
        let current = &mut tracks[track_index];

        *current = current.checked_add(ms).ok_or_else(|| {
            SpinchartError::validation_field(
                format!("listening time for '{track}' by '{artist}' overflows u64 milliseconds"),
                "ms_played",
            )
        })?;
        Ok(())
    }

    /// Accumulated milliseconds for the pair, zero when never played.
    pub fn get(&self, artist: &str, track: &str) -> u64 {
        self.artists
            .get(artist)
            .and_then(|tracks| tracks.get(track))
            .copied()
            .unwrap_or(0)
    }

    /// Total milliseconds across all of an artist's tracks.
    pub fn artist_total(&self, artist: &str) -> u64 {
        self.artists
            .get(artist)
            .map_or(0, |tracks| tracks.values().fold(0u64, |acc, ms| acc.saturating_add(*ms)))
    }

    /// Total milliseconds across the whole map.
    pub fn total_ms(&self) -> u64 {
        self.iter().fold(0u64, |acc, (_, _, ms)| acc.saturating_add(ms))
    }

    /// Iterates over `(artist, track, ms)` triples, grouped by artist.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, u64)> + '_ {
        self.artists.iter().flat_map(|(artist, tracks)| {
            tracks
                .iter()
                .map(move |(track, ms)| (artist.as_str(), track.as_str(), *ms))
        })
    }

    /// Iterates over artists and their per-track maps.
    pub fn artists(&self) -> impl Iterator<Item = (&str, &IndexMap<String, u64>)> + '_ {
        self.artists.iter().map(|(artist, tracks)| (artist.as_str(), tracks))
    }

    /// Number of distinct (artist, track) pairs.
    pub fn len(&self) -> usize {
        self.artists.values().map(IndexMap::len).sum()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_creates_and_accumulates() {
        let mut map = DurationMap::new();
        map.add("A", "X", 1000).unwrap();
        map.add("A", "X", 2000).unwrap();
        map.add("A", "Z", 10).unwrap();
        map.add("B", "X", 5).unwrap();

        assert_eq!(map.get("A", "X"), 3000);
        assert_eq!(map.get("B", "X"), 5);
        assert_eq!(map.artist_total("A"), 3010);
        assert_eq!(map.total_ms(), 3015);
        assert_eq!(map.len(), 3);
        assert_eq!(map.artists().count(), 2);
    }

    #[test]
    fn test_missing_entries_read_as_zero() {
        let mut map = DurationMap::new();
        map.add("A", "X", 0).unwrap();

        // a recorded zero and an absent pair read the same way
        assert_eq!(map.get("A", "X"), 0);
        assert_eq!(map.get("A", "nope"), 0);
        assert_eq!(map.get("nobody", "X"), 0);
        assert_eq!(map.artist_total("nobody"), 0);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_iteration_groups_tracks_by_artist() {
        let mut map = DurationMap::new();
        map.add("B", "Y", 1).unwrap();
        map.add("A", "X", 1).unwrap();
        map.add("B", "W", 1).unwrap();
        map.add("A", "X", 1).unwrap();

        let order: Vec<_> = map.iter().map(|(a, t, _)| (a, t)).collect();
        assert_eq!(order, vec![("B", "Y"), ("B", "W"), ("A", "X")]);
    }

    #[test]
    fn test_overflow_is_rejected() {
        let mut map = DurationMap::new();
        map.add("A", "X", u64::MAX).unwrap();
        let err = map.add("A", "X", 1).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(map.get("A", "X"), u64::MAX);
    }

    #[test]
    fn test_serializes_as_nested_object() {
        let mut map = DurationMap::new();
        map.add("A", "X", 3000).unwrap();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"A":{"X":3000}}"#);
    }
}
