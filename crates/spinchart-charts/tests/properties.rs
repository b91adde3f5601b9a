//! Property tests for interval aggregation and rolling charts.

use proptest::prelude::*;
use spinchart_charts::{aggregate, AggregationResult, LeaderboardBuilder};
use spinchart_common::test_utils::property_testing::sorted_events_strategy;
use spinchart_common::{TrackKey, MS_PER_DAY, MS_PER_HOUR};

fn window_strategy() -> impl Strategy<Value = u64> {
    prop::sample::select(vec![MS_PER_HOUR, 6 * MS_PER_HOUR, MS_PER_DAY, 7 * MS_PER_DAY])
}

/// Sum of a pair's per-interval time over `[max(0, i + 1 - window), i]`.
fn brute_force_rolling_sum(
    result: &AggregationResult,
    artist: &str,
    track: &str,
    index: usize,
    window: usize,
) -> i64 {
    let from = (index + 1).saturating_sub(window);
    result.intervals[from..=index]
        .iter()
        .map(|interval| i64::try_from(interval.totals.get(artist, track)).unwrap())
        .sum()
}

proptest! {
    #[test]
    fn test_property_every_event_in_exactly_one_interval(
        events in sorted_events_strategy(120),
        window in window_strategy(),
    ) {
        let result = aggregate(&events, window).unwrap();
        let window_ms = i64::try_from(window).unwrap();

        for event in &events {
            let containing = result
                .intervals
                .iter()
                .filter(|interval| interval.contains(event.end_time, window_ms))
                .count();
            prop_assert_eq!(containing, 1);

            let index = result.interval_index_of(event.end_time).unwrap();
            let start = result.intervals[index].start.timestamp_millis();
            prop_assert!(start <= event.end_time_ms());
            prop_assert!(event.end_time_ms() < start + window_ms);
        }
    }

    #[test]
    fn test_property_intervals_are_contiguous(
        events in sorted_events_strategy(120),
        window in window_strategy(),
    ) {
        let result = aggregate(&events, window).unwrap();
        let window_ms = i64::try_from(window).unwrap();

        prop_assert_eq!(result.intervals[0].start.timestamp_millis() % window_ms, 0);
        for pair in result.intervals.windows(2) {
            prop_assert_eq!(
                pair[1].start.timestamp_millis(),
                pair[0].start.timestamp_millis() + window_ms
            );
        }
        let last = result.intervals.last().unwrap();
        prop_assert!(last.contains(events.last().unwrap().end_time, window_ms));
    }

    #[test]
    fn test_property_totals_are_conserved(
        events in sorted_events_strategy(120),
        window in window_strategy(),
    ) {
        let result = aggregate(&events, window).unwrap();

        for (artist, track, total) in result.totals.iter() {
            let summed: u64 = result
                .intervals
                .iter()
                .map(|interval| interval.totals.get(artist, track))
                .sum();
            prop_assert_eq!(summed, total);
        }
        for interval in &result.intervals {
            for (artist, track, _) in interval.totals.iter() {
                prop_assert!(result.totals.artists().any(|(a, tracks)| a == artist && tracks.contains_key(track)));
            }
        }
        let played: u64 = events.iter().map(|event| event.ms_played).sum();
        prop_assert_eq!(result.totals.total_ms(), played);
    }

    #[test]
    fn test_property_rolling_sums_match_brute_force(
        events in sorted_events_strategy(120),
        window in window_strategy(),
        rolling_window in 1usize..8,
    ) {
        let result = aggregate(&events, window).unwrap();
        let builder = LeaderboardBuilder::new(rolling_window, 3).unwrap();
        let mut chart = builder.start(&result);

        let mut index = 0;
        while chart.advance().unwrap() {
            for (artist, track, _) in result.totals.iter() {
                let expected = brute_force_rolling_sum(&result, artist, track, index, rolling_window);
                prop_assert_eq!(chart.rolling_sum(&TrackKey::new(track, artist)), expected);
            }
            index += 1;
        }
        prop_assert_eq!(index, result.intervals.len());
    }

    #[test]
    fn test_property_builds_are_deterministic(
        events in sorted_events_strategy(120),
        window in window_strategy(),
        rolling_window in 1usize..8,
        chart_size in 1usize..6,
    ) {
        let first = aggregate(&events, window).unwrap();
        let second = aggregate(&events, window).unwrap();
        let builder = LeaderboardBuilder::new(rolling_window, chart_size).unwrap();

        let first_json = serde_json::to_string(&builder.build_history(&first).unwrap()).unwrap();
        let second_json = serde_json::to_string(&builder.build_history(&second).unwrap()).unwrap();
        prop_assert_eq!(first_json, second_json);
    }

    #[test]
    fn test_property_history_is_aligned_with_dates(
        events in sorted_events_strategy(120),
        window in window_strategy(),
        rolling_window in 1usize..8,
        chart_size in 1usize..6,
    ) {
        let result = aggregate(&events, window).unwrap();
        let board = LeaderboardBuilder::new(rolling_window, chart_size)
            .unwrap()
            .build_history(&result)
            .unwrap();

        prop_assert_eq!(board.dates().len(), result.intervals.len());
        for ranks in board.history().values() {
            prop_assert!(ranks.len() <= board.dates().len());
            prop_assert!(ranks.last().is_some_and(Option::is_some));

            let first_charted = ranks.iter().position(Option::is_some).unwrap();
            prop_assert!(ranks[..first_charted].iter().all(Option::is_none));
            prop_assert!(ranks.iter().flatten().all(|rank| (rank.position() as usize) < chart_size));
        }
        for index in 0..board.dates().len() {
            let chart = board.chart_at(index).unwrap();
            prop_assert!(chart.len() <= chart_size);
            for (position, (_, rank)) in chart.iter().enumerate() {
                prop_assert_eq!(rank.position() as usize, position);
            }
        }
    }
}
