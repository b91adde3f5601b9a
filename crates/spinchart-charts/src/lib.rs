//! # Spinchart Charts
//!
//! Listening-history aggregation and rolling chart computation.
//!
//! Play events are folded into fixed-length intervals by the
//! [`IntervalAggregator`]; the [`LeaderboardBuilder`] then ranks tracks over a
//! trailing window of intervals and records each track's chart position over
//! time. Both run synchronously or in cooperative chunks on a tokio runtime.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod duration_map;
pub mod leaderboard;
pub mod progress;
pub mod stats;

pub use aggregator::*;
pub use duration_map::*;
pub use leaderboard::*;
pub use progress::{AggregationProgress, AggregationStage, ProgressSender};
pub use stats::*;
