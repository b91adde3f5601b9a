//! # Spinchart CLI
//!
//! Command line front end for spinchart.
//!
//! Reads an extracted streaming-history export, runs the aggregation and
//! rolling chart pipeline and writes a JSON report.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod import;
pub mod pipeline;
pub mod report;

pub use error::*;
pub use import::{discover_history_files, load_events, read_history_file};
pub use pipeline::*;
pub use report::*;
