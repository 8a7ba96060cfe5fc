//! `cmeter` library crate.
//!
//! The binary (`cmeter`) is a thin wrapper around this library so that:
//!
//! - push segmentation and statistics are testable without spawning processes
//! - the core (`segment`, `stats`, `summary`) stays free of file formats and
//!   terminal output, which live in `io` and `report`

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod naming;
pub mod report;
pub mod segment;
pub mod stats;
pub mod summary;

pub use domain::{Current, InstrumentModel, Push, Sample, SegmentConfig, Series, SeriesStatistics};
pub use error::{AppError, PushError};
pub use segment::segment;
pub use stats::{circular_mean, circular_spread, linear_mean};
pub use summary::summarize;
