//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the supported instruments (`InstrumentModel`)
//! - normalized observations (`Sample`, `Current`, `Series`)
//! - segmentation thresholds (`SegmentConfig`) and their output (`Push`)
//! - per-push summaries (`SeriesStatistics`)

pub mod types;

pub use types::*;
