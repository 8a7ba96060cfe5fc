//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the segmentation/statistics code stays clean and testable
//! - output changes are localized

pub mod format;

pub use format::*;
