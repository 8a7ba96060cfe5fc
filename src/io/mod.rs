//! Input/output helpers.
//!
//! - input file discovery (`discover`)
//! - raw instrument ingest + validation (`ingest`)
//! - summary/debug CSV exports (`export`)
//! - push-list JSON read/write (`pushes`)

pub mod discover;
pub mod export;
pub mod ingest;
pub mod pushes;

pub use discover::*;
pub use export::*;
pub use ingest::*;
pub use pushes::*;
