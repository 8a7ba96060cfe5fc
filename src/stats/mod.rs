//! Statistics over push slices: circular (directions) and linear (scalars).

pub mod circular;
pub mod linear;

pub use circular::*;
pub use linear::*;
