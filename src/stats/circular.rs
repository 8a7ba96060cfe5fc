//! Circular statistics for current headings.
//!
//! Directions live on a circle, so a plain arithmetic mean of `10°` and `350°`
//! gives `180°` instead of `0°`. Both operations here work on the resultant
//! vector of the unit vectors:
//!
//! ```text
//! C = Σ cos θ_i      S = Σ sin θ_i
//! mean   = atan2(S, C)
//! R      = sqrt(C² + S²) / n          (mean resultant length, 0..=1)
//! spread = sqrt(-2 ln R)              (circular standard deviation, radians)
//! ```

use crate::error::PushError;

/// Returned by [`circular_spread`] when the directions cancel out (`R ≈ 0`).
pub const MAX_SPREAD: f64 = f64::INFINITY;

/// Mean resultant lengths within this of 0 (or 1) are treated as exactly 0 (or 1).
///
/// `R <= RESULTANT_EPS` yields [`MAX_SPREAD`]. `R >= 1 - RESULTANT_EPS` yields
/// exactly `0.0`, so spreads below about 1.4 microradians report as zero.
const RESULTANT_EPS: f64 = 1e-12;

/// Circular mean of `directions` (degrees), normalized into `[0, 360)`.
pub fn circular_mean(directions: &[f64]) -> Result<f64, PushError> {
    let (c, s) = resultant(directions)?;
    Ok(normalize_degrees(s.atan2(c).to_degrees()))
}

/// Circular standard deviation of `directions` (degrees in), in radians.
pub fn circular_spread(directions: &[f64]) -> Result<f64, PushError> {
    let (c, s) = resultant(directions)?;
    let r = (c.hypot(s) / directions.len() as f64).min(1.0);
    if r <= RESULTANT_EPS {
        return Ok(MAX_SPREAD);
    }
    if r >= 1.0 - RESULTANT_EPS {
        return Ok(0.0);
    }
    Ok((-2.0 * r.ln()).sqrt())
}

/// Fold any angle in degrees into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    // A tiny negative input can round up to exactly 360.0.
    if d >= 360.0 { 0.0 } else { d }
}

fn resultant(directions: &[f64]) -> Result<(f64, f64), PushError> {
    if directions.is_empty() {
        return Err(PushError::EmptyInput("directions"));
    }
    Ok(directions.iter().fold((0.0, 0.0), |(c, s), &deg| {
        let (sin, cos) = deg.to_radians().sin_cos();
        (c + cos, s + sin)
    }))
}
