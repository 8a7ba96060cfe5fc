//! On-seabed classification of individual samples.

use crate::domain::{Sample, SegmentConfig};
use crate::error::PushError;

/// Slack on both thresholds so decimal depths that tie a boundary stay inside.
///
/// `10.15 - 10.1` is `0.05000000000000071` in binary floating point.
pub const TIE_EPS: f64 = 1e-9;

/// Flag every sample that is both deep enough and stable.
///
/// - deep enough: `depth[i] >= max(depth) - max_depth_delta`
/// - stable: `|depth[i] - depth[i - 1]| <= max_depth_noise`
///
/// Both comparisons allow [`TIE_EPS`] of slack. The first sample has no
/// predecessor and is never flagged. NaN depths fail both tests, for
/// themselves and for the sample after them.
pub fn classify_on_seabed(series: &[Sample], config: &SegmentConfig) -> Result<Vec<bool>, PushError> {
    let max_depth = max_depth(series).ok_or_else(|| {
        PushError::InsufficientData(format!(
            "no finite depth value in series of {} samples",
            series.len()
        ))
    })?;
    let floor = max_depth - config.max_depth_delta - TIE_EPS;
    let noise = config.max_depth_noise + TIE_EPS;

    let mut flags = Vec::with_capacity(series.len());
    flags.push(false);
    for pair in series.windows(2) {
        let depth = pair[1].depth;
        let diff = depth - pair[0].depth;
        flags.push(diff.abs() <= noise && depth >= floor);
    }
    Ok(flags)
}

/// Maximum finite depth, if any.
pub fn max_depth(series: &[Sample]) -> Option<f64> {
    series
        .iter()
        .map(|s| s.depth)
        .filter(|d| d.is_finite())
        .fold(None, |acc, d| Some(acc.map_or(d, |m: f64| m.max(d))))
}
