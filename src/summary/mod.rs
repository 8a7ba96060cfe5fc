//! Per-push summary statistics.
//!
//! `summarize` slices the parent series to one push and reduces every field of
//! interest: linear means for scalars, circular mean/spread for directions.
//! Rounding matches the summary export (depth to whole meters, speed to cm/s).

use crate::domain::{Push, Sample, SeriesStatistics};
use crate::error::PushError;
use crate::stats::{circular_mean, circular_spread, linear_mean, normalize_degrees, round_to};

/// Compute the summary record of one push.
pub fn summarize(series: &[Sample], push: &Push) -> Result<SeriesStatistics, PushError> {
    let slice = push_slice(series, push)?;

    let depths: Vec<f64> = slice.iter().map(|s| s.depth).collect();
    let temperatures: Vec<f64> = slice.iter().map(|s| s.temperature).collect();
    let sound_velocities: Vec<f64> = slice.iter().map(|s| s.sound_velocity).collect();
    let directions: Vec<f64> = slice.iter().map(|s| s.direction).collect();
    // Speed is resolved per sample first, so component data averages magnitudes.
    let speeds: Vec<f64> = slice.iter().map(Sample::speed).collect();

    let spread_rad = circular_spread(&directions)?;

    Ok(SeriesStatistics {
        representative_timestamp: slice[0].timestamp,
        mean_depth: linear_mean(&depths)?.round() as i64,
        mean_temperature: round_to(linear_mean(&temperatures)?, 1),
        mean_speed: round_to(linear_mean(&speeds)?, 2),
        mean_direction: normalize_degrees(round_to(circular_mean(&directions)?, 1)),
        direction_spread: spread_rad.to_degrees(),
        mean_sound_velocity: round_to(linear_mean(&sound_velocities)?, 1),
        sample_count: slice.len(),
        duration_secs: push.duration().num_milliseconds() as f64 / 1000.0,
    })
}

/// Summarize every push independently; one failure does not affect the others.
pub fn summarize_all(series: &[Sample], pushes: &[Push]) -> Vec<Result<SeriesStatistics, PushError>> {
    pushes.iter().map(|push| summarize(series, push)).collect()
}

fn push_slice<'a>(series: &'a [Sample], push: &Push) -> Result<&'a [Sample], PushError> {
    if push.is_empty() {
        return Err(PushError::EmptyInput("push slice"));
    }
    series.get(push.start_index..=push.end_index).ok_or_else(|| {
        PushError::InsufficientData(format!(
            "push [{}, {}] exceeds series of {} samples",
            push.start_index,
            push.end_index,
            series.len()
        ))
    })
}
