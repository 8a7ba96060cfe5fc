//! Push segmentation.
//!
//! A continuous depth trace is turned into discrete pushes in three passes:
//!
//! 1. classify each sample as on-seabed or not (`classify`)
//! 2. group consecutive on-seabed samples into candidate runs (`runs`)
//! 3. drop candidates shorter than `min_push_duration` (`filter_by_duration`)
//!
//! Each pass is a pure function over borrowed data so it can be tested alone.

pub mod classify;
pub mod runs;

pub use classify::*;
pub use runs::*;

use crate::domain::{Push, Sample, SegmentConfig};
use crate::error::PushError;

/// Detect the pushes of one series, in time order.
///
/// An empty result means no sample ever sat on the seabed; a series too
/// short to classify is an error.
pub fn segment(series: &[Sample], config: &SegmentConfig) -> Result<Vec<Push>, PushError> {
    config.validate()?;
    if series.len() < 2 {
        return Err(PushError::InsufficientData(format!(
            "push detection needs at least 2 samples, got {}",
            series.len()
        )));
    }

    let flags = classify_on_seabed(series, config)?;
    let runs = candidate_runs(&flags);
    Ok(filter_by_duration(series, &runs, config))
}

/// Turn candidate runs into pushes, keeping those lasting at least `min_push_duration`.
pub fn filter_by_duration(series: &[Sample], runs: &[Run], config: &SegmentConfig) -> Vec<Push> {
    runs.iter()
        .map(|&(start, end)| Push {
            start_index: start,
            end_index: end,
            start_time: series[start].timestamp,
            end_time: series[end].timestamp,
        })
        .filter(|push| push.duration() >= config.min_push_duration)
        .collect()
}

/// Per-sample push id: `k` for samples of the k-th push (1-based), 0 otherwise.
pub fn push_ids(len: usize, pushes: &[Push]) -> Vec<usize> {
    let mut ids = vec![0; len];
    for (k, push) in pushes.iter().enumerate() {
        let end = push.end_index.min(len.saturating_sub(1));
        for id in ids.iter_mut().take(end + 1).skip(push.start_index) {
            *id = k + 1;
        }
    }
    ids
}


#[cfg(test)]
mod tests {
    use super::test_support::series_from_depths;
    use super::*;
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn config(delta: f64, noise: f64, min_secs: f64) -> SegmentConfig {
        SegmentConfig::new(delta, noise, min_secs).unwrap()
    }

    #[test]
    fn detects_two_plateaus_and_skips_the_dip() {
        let series = series_from_depths(&[10.0, 10.0, 10.0, 10.0, 2.0, 2.0, 2.0, 10.0, 10.0, 10.0]);
        let pushes = segment(&series, &config(0.5, 0.1, 0.0)).unwrap();

        let ranges: Vec<(usize, usize)> = pushes.iter().map(|p| (p.start_index, p.end_index)).collect();
        // Sample 0 has no predecessor and sample 7 jumps back down from the dip.
        assert_eq!(ranges, vec![(1, 3), (8, 9)]);
        for p in &pushes {
            assert!(!(4..=6).any(|i| (p.start_index..=p.end_index).contains(&i)));
        }
    }

    #[test]
    fn min_duration_removes_exactly_the_short_candidate() {
        // Candidates: (1, 5) lasts 4 s, (9, 10) lasts 1 s, (14, 19) lasts 5 s.
        let depths = [
            10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 3.0, 3.0, 10.0, 10.0, 10.0, 3.0, 3.0, 10.0, 10.0, 10.0, 10.0, 10.0,
            10.0, 10.0,
        ];
        let series = series_from_depths(&depths);

        let all = segment(&series, &config(0.5, 0.1, 0.0)).unwrap();
        assert_eq!(all.len(), 3);

        let filtered = segment(&series, &config(0.5, 0.1, 2.0)).unwrap();
        assert_eq!(filtered, vec![all[0], all[2]]);

        // Boundary is inclusive: a 4 s push survives a 4 s minimum.
        let filtered = segment(&series, &config(0.5, 0.1, 4.0)).unwrap();
        assert_eq!(filtered, vec![all[0], all[2]]);
        let filtered = segment(&series, &config(0.5, 0.1, 4.5)).unwrap();
        assert_eq!(filtered, vec![all[2]]);
    }

    #[test]
    fn noise_tie_keeps_the_push_whole() {
        let series = series_from_depths(&[2.0, 10.1, 10.1, 10.15, 10.15, 10.1]);
        let pushes = segment(&series, &config(0.3, 0.05, 0.0)).unwrap();
        let ranges: Vec<(usize, usize)> = pushes.iter().map(|p| (p.start_index, p.end_index)).collect();
        assert_eq!(ranges, vec![(2, 5)]);
    }

    #[test]
    fn no_on_seabed_samples_is_an_empty_list() {
        let series = series_from_depths(&[1.0, 3.0, 5.0, 7.0, 9.0]);
        assert_eq!(segment(&series, &config(0.5, 0.1, 0.0)).unwrap(), vec![]);
    }

    #[test]
    fn short_series_is_insufficient() {
        assert!(matches!(
            segment(&[], &config(0.5, 0.1, 0.0)),
            Err(PushError::InsufficientData(_))
        ));
        let one = series_from_depths(&[10.0]);
        assert!(matches!(
            segment(&one, &config(0.5, 0.1, 0.0)),
            Err(PushError::InsufficientData(_))
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let series = series_from_depths(&[10.0, 10.0, 10.0]);
        let bad = SegmentConfig {
            max_depth_delta: 0.5,
            max_depth_noise: -0.1,
            min_push_duration: Duration::zero(),
        };
        assert!(matches!(segment(&series, &bad), Err(PushError::Configuration(_))));
    }

    #[test]
    fn pushes_are_ordered_disjoint_and_long_enough() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let n = rng.gen_range(2..120);
            let depths: Vec<f64> = (0..n)
                .map(|_| if rng.gen_bool(0.7) { 20.0 + rng.gen_range(-0.05..0.05) } else { rng.gen_range(0.0..20.0) })
                .collect();
            let series = series_from_depths(&depths);
            let min_secs = rng.gen_range(0..5) as f64;
            let cfg = config(0.3, 0.05, min_secs);

            let pushes = segment(&series, &cfg).unwrap();
            for p in &pushes {
                assert!(p.end_index >= p.start_index);
                assert!(p.duration() >= cfg.min_push_duration);
                assert!(p.end_index < series.len());
            }
            for w in pushes.windows(2) {
                assert!(w[0].end_index < w[1].start_index);
            }
        }
    }

    #[test]
    fn push_ids_label_samples() {
        let series = series_from_depths(&[10.0, 10.0, 10.0, 10.0, 2.0, 2.0, 2.0, 10.0, 10.0, 10.0]);
        let pushes = segment(&series, &config(0.5, 0.1, 0.0)).unwrap();
        assert_eq!(push_ids(series.len(), &pushes), vec![0, 1, 1, 1, 0, 0, 0, 0, 2, 2]);
    }
}
