//! Shared domain types.
//!
//! Samples and series are owned by the ingest layer; the segmenter and the
//! summarizer only borrow them and hand back index ranges or owned summaries.

use std::path::PathBuf;

use chrono::{Duration, NaiveDateTime};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::PushError;

/// Supported current-meter instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InstrumentModel {
    /// Nortek Aquadopp: whitespace-delimited `.dat` export, scalar speed.
    Aquadopp,
    /// Midas ECM: `.vpd` export with a fixed header block, velocity components.
    MidasEcm,
}

impl InstrumentModel {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            InstrumentModel::Aquadopp => "Nortek Aquadopp",
            InstrumentModel::MidasEcm => "Midas ECM",
        }
    }

    /// Raw file extension (lowercase, without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            InstrumentModel::Aquadopp => "dat",
            InstrumentModel::MidasEcm => "vpd",
        }
    }

    /// Number of leading header lines to skip before the data block.
    pub fn header_lines(self) -> usize {
        match self {
            InstrumentModel::Aquadopp => 0,
            InstrumentModel::MidasEcm => 54,
        }
    }

    /// Default cut-off from the series' maximum depth (m).
    pub fn default_max_depth_delta(self) -> f64 {
        match self {
            InstrumentModel::Aquadopp => 5.0,
            InstrumentModel::MidasEcm => 0.3,
        }
    }

    /// Default cut-off for sample-to-sample depth noise (m).
    pub fn default_max_depth_noise(self) -> f64 {
        match self {
            InstrumentModel::Aquadopp => 1.0,
            InstrumentModel::MidasEcm => 0.05,
        }
    }
}

/// Default minimum time on the seabed for a push to count (seconds).
pub const DEFAULT_MIN_PUSH_DURATION_SECS: f64 = 60.0;

/// Current magnitude as reported by the instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Current {
    /// Scalar speed (m/s).
    Speed(f64),
    /// Orthogonal horizontal velocity components (m/s).
    Components { x: f64, y: f64 },
}

impl Current {
    /// Current speed (m/s); component readings are combined per sample.
    pub fn speed(self) -> f64 {
        match self {
            Current::Speed(s) => s,
            Current::Components { x, y } => x.hypot(y),
        }
    }
}

/// One timestamped observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// 1-based line number in the raw file.
    pub line: usize,
    pub timestamp: NaiveDateTime,
    /// Depth in meters, positive below the surface. NaN when missing.
    pub depth: f64,
    /// Current heading in degrees `[0, 360)`.
    pub direction: f64,
    pub current: Current,
    pub temperature: f64,
    pub sound_velocity: f64,
    pub pressure: Option<f64>,
}

impl Sample {
    pub fn speed(&self) -> f64 {
        self.current.speed()
    }
}

/// One instrument file's full ordered sample sequence.
#[derive(Debug, Clone, Default)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    /// Build a series, rejecting samples whose timestamp goes backwards.
    ///
    /// The error names the raw line of the first offending sample.
    pub fn new(samples: Vec<Sample>) -> Result<Self, PushError> {
        if let Some(w) = samples.windows(2).find(|w| w[1].timestamp < w[0].timestamp) {
            return Err(PushError::UnorderedTimestamps(w[1].line));
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Thresholds driving push segmentation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentConfig {
    /// A sample is deep enough if `depth >= max(depth) - max_depth_delta`.
    pub max_depth_delta: f64,
    /// A sample is stable if `|depth - previous depth| <= max_depth_noise`.
    pub max_depth_noise: f64,
    /// Candidates shorter than this are discarded.
    pub min_push_duration: Duration,
}

impl SegmentConfig {
    /// Build a validated config from meter/second values.
    pub fn new(max_depth_delta: f64, max_depth_noise: f64, min_push_duration_secs: f64) -> Result<Self, PushError> {
        if !min_push_duration_secs.is_finite() || min_push_duration_secs < 0.0 {
            return Err(PushError::Configuration(format!(
                "min_push_duration must be a finite, non-negative number of seconds (got {min_push_duration_secs})"
            )));
        }
        let config = Self {
            max_depth_delta,
            max_depth_noise,
            min_push_duration: Duration::milliseconds((min_push_duration_secs * 1000.0).round() as i64),
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults for an instrument model.
    pub fn for_model(model: InstrumentModel) -> Self {
        Self {
            max_depth_delta: model.default_max_depth_delta(),
            max_depth_noise: model.default_max_depth_noise(),
            min_push_duration: Duration::milliseconds((DEFAULT_MIN_PUSH_DURATION_SECS * 1000.0) as i64),
        }
    }

    pub fn validate(&self) -> Result<(), PushError> {
        if !self.max_depth_delta.is_finite() || self.max_depth_delta < 0.0 {
            return Err(PushError::Configuration(format!(
                "max_depth_delta must be finite and >= 0 (got {})",
                self.max_depth_delta
            )));
        }
        if !self.max_depth_noise.is_finite() || self.max_depth_noise < 0.0 {
            return Err(PushError::Configuration(format!(
                "max_depth_noise must be finite and >= 0 (got {})",
                self.max_depth_noise
            )));
        }
        if self.min_push_duration < Duration::zero() {
            return Err(PushError::Configuration(
                "min_push_duration must be >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// A maximal contiguous run of on-seabed samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Push {
    /// First sample of the push (inclusive).
    pub start_index: usize,
    /// Last sample of the push (inclusive).
    pub end_index: usize,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

impl Push {
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn len(&self) -> usize {
        (self.end_index + 1).saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.end_index < self.start_index
    }
}

/// Summary record for one retained push.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStatistics {
    /// Timestamp of the push's first sample.
    pub representative_timestamp: NaiveDateTime,
    /// Nearest whole meter.
    pub mean_depth: i64,
    /// One decimal.
    pub mean_temperature: f64,
    /// Two decimals.
    pub mean_speed: f64,
    /// Circular mean, one decimal, `[0, 360)`.
    pub mean_direction: f64,
    /// Circular standard deviation in degrees; infinite for a uniform spread.
    pub direction_spread: f64,
    /// One decimal.
    pub mean_sound_velocity: f64,
    pub sample_count: usize,
    pub duration_secs: f64,
}

/// Resolved settings for one batch run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Prefix of the exported file names.
    pub project: String,
    pub model: InstrumentModel,
    pub segment: SegmentConfig,
    /// Also write `<project>_pushes.json`.
    pub export_pushes: bool,
    /// Worker threads; `None` uses the global rayon pool.
    pub jobs: Option<usize>,
    /// Skip the per-push terminal report.
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(secs: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 23)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
            + Duration::seconds(secs as i64)
    }

    fn sample(line: usize, secs: u32) -> Sample {
        Sample {
            line,
            timestamp: at(secs),
            depth: 10.0,
            direction: 0.0,
            current: Current::Speed(0.1),
            temperature: 8.0,
            sound_velocity: 1480.0,
            pressure: None,
        }
    }

    #[test]
    fn component_current_uses_euclidean_norm() {
        assert!((Current::Components { x: 3.0, y: 4.0 }.speed() - 5.0).abs() < 1e-12);
        assert_eq!(Current::Speed(0.25).speed(), 0.25);
    }

    #[test]
    fn series_rejects_backwards_timestamps() {
        let ok = Series::new(vec![sample(1, 0), sample(2, 0), sample(3, 1)]);
        assert_eq!(ok.unwrap().len(), 3);

        let err = Series::new(vec![sample(1, 5), sample(2, 6), sample(3, 4)]);
        assert_eq!(err.unwrap_err(), PushError::UnorderedTimestamps(3));
    }

    #[test]
    fn segment_config_rejects_negative_thresholds() {
        assert!(matches!(
            SegmentConfig::new(0.3, -0.05, 60.0),
            Err(PushError::Configuration(_))
        ));
        assert!(matches!(
            SegmentConfig::new(-1.0, 0.05, 60.0),
            Err(PushError::Configuration(_))
        ));
        assert!(matches!(
            SegmentConfig::new(0.3, 0.05, -1.0),
            Err(PushError::Configuration(_))
        ));
        assert!(matches!(
            SegmentConfig::new(f64::NAN, 0.05, 1.0),
            Err(PushError::Configuration(_))
        ));

        let cfg = SegmentConfig::new(0.3, 0.05, 60.0).unwrap();
        assert_eq!(cfg.min_push_duration, Duration::seconds(60));
    }

    #[test]
    fn model_defaults_match_instrument() {
        let a = SegmentConfig::for_model(InstrumentModel::Aquadopp);
        assert_eq!(a.max_depth_delta, 5.0);
        assert_eq!(a.max_depth_noise, 1.0);

        let m = SegmentConfig::for_model(InstrumentModel::MidasEcm);
        assert_eq!(m.max_depth_delta, 0.3);
        assert_eq!(m.max_depth_noise, 0.05);
        assert_eq!(m.min_push_duration, Duration::seconds(60));
        assert_eq!(InstrumentModel::MidasEcm.header_lines(), 54);
    }
}
