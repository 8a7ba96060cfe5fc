//! Export the summary and debug tables to CSV.
//!
//! The summary is meant to be easy to consume in spreadsheets: one row per
//! push, plus one row per failed file or push with the `Error` column set.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::app::pipeline::{BatchOutput, FileOutcome, PushOutcome};
use crate::error::AppError;
use crate::stats::round_to;

const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M:%S%.f";
const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// One row of `<project>.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Station Name")]
    pub station: String,
    #[serde(rename = "File No.")]
    pub file_name: String,
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Time")]
    pub time: Option<String>,
    #[serde(rename = "Depth")]
    pub depth: Option<i64>,
    #[serde(rename = "Temperature")]
    pub temperature: Option<f64>,
    #[serde(rename = "Speed")]
    pub speed: Option<f64>,
    #[serde(rename = "Direction")]
    pub direction: Option<f64>,
    #[serde(rename = "Spread")]
    pub spread: Option<f64>,
    #[serde(rename = "Sound velocity")]
    pub sound_velocity: Option<f64>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

/// One row of `<project>_debug table.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugRow {
    #[serde(rename = "Station Name")]
    pub station: String,
    #[serde(rename = "Start Line Number")]
    pub start_line: usize,
    #[serde(rename = "Stop Line Number")]
    pub stop_line: usize,
    #[serde(rename = "Start push")]
    pub start: String,
    #[serde(rename = "Stop push")]
    pub stop: String,
}

/// Paths of the exported tables.
pub fn summary_path(output_dir: &Path, project: &str) -> PathBuf {
    output_dir.join(format!("{project}.csv"))
}

pub fn debug_path(output_dir: &Path, project: &str) -> PathBuf {
    output_dir.join(format!("{project}_debug table.csv"))
}

/// Flatten the batch into summary rows, in file then push order.
pub fn summary_rows(batch: &BatchOutput) -> Vec<SummaryRow> {
    let mut rows = Vec::new();
    for file in &batch.files {
        match &file.result {
            Ok(report) => rows.extend(report.pushes.iter().map(|p| push_row(file, p))),
            Err(err) => rows.push(failure_row(file.file_id.clone(), file, err.to_string())),
        }
    }
    rows
}

/// Flatten the batch into debug rows (one per push, failed files omitted).
pub fn debug_rows(batch: &BatchOutput) -> Vec<DebugRow> {
    batch
        .files
        .iter()
        .filter_map(|f| f.result.as_ref().ok())
        .flat_map(|r| r.pushes.iter())
        .map(|p| DebugRow {
            station: p.station.clone(),
            start_line: p.start_line,
            stop_line: p.end_line,
            start: p.push.start_time.format(DATETIME_FMT).to_string(),
            stop: p.push.end_time.format(DATETIME_FMT).to_string(),
        })
        .collect()
}

/// Write `<project>.csv`.
pub fn write_summary_csv(path: &Path, batch: &BatchOutput) -> Result<(), AppError> {
    write_rows(path, &summary_rows(batch))
}

/// Write `<project>_debug table.csv`.
pub fn write_debug_csv(path: &Path, batch: &BatchOutput) -> Result<(), AppError> {
    write_rows(path, &debug_rows(batch))
}

fn push_row(file: &FileOutcome, p: &PushOutcome) -> SummaryRow {
    match &p.stats {
        Ok(stats) => SummaryRow {
            station: p.station.clone(),
            file_name: file.file_name(),
            date: Some(stats.representative_timestamp.format(DATE_FMT).to_string()),
            time: Some(stats.representative_timestamp.format(TIME_FMT).to_string()),
            depth: Some(stats.mean_depth),
            temperature: Some(stats.mean_temperature),
            speed: Some(stats.mean_speed),
            direction: Some(stats.mean_direction),
            spread: Some(round_to(stats.direction_spread, 2)),
            sound_velocity: Some(stats.mean_sound_velocity),
            error: None,
        },
        Err(err) => failure_row(p.station.clone(), file, err.to_string()),
    }
}

fn failure_row(station: String, file: &FileOutcome, error: String) -> SummaryRow {
    SummaryRow {
        station,
        file_name: file.file_name(),
        date: None,
        time: None,
        depth: None,
        temperature: None,
        speed: None,
        direction: None,
        spread: None,
        sound_velocity: None,
        error: Some(error),
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV '{}': {e}", path.display())))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::FileReport;
    use crate::domain::{Push, SeriesStatistics};
    use crate::error::PushError;
    use chrono::{Duration, NaiveDate};

    fn batch() -> BatchOutput {
        let start = NaiveDate::from_ymd_opt(2023, 1, 23)
            .unwrap()
            .and_hms_opt(10, 15, 0)
            .unwrap();
        let push = Push {
            start_index: 3,
            end_index: 90,
            start_time: start,
            end_time: start + Duration::seconds(87),
        };
        let stats = SeriesStatistics {
            representative_timestamp: start,
            mean_depth: 25,
            mean_temperature: 6.8,
            mean_speed: 0.12,
            mean_direction: 181.3,
            direction_spread: 12.3456,
            mean_sound_velocity: 1481.2,
            sample_count: 88,
            duration_secs: 87.0,
        };
        let ok = PushOutcome {
            ordinal: 1,
            station: "E14A".to_string(),
            push,
            start_line: 58,
            end_line: 145,
            stats: Ok(stats),
        };
        let failed = PushOutcome {
            ordinal: 27,
            station: "E14#27".to_string(),
            push,
            start_line: 200,
            end_line: 260,
            stats: Err(PushError::LabelOverflow(27)),
        };
        BatchOutput {
            files: vec![
                FileOutcome {
                    path: PathBuf::from("in/E14.vpd"),
                    file_id: "E14".to_string(),
                    result: Ok(FileReport {
                        rows_read: 300,
                        samples: 300,
                        row_errors: 0,
                        pushes: vec![ok, failed],
                    }),
                },
                FileOutcome {
                    path: PathBuf::from("in/E15.vpd"),
                    file_id: "E15".to_string(),
                    result: Err(AppError::new(4, "insufficient data: no samples")),
                },
            ],
        }
    }

    #[test]
    fn summary_records_pushes_and_failures() {
        let rows = summary_rows(&batch());
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].station, "E14A");
        assert_eq!(rows[0].file_name, "E14.vpd");
        assert_eq!(rows[0].date.as_deref(), Some("2023-01-23"));
        assert_eq!(rows[0].time.as_deref(), Some("10:15:00"));
        assert_eq!(rows[0].spread, Some(12.35));
        assert_eq!(rows[0].error, None);

        assert_eq!(rows[1].station, "E14#27");
        assert!(rows[1].error.as_deref().unwrap().contains("push #27"));
        assert_eq!(rows[1].depth, None);

        assert_eq!(rows[2].station, "E15");
        assert_eq!(rows[2].error.as_deref(), Some("insufficient data: no samples"));
    }

    #[test]
    fn writes_csv_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        let summary = summary_path(dir.path(), "Test Project");
        let debug = debug_path(dir.path(), "Test Project");
        write_summary_csv(&summary, &batch()).unwrap();
        write_debug_csv(&debug, &batch()).unwrap();

        let text = std::fs::read_to_string(&summary).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Station Name,File No.,Date,Time,Depth,Temperature,Speed,Direction,Spread,Sound velocity,Error"
        );
        assert_eq!(
            lines.next().unwrap(),
            "E14A,E14.vpd,2023-01-23,10:15:00,25,6.8,0.12,181.3,12.35,1481.2,"
        );

        let text = std::fs::read_to_string(&debug).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Station Name,Start Line Number,Stop Line Number,Start push,Stop push"
        );
        assert_eq!(
            lines.next().unwrap(),
            "E14A,58,145,2023-01-23 10:15:00,2023-01-23 10:16:27"
        );
        assert_eq!(lines.count(), 1);
        assert!(debug.ends_with("Test Project_debug table.csv"));
    }
}
