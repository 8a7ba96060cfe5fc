//! Write the push-list JSON.
//!
//! The push list is the "portable" representation of a segmentation run, for
//! tools that overlay pushes on the raw depth trace:
//! - instrument model + thresholds used
//! - per file: the ordered pushes with indices, raw line numbers and times
//! - per file: the failure message when the file could not be segmented

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::app::pipeline::BatchOutput;
use crate::domain::{InstrumentModel, RunConfig};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushListFile {
    pub tool: String,
    pub model: InstrumentModel,
    pub max_depth_delta: f64,
    pub max_depth_noise: f64,
    pub min_push_duration_secs: f64,
    pub files: Vec<PushListEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushListEntry {
    pub file: String,
    pub file_id: String,
    pub samples: Option<usize>,
    pub pushes: Vec<PushWindow>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushWindow {
    pub ordinal: usize,
    pub station: String,
    pub start_index: usize,
    pub end_index: usize,
    pub start_line: usize,
    pub end_line: usize,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_secs: f64,
}

pub fn push_list_path(output_dir: &Path, project: &str) -> PathBuf {
    output_dir.join(format!("{project}_pushes.json"))
}

/// Build the push list of a batch run.
pub fn push_list(batch: &BatchOutput, config: &RunConfig) -> PushListFile {
    let files = batch
        .files
        .iter()
        .map(|f| match &f.result {
            Ok(report) => PushListEntry {
                file: f.file_name(),
                file_id: f.file_id.clone(),
                samples: Some(report.samples),
                pushes: report
                    .pushes
                    .iter()
                    .map(|p| PushWindow {
                        ordinal: p.ordinal,
                        station: p.station.clone(),
                        start_index: p.push.start_index,
                        end_index: p.push.end_index,
                        start_line: p.start_line,
                        end_line: p.end_line,
                        start_time: p.push.start_time,
                        end_time: p.push.end_time,
                        duration_secs: p.push.duration().num_milliseconds() as f64 / 1000.0,
                    })
                    .collect(),
                error: None,
            },
            Err(err) => PushListEntry {
                file: f.file_name(),
                file_id: f.file_id.clone(),
                samples: None,
                pushes: Vec::new(),
                error: Some(err.to_string()),
            },
        })
        .collect();

    PushListFile {
        tool: "cmeter".to_string(),
        model: config.model,
        max_depth_delta: config.segment.max_depth_delta,
        max_depth_noise: config.segment.max_depth_noise,
        min_push_duration_secs: config.segment.min_push_duration.num_milliseconds() as f64 / 1000.0,
        files,
    }
}

/// Write a push-list JSON file.
pub fn write_push_json(path: &Path, list: &PushListFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create push JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, list)
        .map_err(|e| AppError::new(2, format!("Failed to write push JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::{FileOutcome, FileReport, PushOutcome};
    use crate::domain::{Push, SegmentConfig};
    use crate::error::PushError;
    use chrono::{Duration, NaiveDate};

    fn config() -> RunConfig {
        RunConfig {
            input_dir: PathBuf::from("in"),
            output_dir: PathBuf::from("out"),
            project: "Test".to_string(),
            model: InstrumentModel::MidasEcm,
            segment: SegmentConfig::for_model(InstrumentModel::MidasEcm),
            export_pushes: true,
            jobs: None,
            quiet: true,
        }
    }

    #[test]
    fn push_list_keeps_windows_and_failures() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 23)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let push = Push {
            start_index: 10,
            end_index: 80,
            start_time: start,
            end_time: start + Duration::milliseconds(70_500),
        };
        let batch = BatchOutput {
            files: vec![
                FileOutcome {
                    path: PathBuf::from("in/E14.vpd"),
                    file_id: "E14".to_string(),
                    result: Ok(FileReport {
                        rows_read: 100,
                        samples: 100,
                        row_errors: 0,
                        pushes: vec![PushOutcome {
                            ordinal: 1,
                            station: "E14".to_string(),
                            push,
                            start_line: 65,
                            end_line: 135,
                            stats: Err(PushError::EmptyInput("push slice")),
                        }],
                    }),
                },
                FileOutcome {
                    path: PathBuf::from("in/E15.vpd"),
                    file_id: "E15".to_string(),
                    result: Err(AppError::new(2, "unreadable")),
                },
            ],
        };

        let list = push_list(&batch, &config());
        assert_eq!(list.min_push_duration_secs, 60.0);
        assert_eq!(list.files[0].pushes[0].duration_secs, 70.5);
        assert_eq!(list.files[0].pushes[0].start_line, 65);
        assert_eq!(list.files[1].error.as_deref(), Some("unreadable"));
        assert!(list.files[1].pushes.is_empty());

        let dir = tempfile::tempdir().unwrap();
        let path = push_list_path(dir.path(), "Test");
        write_push_json(&path, &list).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["model"], "midas-ecm");
        assert_eq!(json["files"][0]["pushes"][0]["station"], "E14");
        assert_eq!(json["files"][0]["pushes"][0]["start_time"], "2023-01-23T10:00:00");
        assert_eq!(json["files"][1]["samples"], serde_json::Value::Null);
    }
}
