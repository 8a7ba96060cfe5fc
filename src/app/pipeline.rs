//! Shared batch pipeline used by both the `process` and `inspect` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! discover -> ingest -> segment -> label -> summarize
//!
//! Each file is an independent unit of work. Files are processed in parallel
//! and their outcomes are collected back in input order, so the summary table
//! is assembled by a single writer afterwards.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::domain::{Push, RunConfig, SegmentConfig, SeriesStatistics};
use crate::error::{AppError, PushError};
use crate::io::discover::discover_files;
use crate::io::ingest::{IngestedSeries, load_series};
use crate::naming::{file_id, station_name};
use crate::segment::segment;
use crate::summary::summarize_all;

/// One retained push of a file, labeled and summarized.
#[derive(Debug, Clone)]
pub struct PushOutcome {
    /// 1-based position among the file's retained pushes.
    pub ordinal: usize,
    pub station: String,
    pub push: Push,
    /// Raw file line numbers of the push boundaries.
    pub start_line: usize,
    pub end_line: usize,
    pub stats: Result<SeriesStatistics, PushError>,
}

/// Everything computed for one successfully segmented file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub rows_read: usize,
    pub samples: usize,
    pub row_errors: usize,
    pub pushes: Vec<PushOutcome>,
}

/// Result of processing one file; failures are kept, not propagated.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub file_id: String,
    pub result: Result<FileReport, AppError>,
}

impl FileOutcome {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// All outputs of a single `cmeter process` run.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub files: Vec<FileOutcome>,
}

impl BatchOutput {
    pub fn push_count(&self) -> usize {
        self.files
            .iter()
            .filter_map(|f| f.result.as_ref().ok())
            .map(|r| r.pushes.len())
            .sum()
    }

    pub fn failed_files(&self) -> usize {
        self.files.iter().filter(|f| f.result.is_err()).count()
    }

    pub fn failed_pushes(&self) -> usize {
        self.files
            .iter()
            .filter_map(|f| f.result.as_ref().ok())
            .flat_map(|r| r.pushes.iter())
            .filter(|p| p.stats.is_err())
            .count()
    }
}

/// Execute the full batch pipeline over `config.input_dir`.
pub fn run_batch(config: &RunConfig) -> Result<BatchOutput, AppError> {
    config.segment.validate()?;

    let files = discover_files(&config.input_dir, config.model)?;
    if files.is_empty() {
        return Err(AppError::new(
            3,
            format!(
                "No .{} files found under '{}'.",
                config.model.extension(),
                config.input_dir.display()
            ),
        ));
    }
    tracing::info!(
        files = files.len(),
        model = config.model.display_name(),
        dir = %config.input_dir.display(),
        "processing input files"
    );

    let files = process_files(&files, config)?;
    Ok(BatchOutput { files })
}

/// Process `paths` in parallel, returning outcomes in the same order.
pub fn process_files(paths: &[PathBuf], config: &RunConfig) -> Result<Vec<FileOutcome>, AppError> {
    let work = || {
        paths
            .par_iter()
            .map(|path| process_file(path, config))
            .collect::<Vec<_>>()
    };

    match config.jobs {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| AppError::new(4, format!("Failed to build worker pool: {e}")))?;
            Ok(pool.install(work))
        }
        None => Ok(work()),
    }
}

/// Ingest, segment and summarize one raw file.
pub fn process_file(path: &Path, config: &RunConfig) -> FileOutcome {
    let id = file_id(path);
    let result = load_series(path, config.model).and_then(|ingested| analyze_series(&ingested, &id, &config.segment));

    match &result {
        Ok(report) => tracing::info!(
            file = %path.display(),
            pushes = report.pushes.len(),
            samples = report.samples,
            "file processed"
        ),
        Err(err) => tracing::warn!(file = %path.display(), error = %err, "file skipped"),
    }

    FileOutcome {
        path: path.to_path_buf(),
        file_id: id,
        result,
    }
}

/// Segment an ingested series and summarize each push under its station label.
pub fn analyze_series(
    ingested: &IngestedSeries,
    file_id: &str,
    config: &SegmentConfig,
) -> Result<FileReport, AppError> {
    for row in &ingested.row_errors {
        tracing::debug!(line = row.line, "skipped row: {}", row.message);
    }
    if !ingested.row_errors.is_empty() {
        tracing::warn!(
            file = file_id,
            skipped = ingested.row_errors.len(),
            "rows skipped during ingest"
        );
    }

    let samples = ingested.series.samples();
    let pushes = segment(samples, config)?;
    let count = pushes.len();

    let outcomes = pushes
        .iter()
        .zip(summarize_all(samples, &pushes))
        .enumerate()
        .map(|(idx, (push, stats))| {
            let ordinal = idx + 1;
            let (station, stats) = match station_name(file_id, ordinal, count) {
                Ok(name) => (name, stats),
                // Keep the push visible, but never under a made-up letter.
                Err(err) => (format!("{file_id}#{ordinal}"), Err(err)),
            };
            if let Err(err) = &stats {
                tracing::warn!(station = %station, error = %err, "push not summarized");
            }
            PushOutcome {
                ordinal,
                station,
                push: *push,
                start_line: samples[push.start_index].line,
                end_line: samples[push.end_index].line,
                stats,
            }
        })
        .collect();

    Ok(FileReport {
        rows_read: ingested.rows_read,
        samples: samples.len(),
        row_errors: ingested.row_errors.len(),
        pushes: outcomes,
    })
}
