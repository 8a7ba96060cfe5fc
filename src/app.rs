//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the batch pipeline or a single-file inspection
//! - prints reports
//! - writes the exports

use std::fs;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, InspectArgs, ProcessArgs, ThresholdArgs};
use crate::domain::{RunConfig, SegmentConfig};
use crate::error::AppError;
use crate::io::export::{debug_path, summary_path, write_debug_csv, write_summary_csv};
use crate::io::ingest::load_series;
use crate::io::pushes::{push_list, push_list_path, write_push_json};
use crate::naming::file_id;

pub mod pipeline;

/// Entry point for the `cmeter` binary.
pub fn run() -> Result<(), AppError> {
    // A missing `.env` is the normal case.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Process(args) => handle_process(args),
        Command::Inspect(args) => handle_inspect(args),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_process(args: ProcessArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args)?;

    fs::create_dir_all(&config.output_dir).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create output directory '{}': {e}", config.output_dir.display()),
        )
    })?;

    let batch = pipeline::run_batch(&config)?;

    if !config.quiet {
        for report in batch.files.iter().filter_map(|f| f.result.as_ref().ok()) {
            for push in &report.pushes {
                print!("{}", crate::report::format_push_report(push));
            }
        }
    }

    let summary = summary_path(&config.output_dir, &config.project);
    write_summary_csv(&summary, &batch)?;
    let debug_csv = debug_path(&config.output_dir, &config.project);
    write_debug_csv(&debug_csv, &batch)?;
    tracing::info!(summary = %summary.display(), debug = %debug_csv.display(), "exports written");

    if config.export_pushes {
        let path = push_list_path(&config.output_dir, &config.project);
        write_push_json(&path, &push_list(&batch, &config))?;
        tracing::info!(pushes = %path.display(), "push list written");
    }

    print!("{}", crate::report::format_run_summary(&batch, &config));
    Ok(())
}

fn handle_inspect(args: InspectArgs) -> Result<(), AppError> {
    let segment = segment_config_from_args(&args.thresholds)?;
    let ingested = load_series(&args.file, args.thresholds.model)?;
    let report = pipeline::analyze_series(&ingested, &file_id(&args.file), &segment)?;

    let name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    print!("{}", crate::report::format_file_pushes(&name, &report));
    Ok(())
}

pub fn run_config_from_args(args: &ProcessArgs) -> Result<RunConfig, AppError> {
    if args.jobs == Some(0) {
        return Err(AppError::new(2, "`--jobs` must be at least 1."));
    }
    if args.project.trim().is_empty() {
        return Err(AppError::new(2, "`--project` must not be empty."));
    }

    Ok(RunConfig {
        input_dir: args.input_dir.clone(),
        output_dir: args.output_dir.clone(),
        project: args.project.trim().to_string(),
        model: args.thresholds.model,
        segment: segment_config_from_args(&args.thresholds)?,
        export_pushes: args.export_pushes,
        jobs: args.jobs,
        quiet: args.quiet,
    })
}

/// Resolve thresholds, filling unset values from the instrument defaults.
pub fn segment_config_from_args(args: &ThresholdArgs) -> Result<SegmentConfig, AppError> {
    let config = SegmentConfig::new(
        args.max_depth_delta
            .unwrap_or_else(|| args.model.default_max_depth_delta()),
        args.max_depth_noise
            .unwrap_or_else(|| args.model.default_max_depth_noise()),
        args.min_push_duration,
    )?;
    Ok(config)
}
