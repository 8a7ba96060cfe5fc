//! Command-line parsing for the current-meter push processor.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the segmentation/statistics code. Every option can also be set
//! through a `CMETER_*` environment variable (or a `.env` file).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_MIN_PUSH_DURATION_SECS, InstrumentModel};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cmeter", version, about = "Current-meter push detection and directional statistics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process every raw file under a directory and export the summary tables.
    Process(ProcessArgs),
    /// Segment a single raw file and print its pushes.
    Inspect(InspectArgs),
}

/// Segmentation thresholds shared by all commands.
///
/// Unset thresholds fall back to the instrument model's defaults.
#[derive(Debug, Args, Clone)]
pub struct ThresholdArgs {
    /// Instrument model that produced the raw files.
    #[arg(short = 'm', long, value_enum, env = "CMETER_MODEL", default_value_t = InstrumentModel::MidasEcm)]
    pub model: InstrumentModel,

    /// Cut-off from the file's maximum depth, in meters.
    #[arg(long, env = "CMETER_MAX_DEPTH_DELTA")]
    pub max_depth_delta: Option<f64>,

    /// Cut-off for depth noise between consecutive samples, in meters.
    #[arg(long, env = "CMETER_MAX_DEPTH_NOISE")]
    pub max_depth_noise: Option<f64>,

    /// Minimum time on the seabed for a push to count, in seconds.
    #[arg(long, env = "CMETER_MIN_PUSH_DURATION", default_value_t = DEFAULT_MIN_PUSH_DURATION_SECS)]
    pub min_push_duration: f64,
}

/// Options for a batch run.
#[derive(Debug, Args, Clone)]
pub struct ProcessArgs {
    /// Directory searched (recursively) for raw files.
    #[arg(short = 'i', long, value_name = "DIR", env = "CMETER_INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory the exports are written to (created if missing).
    #[arg(short = 'o', long, value_name = "DIR", env = "CMETER_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Project name, used as the export file prefix.
    #[arg(short = 'p', long, env = "CMETER_PROJECT", default_value = "Test Project")]
    pub project: String,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    /// Also export the push list as JSON.
    #[arg(long)]
    pub export_pushes: bool,

    /// Number of worker threads (default: one per core; 1 = sequential).
    #[arg(short = 'j', long, env = "CMETER_JOBS")]
    pub jobs: Option<usize>,

    /// Do not print the per-push report.
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Options for inspecting one file.
#[derive(Debug, Args, Clone)]
pub struct InspectArgs {
    /// Raw instrument file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}
