//! Terminal report formatting for pushes and batch runs.

use crate::app::pipeline::{BatchOutput, FileReport, PushOutcome};
use crate::domain::RunConfig;

const RULE_WIDTH: usize = 69;

/// Format the per-push block printed while a batch runs.
pub fn format_push_report(p: &PushOutcome) -> String {
    let mut out = String::new();
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(&format!("Station:        {}\n", p.station));

    match &p.stats {
        Ok(stats) => {
            out.push_str(&format!(
                "Date/Time:      {}\n",
                stats.representative_timestamp.format("%Y-%m-%d %H:%M:%S")
            ));
            out.push_str(&format!("Mean direction: {:.0}°\n", stats.mean_direction));
            out.push_str(&format!("Mean velocity:  {:.2} m/s\n", stats.mean_speed));
            out.push_str(&format!("Std. dev:       {}\n", fmt_spread(stats.direction_spread)));
            out.push_str(&format!("Duration:       {:.1} s\n", stats.duration_secs));
        }
        Err(err) => {
            out.push_str(&format!("Error:          {err}\n"));
        }
    }

    out
}

/// Format the push table of a single file (`cmeter inspect`).
pub fn format_file_pushes(file_name: &str, report: &FileReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{file_name}: {} samples ({} rows read, {} skipped), {} pushes\n",
        report.samples,
        report.rows_read,
        report.row_errors,
        report.pushes.len()
    ));
    if report.pushes.is_empty() {
        return out;
    }

    out.push_str(
        format!(
            "{:<12} {:>7} {:>7} {:>7} {:>7} {:<19} {:>9} {:>6} {:>6} {:>8}\n",
            "station", "start", "end", "line0", "line1", "start_time", "dur_s", "depth", "dir", "speed"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<12} {:-<7} {:-<7} {:-<7} {:-<7} {:-<19} {:-<9} {:-<6} {:-<6} {:-<8}\n",
            "", "", "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for p in &report.pushes {
        let (depth, dir, speed) = match &p.stats {
            Ok(s) => (
                s.mean_depth.to_string(),
                format!("{:.1}", s.mean_direction),
                format!("{:.2}", s.mean_speed),
            ),
            Err(_) => ("-".to_string(), "-".to_string(), "-".to_string()),
        };
        out.push_str(
            format!(
                "{:<12} {:>7} {:>7} {:>7} {:>7} {:<19} {:>9.1} {:>6} {:>6} {:>8}\n",
                p.station,
                p.push.start_index,
                p.push.end_index,
                p.start_line,
                p.end_line,
                p.push.start_time.format("%Y-%m-%d %H:%M:%S").to_string(),
                p.push.duration().num_milliseconds() as f64 / 1000.0,
                depth,
                dir,
                speed
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format the end-of-run summary.
pub fn format_run_summary(batch: &BatchOutput, config: &RunConfig) -> String {
    let mut out = String::new();
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(&format!("=== cmeter - {} ===\n", config.project));
    out.push_str(&format!("Instrument: {}\n", config.model.display_name()));
    out.push_str(&format!(
        "Thresholds: depth delta={} m | depth noise={} m | min push={} s\n",
        config.segment.max_depth_delta,
        config.segment.max_depth_noise,
        config.segment.min_push_duration.num_milliseconds() as f64 / 1000.0,
    ));
    out.push_str(&format!(
        "Files: {} ({} failed) | Pushes: {} ({} failed)\n",
        batch.files.len(),
        batch.failed_files(),
        batch.push_count(),
        batch.failed_pushes(),
    ));
    out
}

fn fmt_spread(deg: f64) -> String {
    if deg.is_finite() {
        format!("{deg:.2}°")
    } else {
        "uniform (no preferred direction)".to_string()
    }
}
