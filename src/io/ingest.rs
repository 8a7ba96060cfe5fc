//! Raw instrument file ingest.
//!
//! This module turns one current-meter export into a clean, ordered `Series`:
//!
//! - **Fixed schema** per instrument model (column positions, header block)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Ordering check** (timestamps must never go backwards)
//! - **Separation of concerns**: no segmentation logic here
//!
//! Both supported formats are whitespace-delimited text without a header row.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::{Current, InstrumentModel, Sample, Series};
use crate::error::AppError;
use crate::stats::normalize_degrees;

/// Column layout of a Nortek Aquadopp `.dat` row.
mod aquadopp {
    pub const MONTH: usize = 0;
    pub const DAY: usize = 1;
    pub const YEAR: usize = 2;
    pub const HOUR: usize = 3;
    pub const MINUTE: usize = 4;
    pub const SECOND: usize = 5;
    pub const SOUND_VELOCITY: usize = 16;
    pub const PRESSURE: usize = 20;
    pub const DEPTH: usize = 21;
    pub const TEMPERATURE: usize = 22;
    pub const SPEED: usize = 25;
    pub const DIRECTION: usize = 26;
    pub const COLUMNS: usize = 27;
}

/// Column layout of a Midas ECM `.vpd` row.
mod midas {
    pub const DATE: usize = 0;
    pub const TIME: usize = 1;
    pub const DEPTH: usize = 2;
    pub const PRESSURE: usize = 3;
    pub const TEMPERATURE: usize = 4;
    pub const VELOCITY_X: usize = 5;
    pub const VELOCITY_Y: usize = 6;
    pub const DIRECTION: usize = 7;
    pub const SOUND_VELOCITY: usize = 11;
    pub const COLUMNS: usize = 12;
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: ordered series + row errors.
#[derive(Debug, Clone)]
pub struct IngestedSeries {
    pub path: PathBuf,
    pub model: InstrumentModel,
    pub series: Series,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Read and parse one raw instrument file.
pub fn load_series(path: &Path, model: InstrumentModel) -> Result<IngestedSeries, AppError> {
    let bytes = fs::read(path)
        .map_err(|e| AppError::new(2, format!("Failed to read '{}': {e}", path.display())))?;
    let text = String::from_utf8_lossy(&bytes);

    let mut ingested = parse_series(&text, model)
        .map_err(|e| AppError::new(e.exit_code(), format!("{}: {e}", path.display())))?;
    ingested.path = path.to_path_buf();

    tracing::debug!(
        file = %path.display(),
        rows_read = ingested.rows_read,
        samples = ingested.series.len(),
        row_errors = ingested.row_errors.len(),
        "ingested raw file"
    );
    Ok(ingested)
}

/// Parse the full text of a raw instrument file.
pub fn parse_series(text: &str, model: InstrumentModel) -> Result<IngestedSeries, AppError> {
    let mut samples = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, raw) in text.lines().enumerate().skip(model.header_lines()) {
        let line = idx + 1;
        let fields: Vec<&str> = raw.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        rows_read += 1;

        let parsed = match model {
            InstrumentModel::Aquadopp => parse_aquadopp_row(&fields, line),
            InstrumentModel::MidasEcm => parse_midas_row(&fields, line),
        };
        match parsed {
            Ok(sample) => samples.push(sample),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let series = Series::new(samples)?;

    Ok(IngestedSeries {
        path: PathBuf::new(),
        model,
        series,
        row_errors,
        rows_read,
    })
}

fn parse_aquadopp_row(fields: &[&str], line: usize) -> Result<Sample, String> {
    use aquadopp::*;

    expect_columns(fields, COLUMNS)?;

    let date = NaiveDate::from_ymd_opt(
        parse_int(fields[YEAR], "year")?,
        parse_int(fields[MONTH], "month")? as u32,
        parse_int(fields[DAY], "day")? as u32,
    )
    .ok_or_else(|| "Invalid calendar date.".to_string())?;

    let seconds = parse_finite(fields[SECOND], "second")?;
    if !(0.0..60.0).contains(&seconds) {
        return Err(format!("Invalid second '{}'.", fields[SECOND]));
    }
    let whole = seconds.trunc();
    let time = NaiveTime::from_hms_milli_opt(
        parse_int(fields[HOUR], "hour")? as u32,
        parse_int(fields[MINUTE], "minute")? as u32,
        whole as u32,
        ((seconds - whole) * 1000.0).round().min(999.0) as u32,
    )
    .ok_or_else(|| "Invalid time of day.".to_string())?;

    Ok(Sample {
        line,
        timestamp: date.and_time(time),
        depth: parse_depth(fields[DEPTH])?,
        direction: normalize_degrees(parse_finite(fields[DIRECTION], "direction")?),
        current: Current::Speed(parse_finite(fields[SPEED], "speed")?),
        temperature: parse_finite(fields[TEMPERATURE], "temperature")?,
        sound_velocity: parse_finite(fields[SOUND_VELOCITY], "sound velocity")?,
        pressure: parse_opt_f64(fields[PRESSURE]),
    })
}

fn parse_midas_row(fields: &[&str], line: usize) -> Result<Sample, String> {
    use midas::*;

    expect_columns(fields, COLUMNS)?;

    Ok(Sample {
        line,
        timestamp: parse_timestamp(fields[DATE], fields[TIME])?,
        depth: parse_depth(fields[DEPTH])?,
        direction: normalize_degrees(parse_finite(fields[DIRECTION], "direction")?),
        current: Current::Components {
            x: parse_finite(fields[VELOCITY_X], "velocity x")?,
            y: parse_finite(fields[VELOCITY_Y], "velocity y")?,
        },
        temperature: parse_finite(fields[TEMPERATURE], "temperature")?,
        sound_velocity: parse_finite(fields[SOUND_VELOCITY], "sound velocity")?,
        pressure: parse_opt_f64(fields[PRESSURE]),
    })
}

fn expect_columns(fields: &[&str], n: usize) -> Result<(), String> {
    if fields.len() < n {
        return Err(format!("Expected {n} columns, found {}.", fields.len()));
    }
    Ok(())
}

fn parse_timestamp(date: &str, time: &str) -> Result<NaiveDateTime, String> {
    // Midas exports follow the logger's locale, so accept the common orders.
    const FMTS: [&str; 4] = [
        "%d/%m/%Y %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S%.f",
        "%d-%m-%Y %H:%M:%S%.f",
    ];
    let joined = format!("{date} {time}");
    for fmt in FMTS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(&joined, fmt) {
            return Ok(ts);
        }
    }
    Err(format!(
        "Invalid date/time '{joined}'. Expected DD/MM/YYYY, YYYY-MM-DD, YYYY/MM/DD or DD-MM-YYYY followed by HH:MM:SS."
    ))
}

fn parse_int(s: &str, name: &str) -> Result<i32, String> {
    s.parse::<i32>()
        .map_err(|_| format!("Invalid {name} '{s}'."))
}

fn parse_finite(s: &str, name: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid {name} '{s}'.")),
    }
}

/// Depth may be explicitly missing (`NaN`); segmentation handles it.
fn parse_depth(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() || v.is_nan() => Ok(v),
        _ => Err(format!("Invalid depth '{s}'.")),
    }
}

fn parse_opt_f64(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
