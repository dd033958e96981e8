//! Reads the soak test metrics CSV

use crate::error::{AnalysisError, Result};
use crate::MetricSample;
use log::{debug, trace};
use serde_json::{Map, Value};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Columns every row has to carry. Order in the file doesn't matter.
pub const COLUMNS: [&str; 8] = [
    "timestamp",
    "elapsed_minutes",
    "used_mb",
    "total_mb",
    "max_mb",
    "requests",
    "errors",
    "avg_response_time_ms",
];

pub fn load_samples(path: &Path) -> Result<Vec<MetricSample>> {
    if !path.exists() {
        return Err(AnalysisError::MissingFile(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let samples = parse_samples(BufReader::new(file))?;
    debug!("Parsed {} samples from {}", samples.len(), path.display());
    trace!("Samples: {samples:#?}");
    Ok(samples)
}

/// Parses a header line followed by one sample per line. The first bad row
/// fails the whole parse.
pub fn parse_samples<R: BufRead>(reader: R) -> Result<Vec<MetricSample>> {
    let mut lines = reader.lines();
    let header = match lines.next() {
        Some(line) => line?,
        None => return Ok(vec![]),
    };
    let columns: Vec<String> = header
        .trim_start_matches('\u{feff}')
        .split(',')
        .map(|column| column.trim().to_string())
        .collect();

    let mut samples = Vec::new();
    // line 1 is the header
    for (line_number, line) in (2..).zip(lines) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let sample = parse_row(&columns, &line).map_err(|source| AnalysisError::Parse {
            line: line_number,
            source,
        })?;
        samples.push(sample);
    }

    Ok(samples)
}

/// Maps the row onto its header names and lets serde pick out the fields, so
/// a short row or a non-integer value is reported against the field it hit.
fn parse_row(columns: &[String], line: &str) -> serde_json::Result<MetricSample> {
    let mut row = Map::new();
    for (column, field) in columns.iter().zip(line.split(',')) {
        let field = field.trim();
        let value = match field.parse::<i64>() {
            Ok(number) => Value::from(number),
            Err(_) => Value::from(field),
        };
        row.insert(column.clone(), value);
    }
    serde_json::from_value(Value::Object(row))
}
