//! Detailed soak test report written next to the metrics file
//!
//! The writer gets the raw memory series and three summary numbers. It never
//! sees the coefficient of variation, so nothing in here reflects stability.

use crate::thresholds::{
    GrowthStatus, GROWTH_ACCEPTABLE_LIMIT, GROWTH_HEALTHY_LIMIT, GROWTH_WARNING_LIMIT,
    RECOMMEND_GROWTH_ABOVE, SUCCESS_RATE_ACCEPTABLE, SUCCESS_RATE_GOOD, SUCCESS_RATE_PASS,
};
use crate::{AnalysisResult, MetricSample};
use anyhow::{Context, Result};
use log::{debug, info};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

const TREND_POINTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportSummary {
    pub growth_rate: f64,
    pub success_rate: f64,
    pub duration_hours: f64,
}

impl From<&AnalysisResult> for ReportSummary {
    fn from(analysis: &AnalysisResult) -> Self {
        Self {
            growth_rate: analysis.growth_rate,
            success_rate: analysis.success_rate,
            duration_hours: analysis.duration_hours,
        }
    }
}

/// `metrics.csv` becomes `metrics_analysis.txt`. Names without the `.csv`
/// suffix just get `_analysis.txt` tacked on.
pub fn report_path(metrics_file: &Path) -> PathBuf {
    let name = metrics_file.to_string_lossy();
    let stem = name.strip_suffix(".csv").unwrap_or(&name);
    PathBuf::from(format!("{stem}_analysis.txt"))
}

/// Indices of the samples shown in the memory trend: every `len / 10`th one,
/// starting at the first.
pub fn trend_indices(len: usize) -> impl Iterator<Item = usize> {
    (0..len).step_by((len / TREND_POINTS).max(1))
}

fn overall_status(growth_rate: f64) -> &'static str {
    match GrowthStatus::classify(growth_rate) {
        GrowthStatus::Healthy => "PASS - Server is stable",
        GrowthStatus::Acceptable => "PASS - Minor growth detected",
        GrowthStatus::Warning => "WARNING - Monitor memory closely",
        GrowthStatus::Fail => "FAIL - Likely memory leak",
    }
}

/// Writes the detailed report body to `out`.
pub fn write_report<W: Write>(
    out: &mut W,
    samples: &[MetricSample],
    summary: &ReportSummary,
) -> io::Result<()> {
    let rule = "=".repeat(80);
    let line = "-".repeat(80);

    writeln!(out, "{rule}\nDETAILED SOAK TEST ANALYSIS REPORT\n{rule}\n")?;

    writeln!(out, "EXECUTIVE SUMMARY\n{line}")?;
    writeln!(out, "Overall Status: {}", overall_status(summary.growth_rate))?;
    writeln!(out, "Duration: {:.2} hours", summary.duration_hours)?;
    writeln!(out, "Memory growth rate: {:.2} MB/hour", summary.growth_rate)?;
    writeln!(out, "Request success rate: {:.2}%\n", summary.success_rate)?;

    writeln!(out, "MEMORY TREND\n{line}")?;
    for index in trend_indices(samples.len()) {
        let sample = &samples[index];
        writeln!(out, "  {:4} min: {:5} MB", sample.elapsed_minutes, sample.used_mb)?;
    }
    writeln!(out)?;

    writeln!(out, "THRESHOLDS AND GUIDELINES\n{line}")?;
    writeln!(out, "Memory growth rate thresholds:")?;
    writeln!(out, "  0-{GROWTH_HEALTHY_LIMIT} MB/hour:   Normal, no leak detected")?;
    writeln!(
        out,
        "  {GROWTH_HEALTHY_LIMIT}-{GROWTH_ACCEPTABLE_LIMIT} MB/hour:   Minor growth, acceptable"
    )?;
    writeln!(
        out,
        "  {GROWTH_ACCEPTABLE_LIMIT}-{GROWTH_WARNING_LIMIT} MB/hour:  Concerning, investigate"
    )?;
    writeln!(out, "  >{GROWTH_WARNING_LIMIT} MB/hour:   Critical, likely leak\n")?;

    writeln!(out, "Success rate thresholds:")?;
    writeln!(out, "  >{SUCCESS_RATE_PASS}%:  Excellent")?;
    writeln!(out, "  {SUCCESS_RATE_GOOD}-{SUCCESS_RATE_PASS}%: Good")?;
    writeln!(out, "  {SUCCESS_RATE_ACCEPTABLE}-{SUCCESS_RATE_GOOD}%:   Acceptable for testing")?;
    writeln!(out, "  <{SUCCESS_RATE_ACCEPTABLE}%:     Problematic, investigate\n")?;

    writeln!(out, "NEXT STEPS\n{line}")?;
    let steps: &[&str] = if summary.growth_rate > RECOMMEND_GROWTH_ABOVE {
        &[
            "1. Enable memory profiling to identify leak source",
            "2. Check for circular references in cache implementations",
            "3. Verify all resources (connections, buffers) are properly closed",
            "4. Run with GC logging enabled: -XX:+PrintGC -XX:+PrintGCDetails",
        ]
    } else {
        &[
            "1. Server appears stable for 24+ hour operations",
            "2. Continue monitoring in production",
            "3. Run periodic quick soak tests (1 hour) as regression tests",
        ]
    };
    for step in steps {
        writeln!(out, "{step}")?;
    }
    writeln!(out)
}

/// Writes the detailed report, replacing any earlier one, and returns its path.
///
/// `results_file` is accepted for compatibility with the soak test harness
/// naming but isn't read.
pub fn write_detailed_report(
    metrics_file: &Path,
    results_file: &Path,
    samples: &[MetricSample],
    summary: &ReportSummary,
) -> Result<PathBuf> {
    let path = report_path(metrics_file);
    debug!("Ignoring results file {}", results_file.display());

    let file = File::create(&path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_report(&mut writer, samples, summary)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write report file {}", path.display()))?;

    info!("Wrote detailed report to {}", path.display());
    Ok(path)
}
