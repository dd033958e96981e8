//! Console report and the top-level analysis entry point

use crate::error::AnalysisError;
use crate::report::{self, ReportSummary};
use crate::thresholds::{RECOMMEND_CV_ABOVE, RECOMMEND_GROWTH_ABOVE, RECOMMEND_SUCCESS_BELOW};
use crate::{loader, stats, AnalysisResult};
use anyhow::Result;
use chrono::{TimeZone, Utc};
use log::{error, info};
use std::{
    io::Write,
    path::{Path, PathBuf},
};

const RULE_WIDTH: usize = 80;

/// Documented limits of the server's bounded caches. Not measured, the
/// operator checks evictions against these in the server logs.
const CACHE_LIMITS: [(&str, &str); 4] = [
    ("ETag cache", "10,000 entry limit"),
    ("Compression cache", "1,000 entry limit"),
    ("Rate limiter buckets", "10,000 limit"),
    ("Buffer pool", "1,000 buffers"),
];

/// Runs the whole analysis, printing the console report to `out` and writing
/// the detailed report next to `metrics_file`.
///
/// Returns `false` if anything went wrong. The error has already been printed
/// by then, and the detailed report is only written once every step before it
/// succeeded.
pub fn analyze_metrics<W: Write>(metrics_file: &Path, results_file: &Path, out: &mut W) -> bool {
    let success = match run(metrics_file, results_file, out) {
        Ok(report_path) => {
            info!("Analysis complete, report at {}", report_path.display());
            true
        }
        Err(e) => {
            error!("Soak test analysis failed: {e:#}");
            match e.downcast_ref::<AnalysisError>() {
                Some(err) => {
                    let _ = writeln!(out, "{err}");
                    if matches!(err, AnalysisError::MissingFile(_)) {
                        let _ = writeln!(out, "Ensure the soak test has completed and produced output.");
                    }
                }
                None => {
                    let _ = writeln!(out, "Error: {e:#}");
                }
            }
            false
        }
    };
    let _ = out.flush();
    success
}

fn run<W: Write>(metrics_file: &Path, results_file: &Path, out: &mut W) -> Result<PathBuf> {
    if !metrics_file.exists() {
        return Err(AnalysisError::MissingFile(metrics_file.to_path_buf()).into());
    }

    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "SOAK TEST ANALYSIS")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Metrics file: {}", metrics_file.display())?;
    writeln!(out)?;

    let samples = loader::load_samples(metrics_file)?;
    let analysis = stats::summarize(&samples)?;

    print_console_report(out, metrics_file, &analysis)?;

    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "DETAILED ANALYSIS SAVED")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

    let report_path = report::write_detailed_report(
        metrics_file,
        results_file,
        &samples,
        &ReportSummary::from(&analysis),
    )?;
    writeln!(out, "Detailed report saved to: {}", report_path.display())?;

    Ok(report_path)
}

fn section<W: Write>(out: &mut W, title: &str) -> std::io::Result<()> {
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

pub fn print_console_report<W: Write>(
    out: &mut W,
    metrics_file: &Path,
    analysis: &AnalysisResult,
) -> Result<()> {
    section(out, "TEST DURATION AND LOAD")?;
    writeln!(
        out,
        "Total duration: {} minutes ({:.2} hours)",
        analysis.duration_minutes, analysis.duration_hours
    )?;
    writeln!(out, "Data points collected: {}", analysis.sample_count)?;
    writeln!(out, "Sampling interval: {} minutes", sampling_interval_minutes(metrics_file))?;
    if let (Some(start), Some(end)) = (
        format_timestamp(analysis.first_timestamp),
        format_timestamp(analysis.last_timestamp),
    ) {
        writeln!(out, "Test window: {start} to {end}")?;
    }
    writeln!(out)?;

    section(out, "MEMORY ANALYSIS")?;
    writeln!(out, "Initial heap: {} MB", analysis.initial_mb)?;
    writeln!(out, "Final heap:   {} MB", analysis.final_mb)?;
    writeln!(out, "Min heap:     {} MB", analysis.min_mb)?;
    writeln!(out, "Max heap:     {} MB", analysis.max_mb)?;
    writeln!(out, "Avg heap:     {:.1} MB", analysis.avg_mb)?;
    writeln!(out)?;

    section(out, "MEMORY GROWTH ANALYSIS")?;
    writeln!(out, "Total growth: {} MB", analysis.total_growth_mb)?;
    writeln!(out, "Growth rate: {:.2} MB/hour", analysis.growth_rate)?;
    writeln!(out, "Status: {}", analysis.growth.status())?;
    writeln!(out, "Confidence level: {}", analysis.growth.confidence())?;
    writeln!(out)?;

    section(out, "STABILITY ANALYSIS")?;
    if let Some(stability) = &analysis.stability {
        writeln!(out, "Memory std dev: {:.2} MB", stability.std_dev)?;
        writeln!(out, "Coefficient of variation: {:.2}%", stability.coefficient_of_variation)?;
        writeln!(out, "Memory stability: {}", stability.stability.description())?;
    }
    writeln!(out)?;

    section(out, "REQUEST STATISTICS")?;
    writeln!(out, "Total requests: {}", group_thousands(analysis.total_requests))?;
    writeln!(out, "Total errors: {}", group_thousands(analysis.total_errors))?;
    writeln!(out, "Success rate: {:.2}%", analysis.success_rate)?;
    writeln!(out, "Request reliability: {}", analysis.reliability.as_str())?;
    writeln!(out)?;

    section(out, "CACHE CAPACITY ANALYSIS")?;
    writeln!(out, "Critical cache limits:")?;
    for (cache, limit) in CACHE_LIMITS {
        writeln!(out, "  {cache}: {limit}")?;
    }
    writeln!(out)?;
    writeln!(out, "Note: Check server logs to verify cache evictions are happening")?;
    writeln!(out, "within expected limits during sustained load.")?;
    writeln!(out)?;

    section(out, "RECOMMENDATIONS")?;
    for line in recommendations(analysis) {
        writeln!(out, "{line}")?;
    }

    Ok(())
}

/// Recommendation lines, checked against their own triggers rather than the
/// classification tiers.
pub fn recommendations(analysis: &AnalysisResult) -> Vec<&'static str> {
    let mut lines = Vec::new();

    if analysis.growth_rate > RECOMMEND_GROWTH_ABOVE {
        lines.push("1. Investigate memory leak - growth rate exceeds 5 MB/hour");
        lines.push("   - Check for unbounded collections in request handlers");
        lines.push("   - Review thread creation and cleanup");
    }

    if analysis
        .coefficient_of_variation()
        .map_or(false, |cv| cv > RECOMMEND_CV_ABOVE)
    {
        lines.push("2. Memory usage is unstable - varies > 20%");
        lines.push("   - Check for cache eviction patterns");
        lines.push("   - Verify GC behavior during sustained load");
    }

    if analysis.success_rate < RECOMMEND_SUCCESS_BELOW {
        lines.push("3. Error rate is too high - improve error handling");
        lines.push("   - Check server capacity and thread pool sizes");
        lines.push("   - Review timeout and connection limits");
    }

    if lines.is_empty() {
        lines.push("No issues detected - system appears stable");
    }

    lines
}

/// The soak harness samples every 5 minutes, the quick variant every minute.
/// Both file names contain `soak_test`, so only custom names get 1.
fn sampling_interval_minutes(metrics_file: &Path) -> u32 {
    if metrics_file.to_string_lossy().contains("soak_test") {
        5
    } else {
        1
    }
}

fn format_timestamp(timestamp: i64) -> Option<String> {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .map(|time| time.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
