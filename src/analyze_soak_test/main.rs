use log::{debug, info};
use soak_analyzer::analyze_metrics;
use std::path::{Path, PathBuf};

const DEFAULT_METRICS_FILE: &str = "soak_test_metrics.csv";
const DEFAULT_RESULTS_FILE: &str = "soak_test_results.txt";
const QUICK_METRICS_FILE: &str = "quick_soak_test_metrics.csv";
const QUICK_RESULTS_FILE: &str = "quick_soak_test_results.txt";

/// analyze_soak_test [metrics_file] [results_file]
fn main() {
    pretty_env_logger::init();
    let (metrics_file, results_file) = resolve_input_files(std::env::args().skip(1), |path| path.exists());
    info!("Analyzing {} (results file {})", metrics_file.display(), results_file.display());

    let success = analyze_metrics(&metrics_file, &results_file, &mut std::io::stdout().lock());
    std::process::exit(if success { 0 } else { 1 });
}

/// Picks the metrics and results files from the command line, falling back to
/// the quick soak test's files when the metrics file isn't there.
fn resolve_input_files<I, F>(mut args: I, exists: F) -> (PathBuf, PathBuf)
where
    I: Iterator<Item = String>,
    F: Fn(&Path) -> bool,
{
    let metrics_file = args.next().unwrap_or_else(|| DEFAULT_METRICS_FILE.to_string());
    let results_file = args.next().unwrap_or_else(|| DEFAULT_RESULTS_FILE.to_string());
    let (metrics_file, results_file) = (PathBuf::from(metrics_file), PathBuf::from(results_file));

    if !exists(&metrics_file) && exists(Path::new(QUICK_METRICS_FILE)) {
        debug!("{} not found, using quick soak test files", metrics_file.display());
        return (QUICK_METRICS_FILE.into(), QUICK_RESULTS_FILE.into());
    }

    (metrics_file, results_file)
}
