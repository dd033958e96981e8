use serde_derive::Deserialize;

pub mod analyzer;
pub mod error;
pub mod loader;
pub mod report;
pub mod stats;
pub mod thresholds;

pub use analyzer::analyze_metrics;
pub use error::AnalysisError;

use thresholds::{GrowthStatus, Reliability, Stability};

/// One sampling interval of a soak test run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetricSample {
    pub timestamp: i64, // epoch seconds
    pub elapsed_minutes: i64,
    pub used_mb: i64,
    pub total_mb: i64,
    pub max_mb: i64,
    pub requests: i64, // cumulative since test start
    pub errors: i64,   // cumulative since test start
    pub avg_response_time_ms: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StabilityStats {
    pub std_dev: f64,
    pub coefficient_of_variation: f64, // percent
    pub stability: Stability,
}

/// Aggregates computed once from the full sample set.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub sample_count: usize,
    pub first_timestamp: i64,
    pub last_timestamp: i64,
    pub duration_minutes: i64,
    pub duration_hours: f64,
    pub initial_mb: i64,
    pub final_mb: i64,
    pub min_mb: i64,
    pub max_mb: i64,
    pub avg_mb: f64,
    pub total_growth_mb: i128,
    pub growth_rate: f64, // MB/hour
    pub growth: GrowthStatus,
    /// `None` for a single sample, or a spread series averaging to zero
    pub stability: Option<StabilityStats>,
    pub total_requests: i64,
    pub total_errors: i64,
    pub success_rate: f64, // percent
    pub reliability: Reliability,
}

impl AnalysisResult {
    pub fn coefficient_of_variation(&self) -> Option<f64> {
        self.stability.as_ref().map(|s| s.coefficient_of_variation)
    }
}
