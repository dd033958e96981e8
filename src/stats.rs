//! Aggregate statistics over a soak test run

use crate::error::{AnalysisError, Result};
use crate::thresholds::{GrowthStatus, Reliability, Stability, MIN_DURATION_HOURS};
use crate::{AnalysisResult, MetricSample, StabilityStats};
use log::debug;

pub fn summarize(samples: &[MetricSample]) -> Result<AnalysisResult> {
    let (first, last) = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(AnalysisError::EmptyDataset),
    };

    let used_mb = samples.iter().map(|s| s.used_mb).collect::<Vec<_>>();
    let duration_minutes = last.elapsed_minutes;
    let duration_hours = duration_minutes as f64 / 60.0;
    let growth_rate = growth_rate(first.used_mb, last.used_mb, duration_hours);

    // Counters are cumulative, the last sample holds the totals
    let success_rate = success_rate(last.requests, last.errors);

    Ok(AnalysisResult {
        sample_count: samples.len(),
        first_timestamp: first.timestamp,
        last_timestamp: last.timestamp,
        duration_minutes,
        duration_hours,
        initial_mb: first.used_mb,
        final_mb: last.used_mb,
        min_mb: used_mb.iter().copied().min().unwrap_or_default(),
        max_mb: used_mb.iter().copied().max().unwrap_or_default(),
        avg_mb: mean(&used_mb),
        total_growth_mb: last.used_mb as i128 - first.used_mb as i128,
        growth_rate,
        growth: GrowthStatus::classify(growth_rate),
        stability: stability(&used_mb),
        total_requests: last.requests,
        total_errors: last.errors,
        success_rate,
        reliability: Reliability::classify(success_rate),
    })
}

/// Linear growth between the first and last sample, in MB/hour.
pub fn growth_rate(initial_mb: i64, final_mb: i64, duration_hours: f64) -> f64 {
    (final_mb as f64 - initial_mb as f64) / duration_hours.max(MIN_DURATION_HOURS)
}

pub fn success_rate(requests: i64, errors: i64) -> f64 {
    if requests > 0 {
        (requests as f64 - errors as f64) / requests as f64 * 100.0
    } else {
        0.0
    }
}

fn mean(values: &[i64]) -> f64 {
    values.iter().fold(0., |accumulator, value| accumulator + *value as f64) / values.len() as f64
}

/// Population standard deviation and coefficient of variation. Needs at least
/// two samples to say anything, and a nonzero mean once the values spread.
pub fn stability(values: &[i64]) -> Option<StabilityStats> {
    if values.len() < 2 {
        return None;
    }
    if values.windows(2).all(|pair| pair[0] == pair[1]) {
        return Some(StabilityStats {
            std_dev: 0.0,
            coefficient_of_variation: 0.0,
            stability: Stability::classify(0.0),
        });
    }

    let mean = mean(values);
    let variance = values
        .iter()
        .fold(0., |accumulator, value| accumulator + (*value as f64 - mean).powi(2))
        / values.len() as f64;
    let std_dev = variance.sqrt();
    if mean == 0.0 {
        debug!("Memory series averages to zero, coefficient of variation undefined");
        return None;
    }
    let coefficient_of_variation = std_dev / mean.abs() * 100.0;

    Some(StabilityStats {
        std_dev,
        coefficient_of_variation,
        stability: Stability::classify(coefficient_of_variation),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(points: &[(i64, i64)]) -> Vec<MetricSample> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(elapsed_minutes, used_mb))| MetricSample {
                timestamp: 1_700_000_000 + elapsed_minutes * 60,
                elapsed_minutes,
                used_mb,
                total_mb: 512,
                max_mb: 2048,
                requests: i as i64 * 100,
                errors: 0,
                avg_response_time_ms: 20,
            })
            .collect()
    }

    #[test]
    fn test_empty_dataset() {
        assert!(matches!(summarize(&[]), Err(AnalysisError::EmptyDataset)));
    }

    #[test]
    fn test_stable_run() {
        let samples = samples(&[(0, 100), (60, 101), (120, 100), (180, 102), (240, 101)]);
        let result = summarize(&samples).unwrap();

        assert_eq!(result.sample_count, 5);
        assert_eq!(result.duration_minutes, 240);
        assert_eq!(result.duration_hours, 4.0);
        assert_eq!(result.initial_mb, 100);
        assert_eq!(result.final_mb, 101);
        assert_eq!(result.min_mb, 100);
        assert_eq!(result.max_mb, 102);
        assert!((result.avg_mb - 100.8).abs() < 1e-9);
        assert_eq!(result.growth_rate, 0.25);
        assert_eq!(result.growth, GrowthStatus::Healthy);

        let stability = result.stability.unwrap();
        assert!((stability.coefficient_of_variation - 0.742).abs() < 0.01);
        assert_eq!(stability.stability, Stability::Excellent);
    }

    #[test]
    fn test_growth_tiers_from_samples() {
        let warning = summarize(&samples(&[(0, 100), (600, 160)])).unwrap();
        assert_eq!(warning.growth_rate, 6.0);
        assert_eq!(warning.growth, GrowthStatus::Warning);

        let fail = summarize(&samples(&[(0, 100), (60, 250)])).unwrap();
        assert_eq!(fail.growth_rate, 150.0);
        assert_eq!(fail.growth, GrowthStatus::Fail);
    }

    #[test]
    fn test_growth_rate_duration_floor() {
        // 3 minutes is stretched to 6
        assert_eq!(growth_rate(100, 110, 0.05), 100.0);
        assert_eq!(growth_rate(100, 110, 0.0), 100.0);
        assert_eq!(growth_rate(100, 110, 2.0), 5.0);
        assert_eq!(growth_rate(110, 100, 1.0), -10.0);
    }

    #[test]
    fn test_growth_rate_uses_only_endpoints() {
        let samples = samples(&[(0, 100), (30, 900), (60, 50), (120, 110)]);
        let result = summarize(&samples).unwrap();
        assert_eq!(result.growth_rate, (110 - 100) as f64 / 2.0);
        assert_eq!(result.max_mb, 900);
        assert_eq!(result.min_mb, 50);
    }

    #[test]
    fn test_success_rate() {
        assert_eq!(success_rate(1000, 10), 99.0);
        assert_eq!(success_rate(1000, 0), 100.0);
        assert_eq!(success_rate(0, 0), 0.0);
        assert_eq!(success_rate(0, 25), 0.0);
    }

    #[test]
    fn test_totals_read_from_last_sample() {
        let mut samples = samples(&[(0, 100), (5, 100), (10, 100)]);
        samples[1].errors = 4;
        samples[2].requests = 1000;
        samples[2].errors = 2;
        let result = summarize(&samples).unwrap();
        assert_eq!(result.total_requests, 1000);
        assert_eq!(result.total_errors, 2);
        assert!((result.success_rate - 99.8).abs() < 1e-9);
        assert_eq!(result.reliability, Reliability::Pass);
    }

    #[test]
    fn test_stability_needs_two_samples() {
        assert!(stability(&[100]).is_none());
        let result = summarize(&samples(&[(0, 100)])).unwrap();
        assert!(result.stability.is_none());
        assert_eq!(result.coefficient_of_variation(), None);
    }

    #[test]
    fn test_coefficient_of_variation_zero_for_flat_series() {
        assert_eq!(stability(&[250, 250, 250]).unwrap().coefficient_of_variation, 0.0);
        assert_eq!(stability(&[0, 0]).unwrap().coefficient_of_variation, 0.0);
        assert!(stability(&[250, 251]).unwrap().coefficient_of_variation > 0.0);
    }

    #[test]
    fn test_spread_around_zero_mean_has_no_coefficient() {
        assert!(stability(&[-5, 5]).is_none());
        let result = summarize(&samples(&[(0, -5), (60, 5)])).unwrap();
        assert!(result.stability.is_none());
        assert_eq!(result.growth_rate, 10.0);
    }

    #[test]
    fn test_coefficient_of_variation_never_negative() {
        let stats = stability(&[-100, -300, -100, -300]).unwrap();
        assert_eq!(stats.coefficient_of_variation, 50.0);
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let result = summarize(&samples(&[(0, i64::MIN), (60, i64::MAX)])).unwrap();
        assert_eq!(result.total_growth_mb, i64::MAX as i128 - i64::MIN as i128);
        assert!(result.growth_rate > 1.8e19);
        assert_eq!(result.growth, GrowthStatus::Fail);

        let result = summarize(&samples(&[(0, i64::MAX), (60, i64::MIN)])).unwrap();
        assert_eq!(result.total_growth_mb, i64::MIN as i128 - i64::MAX as i128);
        assert!(result.growth_rate < -1.8e19);
    }

    #[test]
    fn test_success_rate_with_extreme_counters() {
        assert_eq!(success_rate(10, i64::MIN), (10.0 - i64::MIN as f64) / 10.0 * 100.0);
        assert!(success_rate(i64::MAX, i64::MIN).is_finite());
        assert_eq!(success_rate(i64::MAX, 0), 100.0);
    }

    #[test]
    fn test_poor_stability() {
        let stats = stability(&[100, 300, 100, 300]).unwrap();
        assert_eq!(stats.std_dev, 100.0);
        assert_eq!(stats.coefficient_of_variation, 50.0);
        assert_eq!(stats.stability, Stability::Poor);
    }
}
