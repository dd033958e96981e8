//! Classification thresholds for soak test results

/// Memory growth below this (MB/hour) is healthy.
pub const GROWTH_HEALTHY_LIMIT: f64 = 2.0;
pub const GROWTH_ACCEPTABLE_LIMIT: f64 = 5.0;
/// At or above this the run is treated as leaking.
pub const GROWTH_WARNING_LIMIT: f64 = 10.0;

/// Runs shorter than this are stretched to it when computing the growth rate.
pub const MIN_DURATION_HOURS: f64 = 0.1;

// Coefficient of variation, in percent
pub const CV_EXCELLENT_LIMIT: f64 = 5.0;
pub const CV_GOOD_LIMIT: f64 = 10.0;
pub const CV_FAIR_LIMIT: f64 = 20.0;

pub const SUCCESS_RATE_PASS: f64 = 99.5;
// Only used to document the success rate bands in the detailed report
pub const SUCCESS_RATE_GOOD: f64 = 99.0;
pub const SUCCESS_RATE_ACCEPTABLE: f64 = 95.0;

// Recommendation triggers. These are checked on their own, not derived from the
// tiers above, and the detailed report's next steps share the growth trigger.
pub const RECOMMEND_GROWTH_ABOVE: f64 = 5.0;
pub const RECOMMEND_CV_ABOVE: f64 = 20.0;
pub const RECOMMEND_SUCCESS_BELOW: f64 = 99.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthStatus {
    Healthy,
    Acceptable,
    Warning,
    Fail,
}

impl GrowthStatus {
    pub fn classify(growth_rate: f64) -> Self {
        if growth_rate < GROWTH_HEALTHY_LIMIT {
            GrowthStatus::Healthy
        } else if growth_rate < GROWTH_ACCEPTABLE_LIMIT {
            GrowthStatus::Acceptable
        } else if growth_rate < GROWTH_WARNING_LIMIT {
            GrowthStatus::Warning
        } else {
            GrowthStatus::Fail
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            GrowthStatus::Healthy => "PASS - Healthy memory usage",
            GrowthStatus::Acceptable => "PASS - Acceptable growth",
            GrowthStatus::Warning => "WARNING - Monitor closely",
            GrowthStatus::Fail => "FAIL - Likely memory leak",
        }
    }

    /// How confident we are that the process is leaking.
    pub fn confidence(&self) -> &'static str {
        match self {
            GrowthStatus::Healthy => "Very low",
            GrowthStatus::Acceptable => "Low",
            GrowthStatus::Warning => "Medium",
            GrowthStatus::Fail => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Stability {
    pub fn classify(coefficient_of_variation: f64) -> Self {
        if coefficient_of_variation < CV_EXCELLENT_LIMIT {
            Stability::Excellent
        } else if coefficient_of_variation < CV_GOOD_LIMIT {
            Stability::Good
        } else if coefficient_of_variation < CV_FAIR_LIMIT {
            Stability::Fair
        } else {
            Stability::Poor
        }
    }

    pub fn description(&self) -> String {
        match self {
            Stability::Excellent => format!("EXCELLENT (< {CV_EXCELLENT_LIMIT}% variation)"),
            Stability::Good => format!("GOOD ({CV_EXCELLENT_LIMIT}-{CV_GOOD_LIMIT}% variation)"),
            Stability::Fair => format!("FAIR ({CV_GOOD_LIMIT}-{CV_FAIR_LIMIT}% variation)"),
            Stability::Poor => format!("POOR (> {CV_FAIR_LIMIT}% variation)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reliability {
    Pass,
    Fail,
}

impl Reliability {
    pub fn classify(success_rate: f64) -> Self {
        if success_rate >= SUCCESS_RATE_PASS {
            Reliability::Pass
        } else {
            Reliability::Fail
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Reliability::Pass => "PASS",
            Reliability::Fail => "FAIL",
        }
    }
}
