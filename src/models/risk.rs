//! Risk profile, risk level and best-window models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exceedance probabilities for a dataset against hot/rain thresholds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    /// Share of days above the hot threshold, in percent (0-100)
    pub hot_day_probability: f64,
    /// Share of days above the rain threshold, in percent (0-100)
    pub rain_day_probability: f64,
    /// Number of observation days the probabilities are based on
    pub total_observation_days: usize,
}

impl RiskProfile {
    /// Combined risk used by the date optimizer
    #[must_use]
    pub fn total_risk(&self) -> f64 {
        self.hot_day_probability + self.rain_day_probability
    }

    #[must_use]
    pub fn has_signal(&self) -> bool {
        self.total_observation_days > 0
    }
}

/// Overall classification of an event's weather risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        };
        f.write_str(label)
    }
}

/// The lowest-risk contiguous span found by the date optimizer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Average combined risk (hot + rain, percent) across the window
    pub average_risk: f64,
}

impl fmt::Display for BestWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {} (avg. risk {:.1}%)",
            self.start.format("%B %d"),
            self.end.format("%B %d"),
            self.average_risk
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_risk_adds_probabilities() {
        let profile = RiskProfile {
            hot_day_probability: 12.5,
            rain_day_probability: 40.0,
            total_observation_days: 80,
        };
        assert_eq!(profile.total_risk(), 52.5);
        assert!(profile.has_signal());
        assert!(!RiskProfile::default().has_signal());
    }

    #[test]
    fn test_best_window_display() {
        let window = BestWindow {
            start: NaiveDate::from_ymd_opt(2026, 7, 3).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 7, 5).unwrap(),
            average_risk: 12.0,
        };
        assert_eq!(window.to_string(), "July 03 to July 05 (avg. risk 12.0%)");
    }
}
