//! Risk Scorer
//!
//! Converts observations into hot/rain exceedance probabilities and
//! classifies them into a [`RiskLevel`].

use serde::{Deserialize, Serialize};

use crate::config::RiskConfig;
use crate::models::{DailyObservation, HistoricalDataset, RiskLevel, RiskProfile};

/// Thresholds a day must strictly exceed to count as hot or rainy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Maximum temperature in °C
    pub hot_temperature: f64,
    /// Precipitation in mm
    pub rain_amount: f64,
}

impl RiskThresholds {
    #[must_use]
    pub const fn new(hot_temperature: f64, rain_amount: f64) -> Self {
        Self {
            hot_temperature,
            rain_amount,
        }
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self::new(32.0, 10.0)
    }
}

impl From<&RiskConfig> for RiskThresholds {
    fn from(config: &RiskConfig) -> Self {
        Self::new(config.hot_threshold, config.rain_threshold)
    }
}

/// Probability cut-offs (percent) for risk classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskLevels {
    pub high_percent: f64,
    pub moderate_percent: f64,
}

impl Default for RiskLevels {
    fn default() -> Self {
        Self {
            high_percent: 50.0,
            moderate_percent: 20.0,
        }
    }
}

impl From<&RiskConfig> for RiskLevels {
    fn from(config: &RiskConfig) -> Self {
        Self {
            high_percent: config.high_risk_percent,
            moderate_percent: config.moderate_risk_percent,
        }
    }
}

impl RiskLevels {
    /// High when either probability exceeds the high cut-off, moderate when
    /// either exceeds the moderate cut-off, low otherwise
    #[must_use]
    pub fn classify(&self, profile: &RiskProfile) -> RiskLevel {
        let worst = profile.hot_day_probability.max(profile.rain_day_probability);
        if worst > self.high_percent {
            RiskLevel::High
        } else if worst > self.moderate_percent {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

/// Risk profile of any collection of observations
pub fn profile_of<'a, I>(observations: I, thresholds: &RiskThresholds) -> RiskProfile
where
    I: IntoIterator<Item = &'a DailyObservation>,
{
    let mut total = 0usize;
    let mut hot = 0usize;
    let mut rainy = 0usize;
    for observation in observations {
        total += 1;
        if observation.max_temperature > thresholds.hot_temperature {
            hot += 1;
        }
        if observation.precipitation > thresholds.rain_amount {
            rainy += 1;
        }
    }

    if total == 0 {
        return RiskProfile::default();
    }

    let percent = |count: usize| count as f64 / total as f64 * 100.0;
    RiskProfile {
        hot_day_probability: percent(hot),
        rain_day_probability: percent(rainy),
        total_observation_days: total,
    }
}

/// Risk profile of a historical dataset; all zeros when it is empty
#[must_use]
pub fn score_risk(dataset: &HistoricalDataset, thresholds: &RiskThresholds) -> RiskProfile {
    profile_of(dataset.iter(), thresholds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::date;
    use rstest::rstest;

    fn dataset(rows: &[(f64, f64)]) -> HistoricalDataset {
        rows.iter()
            .enumerate()
            .map(|(i, &(max_temperature, precipitation))| DailyObservation {
                date: date(2020, 1, 1) + chrono::Days::new(i as u64),
                max_temperature,
                min_temperature: max_temperature - 5.0,
                precipitation,
                max_wind_speed: 10.0,
            })
            .collect()
    }

    #[test]
    fn test_empty_dataset_scores_zero() {
        let profile = score_risk(&HistoricalDataset::default(), &RiskThresholds::default());
        assert_eq!(profile.hot_day_probability, 0.0);
        assert_eq!(profile.rain_day_probability, 0.0);
        assert_eq!(profile.total_observation_days, 0);
    }

    #[test]
    fn test_probabilities() {
        let data = dataset(&[(33.0, 0.0), (31.0, 12.0), (35.0, 15.0), (20.0, 1.0)]);
        let profile = score_risk(&data, &RiskThresholds::default());
        assert_eq!(profile.hot_day_probability, 50.0);
        assert_eq!(profile.rain_day_probability, 50.0);
        assert_eq!(profile.total_observation_days, 4);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let data = dataset(&[(32.0, 10.0), (32.0, 10.0)]);
        let profile = score_risk(&data, &RiskThresholds::default());
        assert_eq!(profile.hot_day_probability, 0.0);
        assert_eq!(profile.rain_day_probability, 0.0);
    }

    #[test]
    fn test_thresholds_are_parameters() {
        let data = dataset(&[(25.0, 3.0), (18.0, 0.0)]);
        let profile = score_risk(&data, &RiskThresholds::new(20.0, 2.0));
        assert_eq!(profile.hot_day_probability, 50.0);
        assert_eq!(profile.rain_day_probability, 50.0);
    }

    #[test]
    fn test_probabilities_bounded() {
        let rows: Vec<(f64, f64)> = (0..97).map(|i| (f64::from(i) * 0.5, f64::from(i % 13))).collect();
        let profile = score_risk(&dataset(&rows), &RiskThresholds::default());
        for p in [profile.hot_day_probability, profile.rain_day_probability] {
            assert!((0.0..=100.0).contains(&p));
        }
    }

    #[rstest]
    #[case(80.0, 0.0, RiskLevel::High)]
    #[case(0.0, 51.0, RiskLevel::High)]
    #[case(50.0, 50.0, RiskLevel::Moderate)]
    #[case(21.0, 0.0, RiskLevel::Moderate)]
    #[case(20.0, 20.0, RiskLevel::Low)]
    #[case(0.0, 0.0, RiskLevel::Low)]
    fn test_classify(#[case] rain: f64, #[case] hot: f64, #[case] expected: RiskLevel) {
        let profile = RiskProfile {
            hot_day_probability: hot,
            rain_day_probability: rain,
            total_observation_days: 60,
        };
        assert_eq!(RiskLevels::default().classify(&profile), expected);
    }
}
