//! Forecast Simulator
//!
//! Produces a day-by-day estimate for a future window from the seasonal
//! climatology plus bounded uniform noise. The noise is for visual
//! variability only; it is not a statistical forecast.

use chrono::NaiveDate;
use rand::RngExt;
use tracing::debug;

use crate::climatology::{Climatology, MonthDay};
use crate::config::{PerturbationRange, SimulationConfig};
use crate::models::{HistoricalDataset, SimulatedForecastRow};

fn draw<R: RngExt>(rng: &mut R, range: PerturbationRange) -> f64 {
    if range.low < range.high {
        rng.random_range(range.low..range.high)
    } else {
        range.low
    }
}

/// Climatology-plus-noise forecast generator
#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastSimulator {
    ranges: SimulationConfig,
}

impl ForecastSimulator {
    #[must_use]
    pub fn new(ranges: SimulationConfig) -> Self {
        Self { ranges }
    }

    /// One row per day of `[start, end]` whose month-day exists in the
    /// climatology of `dataset`, in ascending date order.
    ///
    /// Days without a climatology entry (e.g. Feb 29 when no leap year was
    /// observed) are skipped. Rainfall and wind are clamped at zero.
    pub fn simulate_forecast<R: RngExt>(
        &self,
        dataset: &HistoricalDataset,
        start: NaiveDate,
        end: NaiveDate,
        rng: &mut R,
    ) -> Vec<SimulatedForecastRow> {
        if dataset.is_empty() {
            return Vec::new();
        }

        let climatology = Climatology::from_dataset(dataset);
        let rows: Vec<SimulatedForecastRow> = start
            .iter_days()
            .take_while(|date| *date <= end)
            .filter_map(|date| {
                let mean = climatology.get(&MonthDay::from_date(date))?;
                Some(SimulatedForecastRow {
                    date,
                    max_temperature: mean.max_temperature + draw(rng, self.ranges.max_temperature),
                    min_temperature: mean.min_temperature + draw(rng, self.ranges.min_temperature),
                    rainfall: (mean.precipitation + draw(rng, self.ranges.precipitation)).max(0.0),
                    wind_speed: (mean.max_wind_speed + draw(rng, self.ranges.wind_speed)).max(0.0),
                })
            })
            .collect();

        debug!(
            "Simulated {} days from a climatology of {} calendar days",
            rows.len(),
            climatology.len()
        );
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyObservation;
    use crate::test_support::date;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn observation(d: NaiveDate, max_temperature: f64, precipitation: f64, wind: f64) -> DailyObservation {
        DailyObservation {
            date: d,
            max_temperature,
            min_temperature: max_temperature - 10.0,
            precipitation,
            max_wind_speed: wind,
        }
    }

    fn july_history() -> HistoricalDataset {
        (2006..2026)
            .flat_map(|year| {
                (10..=12).map(move |day| observation(date(year, 7, day), 31.0, 0.0, 0.5))
            })
            .collect()
    }

    #[test]
    fn test_empty_dataset_yields_no_rows() {
        let simulator = ForecastSimulator::default();
        let mut rng = StdRng::seed_from_u64(7);
        let rows = simulator.simulate_forecast(&HistoricalDataset::default(), date(2026, 7, 10), date(2026, 7, 12), &mut rng);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_one_row_per_day_in_date_order() {
        let simulator = ForecastSimulator::default();
        let mut rng = StdRng::seed_from_u64(7);
        let rows = simulator.simulate_forecast(&july_history(), date(2026, 7, 10), date(2026, 7, 12), &mut rng);

        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2026, 7, 10), date(2026, 7, 11), date(2026, 7, 12)]);
    }

    #[test]
    fn test_days_missing_from_climatology_are_skipped() {
        let simulator = ForecastSimulator::default();
        let mut rng = StdRng::seed_from_u64(7);
        let rows = simulator.simulate_forecast(&july_history(), date(2026, 7, 8), date(2026, 7, 14), &mut rng);
        assert_eq!(rows.len(), 3);
        assert!(rows.len() <= 7);
    }

    #[test]
    fn test_perturbation_stays_within_ranges() {
        let simulator = ForecastSimulator::default();
        let mut rng = StdRng::seed_from_u64(42);
        let history = july_history();

        for _ in 0..200 {
            for row in simulator.simulate_forecast(&history, date(2026, 7, 10), date(2026, 7, 12), &mut rng) {
                assert!((29.0..33.0).contains(&row.max_temperature));
                assert!((19.5..22.5).contains(&row.min_temperature));
                assert!((0.0..5.0).contains(&row.rainfall));
                assert!((0.0..3.5).contains(&row.wind_speed));
            }
        }
    }

    #[test]
    fn test_rainfall_and_wind_never_negative() {
        let ranges = SimulationConfig {
            precipitation: PerturbationRange::new(-50.0, -10.0),
            wind_speed: PerturbationRange::new(-50.0, -10.0),
            ..SimulationConfig::default()
        };
        let simulator = ForecastSimulator::new(ranges);
        let mut rng = StdRng::seed_from_u64(3);
        let rows = simulator.simulate_forecast(&july_history(), date(2026, 7, 10), date(2026, 7, 12), &mut rng);

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.rainfall == 0.0 && r.wind_speed == 0.0));
    }

    #[test]
    fn test_same_seed_same_forecast() {
        let simulator = ForecastSimulator::default();
        let history = july_history();
        let a = simulator.simulate_forecast(&history, date(2026, 7, 10), date(2026, 7, 12), &mut StdRng::seed_from_u64(9));
        let b = simulator.simulate_forecast(&history, date(2026, 7, 10), date(2026, 7, 12), &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_width_range_adds_constant() {
        let ranges = SimulationConfig {
            max_temperature: PerturbationRange::new(1.0, 1.0),
            ..SimulationConfig::default()
        };
        let simulator = ForecastSimulator::new(ranges);
        let rows = simulator.simulate_forecast(&july_history(), date(2026, 7, 10), date(2026, 7, 10), &mut StdRng::seed_from_u64(1));
        assert_eq!(rows[0].max_temperature, 32.0);
    }

    #[test]
    fn test_feb_29_without_leap_history_is_skipped() {
        let history: HistoricalDataset = [2021, 2022, 2023]
            .into_iter()
            .flat_map(|year| [observation(date(year, 2, 28), 10.0, 1.0, 5.0), observation(date(year, 3, 1), 11.0, 1.0, 5.0)])
            .collect();
        let simulator = ForecastSimulator::default();
        let rows = simulator.simulate_forecast(&history, date(2028, 2, 28), date(2028, 3, 1), &mut StdRng::seed_from_u64(5));
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2028, 2, 28), date(2028, 3, 1)]);
    }
}
