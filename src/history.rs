//! Historical Aggregator
//!
//! Fetches the same calendar window for each of the previous N years and
//! concatenates the complete rows into one [`HistoricalDataset`].
//!
//! A failed year is skipped, never retried, and never fails the aggregation:
//! an empty dataset is a valid result that downstream components handle.

use chrono::{Datelike, Months, NaiveDate};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::models::HistoricalDataset;
use crate::weather::WeatherProvider;

/// Shift `date` back by `years` calendar years.
///
/// Month and day are preserved. Feb 29 landing in a common year is clamped
/// to Feb 28.
#[must_use]
pub fn shift_back_years(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    date.checked_sub_months(Months::new(years.checked_mul(12)?))
}

/// One shifted window per past year, most recent first
#[must_use]
pub fn yearly_windows(start: NaiveDate, end: NaiveDate, years: u32) -> Vec<(NaiveDate, NaiveDate)> {
    (1..=years)
        .filter_map(|i| Some((shift_back_years(start, i)?, shift_back_years(end, i)?)))
        .collect()
}

/// Aggregates multi-year history from a [`WeatherProvider`]
#[derive(Clone)]
pub struct HistoricalAggregator {
    provider: Arc<dyn WeatherProvider>,
    years: u32,
    max_concurrent_requests: usize,
}

impl HistoricalAggregator {
    pub fn new(provider: Arc<dyn WeatherProvider>, years: u32, max_concurrent_requests: usize) -> Self {
        Self {
            provider,
            years,
            max_concurrent_requests: max_concurrent_requests.max(1),
        }
    }

    #[must_use]
    pub fn years(&self) -> u32 {
        self.years
    }

    /// Historical dataset for `[event_start, event_end]` shifted into each past year.
    ///
    /// Yearly requests run with bounded concurrency; rows are concatenated in
    /// year order (most recent first) regardless of completion order. The
    /// result depends only on the arguments and the provider's data.
    #[instrument(skip(self), fields(years = self.years))]
    pub async fn get_historical_data(
        &self,
        latitude: f64,
        longitude: f64,
        event_start: NaiveDate,
        event_end: NaiveDate,
    ) -> HistoricalDataset {
        if event_start > event_end {
            warn!("Event start {} is after end {}, no history fetched", event_start, event_end);
            return HistoricalDataset::default();
        }

        let windows = yearly_windows(event_start, event_end, self.years);
        let provider = &self.provider;

        let yearly: Vec<Option<HistoricalDataset>> = stream::iter(windows)
            .map(|(past_start, past_end)| async move {
                match provider
                    .historical_daily(latitude, longitude, past_start, past_end)
                    .await
                {
                    Ok(records) => {
                        let dataset = HistoricalDataset::from_records(&records);
                        debug!(
                            "Year {}: {} of {} rows complete",
                            past_start.year(),
                            dataset.len(),
                            records.len()
                        );
                        Some(dataset)
                    }
                    Err(e) => {
                        warn!("Skipping year {} ({} to {}): {}", past_start.year(), past_start, past_end, e);
                        None
                    }
                }
            })
            .buffered(self.max_concurrent_requests)
            .collect()
            .await;

        let fetched_years = yearly.iter().filter(|y| y.is_some()).count();
        let mut dataset = HistoricalDataset::default();
        for year in yearly.into_iter().flatten() {
            dataset.extend(year);
        }

        info!(
            "Aggregated {} days from {}/{} years",
            dataset.len(),
            fetched_years,
            self.years
        );
        dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeProvider, date};
    use rstest::rstest;

    #[rstest]
    #[case(date(2026, 7, 10), 1, date(2025, 7, 10))]
    #[case(date(2026, 7, 10), 20, date(2006, 7, 10))]
    #[case(date(2028, 2, 29), 1, date(2027, 2, 28))]
    #[case(date(2028, 2, 29), 4, date(2024, 2, 29))]
    #[case(date(2026, 1, 1), 3, date(2023, 1, 1))]
    fn test_shift_back_years(#[case] input: NaiveDate, #[case] years: u32, #[case] expected: NaiveDate) {
        assert_eq!(shift_back_years(input, years), Some(expected));
    }

    #[test]
    fn test_yearly_windows_cover_each_year() {
        let windows = yearly_windows(date(2026, 12, 28), date(2027, 1, 2), 20);
        assert_eq!(windows.len(), 20);
        assert_eq!(windows[0], (date(2025, 12, 28), date(2026, 1, 2)));
        assert_eq!(windows[19], (date(2006, 12, 28), date(2007, 1, 2)));
    }

    #[tokio::test]
    async fn test_aggregates_all_years() {
        let provider = Arc::new(FakeProvider::constant(30.0, 2.0));
        let aggregator = HistoricalAggregator::new(provider.clone(), 20, 4);

        let dataset = aggregator
            .get_historical_data(10.0, 76.0, date(2026, 7, 10), date(2026, 7, 12))
            .await;

        assert_eq!(dataset.len(), 60);
        assert_eq!(provider.request_count(), 20);
        for observation in dataset.iter() {
            assert!(observation.date.year() >= 2006 && observation.date.year() <= 2025);
        }
    }

    #[tokio::test]
    async fn test_failed_years_are_skipped() {
        let provider = Arc::new(FakeProvider::constant(30.0, 2.0).failing_years(&[2025, 2019, 2010]));
        let aggregator = HistoricalAggregator::new(provider, 20, 4);

        let dataset = aggregator
            .get_historical_data(10.0, 76.0, date(2026, 7, 10), date(2026, 7, 12))
            .await;

        assert_eq!(dataset.len(), 17 * 3);
        assert!(dataset.iter().all(|o| ![2025, 2019, 2010].contains(&o.date.year())));
    }

    #[tokio::test]
    async fn test_all_years_failing_yields_empty_dataset() {
        let years: Vec<i32> = (2000..2030).collect();
        let provider = Arc::new(FakeProvider::constant(30.0, 2.0).failing_years(&years));
        let aggregator = HistoricalAggregator::new(provider, 20, 4);

        let dataset = aggregator
            .get_historical_data(10.0, 76.0, date(2026, 7, 10), date(2026, 7, 12))
            .await;

        assert!(dataset.is_empty());
    }

    #[tokio::test]
    async fn test_incomplete_rows_are_dropped() {
        let provider = Arc::new(FakeProvider::constant(30.0, 2.0).missing_precipitation_on(date(2025, 7, 11)));
        let aggregator = HistoricalAggregator::new(provider, 2, 1);

        let dataset = aggregator
            .get_historical_data(10.0, 76.0, date(2026, 7, 10), date(2026, 7, 12))
            .await;

        assert_eq!(dataset.len(), 5);
        assert!(dataset.iter().all(|o| o.date != date(2025, 7, 11)));
    }

    #[tokio::test]
    async fn test_identical_requests_yield_identical_datasets() {
        let provider = Arc::new(FakeProvider::seasonal());
        let aggregator = HistoricalAggregator::new(provider, 20, 8);

        let first = aggregator
            .get_historical_data(48.85, 2.35, date(2026, 6, 1), date(2026, 6, 30))
            .await;
        let second = aggregator
            .get_historical_data(48.85, 2.35, date(2026, 6, 1), date(2026, 6, 30))
            .await;

        assert_eq!(first, second);
        assert_eq!(first.len(), 20 * 30);
    }

    #[tokio::test]
    async fn test_inverted_range_fetches_nothing() {
        let provider = Arc::new(FakeProvider::constant(30.0, 2.0));
        let aggregator = HistoricalAggregator::new(provider.clone(), 20, 4);

        let dataset = aggregator
            .get_historical_data(10.0, 76.0, date(2026, 7, 12), date(2026, 7, 10))
            .await;

        assert!(dataset.is_empty());
        assert_eq!(provider.request_count(), 0);
    }
}
