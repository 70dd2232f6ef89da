//! Date Optimizer
//!
//! Scores every calendar day of a search range around the original event,
//! averages the combined risk over windows of the event's length and picks the
//! lowest.
//!
//! Days are ordered by their offset from the search start rather than by
//! month-day, so a range that straddles Jan 1 stays chronological and the
//! resulting dates roll into the following year where they belong.

use chrono::{Days, NaiveDate};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument};

use crate::climatology::MonthDay;
use crate::history::HistoricalAggregator;
use crate::models::{BestWindow, DailyObservation, HistoricalDataset};
use crate::risk::{RiskThresholds, profile_of};

/// Number of days in the inclusive range, 0 if it is inverted
#[must_use]
pub fn event_duration(start: NaiveDate, end: NaiveDate) -> u32 {
    let days = (end - start).num_days() + 1;
    u32::try_from(days).unwrap_or(0)
}

/// Combined risk of one calendar day of the search range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRisk {
    /// Days since the search start
    pub offset: u64,
    pub hot_probability: f64,
    pub rain_probability: f64,
}

impl DailyRisk {
    #[must_use]
    pub fn total_risk(&self) -> f64 {
        self.hot_probability + self.rain_probability
    }
}

/// Finds the lowest-risk window near an event
#[derive(Debug, Clone, Copy)]
pub struct DateOptimizer {
    search_radius_days: u32,
}

impl Default for DateOptimizer {
    fn default() -> Self {
        Self::new(30)
    }
}

impl DateOptimizer {
    #[must_use]
    pub fn new(search_radius_days: u32) -> Self {
        Self { search_radius_days }
    }

    /// `[original_start - radius, original_start + radius]`
    #[must_use]
    pub fn search_range(&self, original_start: NaiveDate) -> (NaiveDate, NaiveDate) {
        let radius = Days::new(u64::from(self.search_radius_days));
        (
            original_start.checked_sub_days(radius).unwrap_or(original_start),
            original_start.checked_add_days(radius).unwrap_or(original_start),
        )
    }

    /// Per-day risk across all years, in chronological order of the search range.
    ///
    /// Observations whose month-day does not occur in the range (Feb 29 when
    /// the range lies in a common year) are ignored.
    #[must_use]
    pub fn daily_risks(
        &self,
        dataset: &HistoricalDataset,
        search_start: NaiveDate,
        search_end: NaiveDate,
        thresholds: &RiskThresholds,
    ) -> Vec<DailyRisk> {
        let mut offsets: HashMap<MonthDay, u64> = HashMap::new();
        for (offset, date) in (0u64..).zip(search_start.iter_days().take_while(|d| *d <= search_end)) {
            offsets.entry(MonthDay::from_date(date)).or_insert(offset);
        }

        let mut groups: BTreeMap<u64, Vec<&DailyObservation>> = BTreeMap::new();
        for observation in dataset.iter() {
            if let Some(offset) = offsets.get(&MonthDay::from_date(observation.date)) {
                groups.entry(*offset).or_default().push(observation);
            }
        }

        groups
            .into_iter()
            .map(|(offset, observations)| {
                let profile = profile_of(observations, thresholds);
                DailyRisk {
                    offset,
                    hot_probability: profile.hot_day_probability,
                    rain_probability: profile.rain_day_probability,
                }
            })
            .collect()
    }

    /// Lowest moving-average window of `duration` consecutive scored days.
    ///
    /// The window slides by position over the scored days, so a day missing
    /// from the data does not break a window. Ties keep the earliest window.
    /// `None` when fewer than `duration` days were scored.
    #[must_use]
    pub fn best_window(
        &self,
        dataset: &HistoricalDataset,
        search_start: NaiveDate,
        search_end: NaiveDate,
        thresholds: &RiskThresholds,
        duration: u32,
    ) -> Option<BestWindow> {
        let duration = usize::try_from(duration).ok().filter(|d| *d > 0)?;
        let risks = self.daily_risks(dataset, search_start, search_end, thresholds);
        if risks.len() < duration {
            debug!(
                "Only {} scored days for a {}-day window, no best window",
                risks.len(),
                duration
            );
            return None;
        }

        let mut best: Option<(&[DailyRisk], f64)> = None;
        for window in risks.windows(duration) {
            let average = window.iter().map(DailyRisk::total_risk).sum::<f64>() / duration as f64;
            if best.is_none_or(|(_, lowest)| average < lowest) {
                best = Some((window, average));
            }
        }

        let (window, average_risk) = best?;
        let first = window.first()?;
        let last = window.last()?;
        Some(BestWindow {
            start: search_start.checked_add_days(Days::new(first.offset))?,
            end: search_start.checked_add_days(Days::new(last.offset))?,
            average_risk,
        })
    }

    /// Fetch the search range's history and find its best window.
    ///
    /// `duration` is the event length in days, usually
    /// [`event_duration`]`(original_start, original_end)`.
    #[instrument(skip(self, aggregator))]
    pub async fn find_best_window(
        &self,
        aggregator: &HistoricalAggregator,
        latitude: f64,
        longitude: f64,
        original_start: NaiveDate,
        original_end: NaiveDate,
        thresholds: &RiskThresholds,
        duration: u32,
    ) -> Option<BestWindow> {
        let (search_start, search_end) = self.search_range(original_start);
        let dataset = aggregator
            .get_historical_data(latitude, longitude, search_start, search_end)
            .await;

        let best = self.best_window(&dataset, search_start, search_end, thresholds, duration);
        match &best {
            Some(window) => info!(
                "Best {}-day window around {}..{}: {}",
                duration, original_start, original_end, window
            ),
            None => info!("No complete {}-day window found", duration),
        }
        best
    }
}
