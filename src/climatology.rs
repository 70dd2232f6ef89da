//! Seasonal climatology: per-calendar-day means across historical years

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::{DailyObservation, HistoricalDataset};

/// A calendar day with the year ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// `None` if the pair is not a day of any year (Feb 29 is accepted)
    #[must_use]
    pub fn new(month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| Self { month, day })
    }

    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    #[must_use]
    pub fn day(&self) -> u32 {
        self.day
    }

    /// The concrete date in `year`, `None` for Feb 29 in a common year
    #[must_use]
    pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl From<NaiveDate> for MonthDay {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Mean conditions for one calendar day.
///
/// No minimum sample size is enforced: a day seen in a single year is as
/// valid as one seen in twenty, so `sample_count` should be read alongside the means.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimatologyEntry {
    pub month_day: MonthDay,
    pub max_temperature: f64,
    pub min_temperature: f64,
    pub precipitation: f64,
    pub max_wind_speed: f64,
    /// Number of observations averaged into this entry
    pub sample_count: usize,
}

#[derive(Default)]
struct Accumulator {
    max_temperature: f64,
    min_temperature: f64,
    precipitation: f64,
    max_wind_speed: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, observation: &DailyObservation) {
        self.max_temperature += observation.max_temperature;
        self.min_temperature += observation.min_temperature;
        self.precipitation += observation.precipitation;
        self.max_wind_speed += observation.max_wind_speed;
        self.count += 1;
    }

    fn mean(&self, month_day: MonthDay) -> ClimatologyEntry {
        let n = self.count as f64;
        ClimatologyEntry {
            month_day,
            max_temperature: self.max_temperature / n,
            min_temperature: self.min_temperature / n,
            precipitation: self.precipitation / n,
            max_wind_speed: self.max_wind_speed / n,
            sample_count: self.count,
        }
    }
}

/// Climatology entries keyed by month-day, one per distinct day in the dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Climatology {
    entries: BTreeMap<MonthDay, ClimatologyEntry>,
}

impl Climatology {
    #[must_use]
    pub fn from_dataset(dataset: &HistoricalDataset) -> Self {
        let mut sums: BTreeMap<MonthDay, Accumulator> = BTreeMap::new();
        for observation in dataset.iter() {
            sums.entry(MonthDay::from_date(observation.date))
                .or_default()
                .add(observation);
        }

        let entries = sums
            .into_iter()
            .map(|(month_day, acc)| (month_day, acc.mean(month_day)))
            .collect();

        Self { entries }
    }

    #[must_use]
    pub fn get(&self, month_day: &MonthDay) -> Option<&ClimatologyEntry> {
        self.entries.get(month_day)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in month-day order
    pub fn iter(&self) -> impl Iterator<Item = &ClimatologyEntry> {
        self.entries.values()
    }
}
