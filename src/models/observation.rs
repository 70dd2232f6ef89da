//! Daily weather observations and the multi-year historical dataset

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily record as delivered by a weather provider; any field may be missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub max_temperature: Option<f64>,
    pub min_temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub max_wind_speed: Option<f64>,
}

impl DailyRecord {
    /// Convert into an observation, or `None` if any field is missing
    #[must_use]
    pub fn complete(&self) -> Option<DailyObservation> {
        Some(DailyObservation {
            date: self.date,
            max_temperature: self.max_temperature?,
            min_temperature: self.min_temperature?,
            precipitation: self.precipitation?,
            max_wind_speed: self.max_wind_speed?,
        })
    }
}

/// A complete daily observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    pub date: NaiveDate,
    /// Maximum temperature in °C
    pub max_temperature: f64,
    /// Minimum temperature in °C
    pub min_temperature: f64,
    /// Precipitation sum in mm
    pub precipitation: f64,
    /// Maximum wind speed in km/h
    pub max_wind_speed: f64,
}

/// Observations for one (location, calendar window) pair across many years.
///
/// Rows keep the order in which the years were fetched; no consumer relies on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDataset {
    observations: Vec<DailyObservation>,
}

impl HistoricalDataset {
    #[must_use]
    pub fn new(observations: Vec<DailyObservation>) -> Self {
        Self { observations }
    }

    /// Build a dataset from raw records, dropping every incomplete row
    #[must_use]
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a DailyRecord>,
    {
        Self {
            observations: records.into_iter().filter_map(DailyRecord::complete).collect(),
        }
    }

    /// Append another dataset's rows
    pub fn extend(&mut self, other: HistoricalDataset) {
        self.observations.extend(other.observations);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DailyObservation> {
        self.observations.iter()
    }

    #[must_use]
    pub fn observations(&self) -> &[DailyObservation] {
        &self.observations
    }
}

impl FromIterator<DailyObservation> for HistoricalDataset {
    fn from_iter<T: IntoIterator<Item = DailyObservation>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
