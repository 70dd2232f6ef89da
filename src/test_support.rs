//! In-memory fakes shared by the unit tests

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::location_resolver::Geocoder;
use crate::models::{DailyRecord, Location};
use crate::weather::WeatherProvider;
use crate::{EventRiskError, Result};

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub(crate) fn record(date: NaiveDate, max_temperature: f64, precipitation: f64) -> DailyRecord {
    DailyRecord {
        date,
        max_temperature: Some(max_temperature),
        min_temperature: Some(max_temperature - 8.0),
        precipitation: Some(precipitation),
        max_wind_speed: Some(12.0),
    }
}

type RecordFn = dyn Fn(NaiveDate) -> DailyRecord + Send + Sync;

/// Provider that synthesises one record per requested day
pub(crate) struct FakeProvider {
    record_for: Box<RecordFn>,
    failing_years: Vec<i32>,
    forecast: Vec<DailyRecord>,
    requests: AtomicUsize,
}

impl FakeProvider {
    pub(crate) fn from_fn<F>(record_for: F) -> Self
    where
        F: Fn(NaiveDate) -> DailyRecord + Send + Sync + 'static,
    {
        Self {
            record_for: Box::new(record_for),
            failing_years: Vec::new(),
            forecast: Vec::new(),
            requests: AtomicUsize::new(0),
        }
    }

    pub(crate) fn constant(max_temperature: f64, precipitation: f64) -> Self {
        Self::from_fn(move |d| record(d, max_temperature, precipitation))
    }

    /// Warm summers, wet autumns, deterministic per date
    pub(crate) fn seasonal() -> Self {
        Self::from_fn(|d| {
            let angle = f64::from(d.ordinal()) / 365.0 * std::f64::consts::TAU;
            let max_temperature = 18.0 - 12.0 * angle.cos() + f64::from(d.year() % 3);
            let precipitation = f64::from(d.day() % 5) * 3.0;
            record(d, max_temperature, precipitation)
        })
    }

    pub(crate) fn failing_years(mut self, years: &[i32]) -> Self {
        self.failing_years = years.to_vec();
        self
    }

    pub(crate) fn missing_precipitation_on(mut self, target: NaiveDate) -> Self {
        let inner = self.record_for;
        self.record_for = Box::new(move |d| {
            let mut r = inner(d);
            if d == target {
                r.precipitation = None;
            }
            r
        });
        self
    }

    pub(crate) fn with_forecast(mut self, forecast: Vec<DailyRecord>) -> Self {
        self.forecast = forecast;
        self
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn historical_daily(
        &self,
        _latitude: f64,
        _longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyRecord>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.failing_years.contains(&start.year()) {
            return Err(EventRiskError::transport(format!("HTTP 503 for {}", start.year())));
        }
        Ok(start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|d| (self.record_for)(d))
            .collect())
    }

    async fn immediate_forecast(&self, _latitude: f64, _longitude: f64) -> Result<Vec<DailyRecord>> {
        if self.forecast.is_empty() {
            return Err(EventRiskError::transport("forecast unavailable"));
        }
        Ok(self.forecast.clone())
    }
}

/// Geocoder that answers every query with the same location
pub(crate) struct StaticGeocoder(pub(crate) Option<Location>);

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, _query: &str) -> Result<Option<Location>> {
        Ok(self.0.clone())
    }
}
