//! Weather data providers
//!
//! The core only talks to providers through [`WeatherProvider`], so the
//! aggregation, simulation and optimization logic can run against the
//! Open-Meteo client in production and against in-memory fakes in tests.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::Result;
use crate::models::DailyRecord;

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// Source of daily weather records
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Daily records for the inclusive range `[start, end]`.
    ///
    /// Any failure (timeout, non-success status, decode error) is reported as
    /// [`crate::EventRiskError::Transport`].
    async fn historical_daily(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyRecord>>;

    /// Daily records for the next days, as far as the provider forecasts
    async fn immediate_forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<DailyRecord>>;
}
