//! Simulated forecast rows

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One simulated day of the future event window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatedForecastRow {
    pub date: NaiveDate,
    /// Maximum temperature in °C
    pub max_temperature: f64,
    /// Minimum temperature in °C
    pub min_temperature: f64,
    /// Rainfall in mm, never negative
    pub rainfall: f64,
    /// Wind speed in km/h, never negative
    pub wind_speed: f64,
}

impl fmt::Display for SimulatedForecastRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {:>6.1}°C  {:>6.1}°C  {:>6.1} mm  {:>6.1} km/h",
            self.date.format("%Y-%m-%d"),
            self.max_temperature,
            self.min_temperature,
            self.rainfall,
            self.wind_speed
        )
    }
}
