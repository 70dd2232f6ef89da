//! One end-to-end analysis request
//!
//! Resolves the place, aggregates its history, simulates the event window,
//! scores the risk and assembles advice. Remote results are memoized in
//! caches owned by the analyzer; the core components stay pure.

use chrono::NaiveDate;
use rand::RngExt;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::advisor::{Advice, Advisor, DestinationCatalog};
use crate::cache::{Cache, forecast_key, history_key};
use crate::config::EventRiskConfig;
use crate::history::HistoricalAggregator;
use crate::location_resolver::{Geocoder, LocationResolver, OpenMeteoGeocoder};
use crate::models::{
    DailyObservation, HistoricalDataset, Location, RiskLevel, RiskProfile, SimulatedForecastRow,
};
use crate::optimizer::{DateOptimizer, event_duration};
use crate::risk::{RiskLevels, RiskThresholds, score_risk};
use crate::simulation::ForecastSimulator;
use crate::weather::{OpenMeteoClient, WeatherProvider};
use crate::{EventRiskError, Result};

/// A future event to analyse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRequest {
    pub location: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl EventRequest {
    pub fn new(location: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            location: location.into(),
            start,
            end,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.location.trim().is_empty() {
            return Err(EventRiskError::validation("Location cannot be empty"));
        }
        if self.start > self.end {
            return Err(EventRiskError::validation(format!(
                "Start date {} is after end date {}",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

/// Everything produced for one event
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Place name as entered
    pub location_input: String,
    pub location: Location,
    pub event_start: NaiveDate,
    pub event_end: NaiveDate,
    pub thresholds: RiskThresholds,
    #[serde(skip)]
    pub history: HistoricalDataset,
    pub risk: RiskProfile,
    pub simulated_forecast: Vec<SimulatedForecastRow>,
    /// Provider forecast for the coming days, empty when unavailable
    pub immediate_forecast: Vec<DailyObservation>,
    pub advice: Advice,
}

impl AnalysisReport {
    #[must_use]
    pub fn level(&self) -> RiskLevel {
        self.advice.level
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Weather risk for {} ({})",
            self.location.address,
            self.location.format_coordinates()
        )?;
        writeln!(f, "Event: {} to {}", self.event_start, self.event_end)?;
        if !self.risk.has_signal() {
            writeln!(f, "No historical data could be retrieved for these dates")?;
        }
        writeln!(f, "Historical days analysed: {}", self.risk.total_observation_days)?;
        writeln!(
            f,
            "  Hot days (> {:.1}°C):   {:.1}%",
            self.thresholds.hot_temperature, self.risk.hot_day_probability
        )?;
        writeln!(
            f,
            "  Rainy days (> {:.1} mm): {:.1}%",
            self.thresholds.rain_amount, self.risk.rain_day_probability
        )?;
        writeln!(f, "Risk level: {}", self.advice.level)?;

        writeln!(f)?;
        writeln!(f, "Simulated forecast")?;
        if self.simulated_forecast.is_empty() {
            writeln!(f, "  No historical data available for these dates")?;
        }
        for row in &self.simulated_forecast {
            writeln!(f, "  {row}")?;
        }

        writeln!(f)?;
        writeln!(f, "Immediate forecast")?;
        if self.immediate_forecast.is_empty() {
            writeln!(f, "  Unavailable")?;
        }
        for day in &self.immediate_forecast {
            writeln!(
                f,
                "  {}  {:>6.1}°C  {:>6.1}°C  {:>6.1} mm  {:>6.1} km/h",
                day.date, day.max_temperature, day.min_temperature, day.precipitation, day.max_wind_speed
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Advice")?;
        for message in &self.advice.messages {
            writeln!(f, "  - {message}")?;
        }
        if !self.advice.alternative_destinations.is_empty() {
            writeln!(
                f,
                "  Alternative destinations: {}",
                self.advice.alternative_destinations.join("; ")
            )?;
        }
        Ok(())
    }
}

/// Runs analyses against a geocoder and a weather provider
pub struct EventAnalyzer {
    resolver: LocationResolver,
    provider: Arc<dyn WeatherProvider>,
    aggregator: HistoricalAggregator,
    simulator: ForecastSimulator,
    optimizer: DateOptimizer,
    thresholds: RiskThresholds,
    advisor: Advisor,
    history_cache: Cache<HistoricalDataset>,
    forecast_cache: Cache<Vec<DailyObservation>>,
}

impl EventAnalyzer {
    /// Analyzer backed by the Open-Meteo services
    pub fn from_config(config: &EventRiskConfig) -> Result<Self> {
        let geocoder = Arc::new(OpenMeteoGeocoder::new(&config.weather)?);
        let provider = Arc::new(OpenMeteoClient::new(&config.weather)?);
        Ok(Self::new(geocoder, provider, config))
    }

    pub fn new(geocoder: Arc<dyn Geocoder>, provider: Arc<dyn WeatherProvider>, config: &EventRiskConfig) -> Self {
        let ttl = Duration::from_secs(u64::from(config.cache.ttl_hours) * 3600);
        Self {
            resolver: LocationResolver::new(geocoder),
            aggregator: HistoricalAggregator::new(
                provider.clone(),
                config.history.years,
                config.weather.max_concurrent_requests,
            ),
            provider,
            simulator: ForecastSimulator::new(config.simulation),
            optimizer: DateOptimizer::new(config.optimizer.search_radius_days),
            thresholds: RiskThresholds::from(&config.risk),
            advisor: Advisor::new(RiskLevels::from(&config.risk), DestinationCatalog::default()),
            history_cache: Cache::new(config.cache.capacity, ttl),
            forecast_cache: Cache::new(config.cache.capacity, ttl),
        }
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: DestinationCatalog) -> Self {
        self.advisor = Advisor::new(*self.advisor.levels(), catalog);
        self
    }

    /// Analyse one event.
    ///
    /// Only an invalid request or an unresolvable place fails; missing
    /// weather data degrades to empty sections of the report.
    #[instrument(skip(self, rng), fields(location = %request.location))]
    pub async fn analyze<R: RngExt>(&self, request: &EventRequest, rng: &mut R) -> Result<AnalysisReport> {
        request.validate()?;
        let location = self.resolver.resolve(&request.location).await?;
        let (latitude, longitude) = (location.latitude, location.longitude);

        let history = self.history(latitude, longitude, request.start, request.end).await;
        let simulated_forecast = self
            .simulator
            .simulate_forecast(&history, request.start, request.end, rng);
        let immediate_forecast = self.immediate_forecast(latitude, longitude).await;
        let risk = score_risk(&history, &self.thresholds);

        let best_window = if self.advisor.levels().classify(&risk) == RiskLevel::High {
            let (search_start, search_end) = self.optimizer.search_range(request.start);
            let search_history = self.history(latitude, longitude, search_start, search_end).await;
            self.optimizer.best_window(
                &search_history,
                search_start,
                search_end,
                &self.thresholds,
                event_duration(request.start, request.end),
            )
        } else {
            None
        };

        let advice = self.advisor.advise(
            request.location.trim(),
            &location,
            &risk,
            request.start,
            best_window,
            rng,
        );
        info!(
            "Analysed {} ({} to {}): {} risk",
            location.address, request.start, request.end, advice.level
        );

        Ok(AnalysisReport {
            location_input: request.location.trim().to_string(),
            location,
            event_start: request.start,
            event_end: request.end,
            thresholds: self.thresholds,
            history,
            risk,
            simulated_forecast,
            immediate_forecast,
            advice,
        })
    }

    /// Resolve a place and fetch only its immediate forecast
    pub async fn forecast(&self, place: &str) -> Result<(Location, Vec<DailyObservation>)> {
        let location = self.resolver.resolve(place).await?;
        let forecast = self.immediate_forecast(location.latitude, location.longitude).await;
        Ok((location, forecast))
    }

    async fn history(&self, latitude: f64, longitude: f64, start: NaiveDate, end: NaiveDate) -> HistoricalDataset {
        let key = history_key(latitude, longitude, start, end);
        if let Some(cached) = self.history_cache.get(&key).await {
            return cached;
        }

        let dataset = self
            .aggregator
            .get_historical_data(latitude, longitude, start, end)
            .await;
        if !dataset.is_empty() {
            self.history_cache.put(&key, dataset.clone()).await;
        }
        dataset
    }

    async fn immediate_forecast(&self, latitude: f64, longitude: f64) -> Vec<DailyObservation> {
        let key = forecast_key(latitude, longitude);
        if let Some(cached) = self.forecast_cache.get(&key).await {
            return cached;
        }

        match self.provider.immediate_forecast(latitude, longitude).await {
            Ok(records) => {
                let days: Vec<DailyObservation> = records.iter().filter_map(|r| r.complete()).collect();
                self.forecast_cache.put(&key, days.clone()).await;
                days
            }
            Err(e) => {
                warn!("Immediate forecast unavailable: {}", e);
                Vec::new()
            }
        }
    }
}
