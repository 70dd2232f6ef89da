//! Configuration management for the `EventRisk` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::EventRiskError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `EventRisk` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventRiskConfig {
    /// Weather provider configuration
    pub weather: WeatherConfig,
    /// Historical aggregation settings
    pub history: HistoryConfig,
    /// Risk thresholds and classification levels
    pub risk: RiskConfig,
    /// Date optimizer settings
    pub optimizer: OptimizerConfig,
    /// Forecast simulation perturbation ranges
    pub simulation: SimulationConfig,
    /// Cache configuration
    pub cache: CacheConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Weather provider configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Base URL of the historical archive API
    pub archive_base_url: String,
    /// Base URL of the forecast API
    pub forecast_base_url: String,
    /// Base URL of the geocoding API
    pub geocoding_base_url: String,
    /// Timeout for a single historical request in seconds
    pub timeout_seconds: u32,
    /// Timeout for forecast and geocoding requests in seconds
    pub forecast_timeout_seconds: u32,
    /// Number of yearly requests allowed in flight at once
    pub max_concurrent_requests: usize,
    /// Days requested from the immediate forecast endpoint
    pub forecast_days: u32,
}

/// Historical aggregation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// How many past years are fetched for each window
    pub years: u32,
}

/// Risk thresholds and classification levels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Daily maximum temperature (°C) above which a day counts as hot
    pub hot_threshold: f64,
    /// Daily precipitation (mm) above which a day counts as rainy
    pub rain_threshold: f64,
    /// Probability (%) above which an event is high risk
    pub high_risk_percent: f64,
    /// Probability (%) above which an event is moderate risk
    pub moderate_risk_percent: f64,
}

/// Date optimizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Days searched on either side of the original start date
    pub search_radius_days: u32,
}

/// Half-open uniform range `[low, high)` added to a climatology mean
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerturbationRange {
    pub low: f64,
    pub high: f64,
}

impl PerturbationRange {
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

/// Perturbation ranges for the forecast simulator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub max_temperature: PerturbationRange,
    pub min_temperature: PerturbationRange,
    pub precipitation: PerturbationRange,
    pub wind_speed: PerturbationRange,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries per cache
    pub capacity: usize,
    /// Cache TTL in hours
    pub ttl_hours: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_archive_base_url() -> String {
    "https://archive-api.open-meteo.com/v1".to_string()
}

fn default_forecast_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    15
}

fn default_forecast_timeout() -> u32 {
    10
}

fn default_max_concurrent_requests() -> usize {
    4
}

fn default_forecast_days() -> u32 {
    16
}

fn default_history_years() -> u32 {
    20
}

fn default_search_radius_days() -> u32 {
    30
}

fn default_cache_capacity() -> usize {
    64
}

fn default_cache_ttl() -> u32 {
    6
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            archive_base_url: default_archive_base_url(),
            forecast_base_url: default_forecast_base_url(),
            geocoding_base_url: default_geocoding_base_url(),
            timeout_seconds: default_weather_timeout(),
            forecast_timeout_seconds: default_forecast_timeout(),
            max_concurrent_requests: default_max_concurrent_requests(),
            forecast_days: default_forecast_days(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            years: default_history_years(),
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            hot_threshold: 32.0,
            rain_threshold: 10.0,
            high_risk_percent: 50.0,
            moderate_risk_percent: 20.0,
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            search_radius_days: default_search_radius_days(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_temperature: PerturbationRange::new(-2.0, 2.0),
            min_temperature: PerturbationRange::new(-1.5, 1.5),
            precipitation: PerturbationRange::new(-1.0, 5.0),
            wind_speed: PerturbationRange::new(-3.0, 3.0),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_hours: default_cache_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl EventRiskConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // EVENTRISK_RISK__HOT_THRESHOLD=35 overrides risk.hot_threshold
        builder = builder.add_source(
            Environment::with_prefix("EVENTRISK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: EventRiskConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("eventrisk").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.archive_base_url.is_empty() {
            self.weather.archive_base_url = default_archive_base_url();
        }
        if self.weather.forecast_base_url.is_empty() {
            self.weather.forecast_base_url = default_forecast_base_url();
        }
        if self.weather.geocoding_base_url.is_empty() {
            self.weather.geocoding_base_url = default_geocoding_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.weather.forecast_timeout_seconds == 0 {
            self.weather.forecast_timeout_seconds = default_forecast_timeout();
        }
        if self.weather.max_concurrent_requests == 0 {
            self.weather.max_concurrent_requests = default_max_concurrent_requests();
        }
        if self.weather.forecast_days == 0 {
            self.weather.forecast_days = default_forecast_days();
        }
        if self.history.years == 0 {
            self.history.years = default_history_years();
        }
        if self.optimizer.search_radius_days == 0 {
            self.optimizer.search_radius_days = default_search_radius_days();
        }
        if self.cache.capacity == 0 {
            self.cache.capacity = default_cache_capacity();
        }
        if self.cache.ttl_hours == 0 {
            self.cache.ttl_hours = default_cache_ttl();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_perturbation_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 || self.weather.forecast_timeout_seconds > 300 {
            return Err(EventRiskError::config("Weather API timeout cannot exceed 300 seconds").into());
        }

        if self.weather.max_concurrent_requests > 32 {
            return Err(EventRiskError::config("Concurrent weather requests cannot exceed 32").into());
        }

        if self.weather.forecast_days > 16 {
            return Err(EventRiskError::config("Immediate forecast cannot exceed 16 days").into());
        }

        if self.history.years > 80 {
            return Err(EventRiskError::config("History cannot exceed 80 years").into());
        }

        if self.optimizer.search_radius_days > 182 {
            return Err(EventRiskError::config("Search radius cannot exceed 182 days").into());
        }

        if self.cache.ttl_hours > 168 {
            return Err(EventRiskError::config("Cache TTL cannot exceed 168 hours (1 week)").into());
        }

        if self.cache.capacity > 10_000 {
            return Err(EventRiskError::config("Cache capacity cannot exceed 10000 entries").into());
        }

        let percent = 0.0..=100.0;
        if !percent.contains(&self.risk.high_risk_percent)
            || !percent.contains(&self.risk.moderate_risk_percent)
        {
            return Err(EventRiskError::config("Risk levels must be percentages between 0 and 100").into());
        }

        if self.risk.moderate_risk_percent > self.risk.high_risk_percent {
            return Err(EventRiskError::config(
                "Moderate risk level cannot exceed the high risk level",
            )
            .into());
        }

        if !self.risk.hot_threshold.is_finite() || !self.risk.rain_threshold.is_finite() {
            return Err(EventRiskError::config("Risk thresholds must be finite numbers").into());
        }

        Ok(())
    }

    fn validate_perturbation_ranges(&self) -> Result<()> {
        let ranges = [
            ("max_temperature", self.simulation.max_temperature),
            ("min_temperature", self.simulation.min_temperature),
            ("precipitation", self.simulation.precipitation),
            ("wind_speed", self.simulation.wind_speed),
        ];

        for (name, range) in ranges {
            if !(range.low.is_finite() && range.high.is_finite()) || range.low > range.high {
                return Err(EventRiskError::config(format!(
                    "Invalid simulation range for {name}: low ({}) must not exceed high ({})",
                    range.low, range.high
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(EventRiskError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(EventRiskError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            &self.weather.archive_base_url,
            &self.weather.forecast_base_url,
            &self.weather.geocoding_base_url,
        ];
        if urls
            .iter()
            .any(|url| !url.starts_with("http://") && !url.starts_with("https://"))
        {
            return Err(EventRiskError::config(
                "Weather API base URLs must be valid HTTP or HTTPS URLs",
            )
            .into());
        }

        Ok(())
    }
}
