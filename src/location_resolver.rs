//! Location Resolution Module
//!
//! This module resolves a free-text place name into a structured [`Location`]
//! through a [`Geocoder`]. It is the only place an analysis can fail for the
//! caller: no match means [`EventRiskError::LocationNotFound`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::models::Location;
use crate::weather::open_meteo::build_client;
use crate::{EventRiskError, Result};

/// Place-name to coordinates lookup
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best match for `query`, `Ok(None)` if nothing matched
    async fn geocode(&self, query: &str) -> Result<Option<Location>>;
}

/// Geocoding response from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    pub results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    pub admin1: Option<String>,
    pub admin2: Option<String>,
}

impl From<GeocodingResult> for Location {
    fn from(result: GeocodingResult) -> Self {
        let address = [
            Some(result.name.as_str()),
            result.admin2.as_deref(),
            result.admin1.as_deref(),
            result.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

        Location::with_address(
            result.latitude,
            result.longitude,
            result.name,
            address,
            result.country,
        )
    }
}

/// Geocoder backed by the `OpenMeteo` geocoding API (no API key required)
pub struct OpenMeteoGeocoder {
    client: Client,
    base_url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.forecast_timeout_seconds)?,
            base_url: config.geocoding_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Option<Location>> {
        info!("Geocoding location: '{}'", query);
        let start_time = Instant::now();

        let url = format!(
            "{}/search?name={}&count=1&language=en&format=json",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EventRiskError::transport(format!(
                "Geocoding request failed with HTTP {status}"
            )));
        }

        let body: GeocodingResponse = response.json().await.map_err(|e| {
            EventRiskError::transport(format!("Invalid geocoding data received from OpenMeteo: {e}"))
        })?;

        let location = body
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(Location::from);

        match &location {
            Some(found) => debug!(
                "Found '{}' ({:.4}, {:.4}) in {:.3}s",
                found.address,
                found.latitude,
                found.longitude,
                start_time.elapsed().as_secs_f64()
            ),
            None => warn!("No results found for location '{}'", query),
        }

        Ok(location)
    }
}

/// Service for resolving location names
#[derive(Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    /// Resolve a place name into a structured Location
    pub async fn resolve(&self, name: &str) -> Result<Location> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EventRiskError::validation("Location cannot be empty"));
        }

        let location = self
            .geocoder
            .geocode(name)
            .await?
            .ok_or_else(|| EventRiskError::location_not_found(name))?;

        debug!(
            "Resolved location: {} at ({}, {})",
            location.address, location.latitude, location.longitude
        );

        Ok(location)
    }
}
