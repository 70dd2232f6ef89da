//! Open-Meteo archive and forecast client

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use super::WeatherProvider;
use crate::config::WeatherConfig;
use crate::models::DailyRecord;
use crate::{EventRiskError, Result};

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum,windspeed_10m_max";

/// Daily forecast/archive response from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct DailyResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
    pub daily: Option<DailyData>,
}

/// Daily weather data from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct DailyData {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Option<Vec<Option<f64>>>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Option<Vec<Option<f64>>>,
    #[serde(rename = "precipitation_sum")]
    pub precipitation: Option<Vec<Option<f64>>>,
    #[serde(rename = "windspeed_10m_max")]
    pub wind_speed_max: Option<Vec<Option<f64>>>,
}

fn column_value(column: Option<&Vec<Option<f64>>>, i: usize) -> Option<f64> {
    column.and_then(|values| values.get(i).copied().flatten())
}

impl DailyData {
    /// Convert the column-oriented payload into one record per day.
    ///
    /// Days whose timestamp does not parse are skipped; missing values stay `None`.
    #[must_use]
    pub fn into_records(self) -> Vec<DailyRecord> {
        self.time
            .iter()
            .enumerate()
            .filter_map(|(i, time)| {
                let date = match NaiveDate::parse_from_str(time, "%Y-%m-%d") {
                    Ok(date) => date,
                    Err(e) => {
                        debug!("Skipping unparseable date '{}': {}", time, e);
                        return None;
                    }
                };
                Some(DailyRecord {
                    date,
                    max_temperature: column_value(self.temperature_max.as_ref(), i),
                    min_temperature: column_value(self.temperature_min.as_ref(), i),
                    precipitation: column_value(self.precipitation.as_ref(), i),
                    max_wind_speed: column_value(self.wind_speed_max.as_ref(), i),
                })
            })
            .collect()
    }
}

/// Weather client for the `OpenMeteo` archive and forecast APIs
pub struct OpenMeteoClient {
    /// HTTP client for archive requests
    archive_client: Client,
    /// HTTP client for forecast requests
    forecast_client: Client,
    archive_base_url: String,
    forecast_base_url: String,
    forecast_days: u32,
}

impl OpenMeteoClient {
    /// Create a new client
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let archive_client = build_client(config.timeout_seconds)?;
        let forecast_client = build_client(config.forecast_timeout_seconds)?;

        Ok(Self {
            archive_client,
            forecast_client,
            archive_base_url: config.archive_base_url.trim_end_matches('/').to_string(),
            forecast_base_url: config.forecast_base_url.trim_end_matches('/').to_string(),
            forecast_days: config.forecast_days,
        })
    }

    async fn fetch_daily(&self, client: &Client, url: &str) -> Result<Vec<DailyRecord>> {
        let start_time = Instant::now();
        let response = client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(EventRiskError::transport(format!(
                "OpenMeteo responded with HTTP {status}"
            )));
        }

        let body: DailyResponse = response.json().await.map_err(|e| {
            EventRiskError::transport(format!("Invalid daily data received from OpenMeteo: {e}"))
        })?;

        let total_duration = start_time.elapsed();
        if total_duration.as_secs() > 5 {
            warn!("Slow OpenMeteo response: {:.3}s", total_duration.as_secs_f64());
        }

        let records = body.daily.map(DailyData::into_records).unwrap_or_default();
        debug!(
            "Received {} daily records in {:.3}s",
            records.len(),
            total_duration.as_secs_f64()
        );
        Ok(records)
    }
}

pub(crate) fn build_client(timeout_seconds: u32) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds.into()))
        .user_agent(concat!("EventRisk/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| EventRiskError::config(format!("Failed to create HTTP client: {e}")))
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    #[instrument(skip(self), level = "debug")]
    async fn historical_daily(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyRecord>> {
        let url = format!(
            "{}/archive?latitude={}&longitude={}&start_date={}&end_date={}&daily={}&timezone=auto",
            self.archive_base_url,
            latitude,
            longitude,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            DAILY_FIELDS
        );
        debug!("OpenMeteo archive request URL: {}", url);
        self.fetch_daily(&self.archive_client, &url).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn immediate_forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<DailyRecord>> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&daily={}&timezone=auto&forecast_days={}",
            self.forecast_base_url, latitude, longitude, DAILY_FIELDS, self.forecast_days
        );
        debug!("OpenMeteo forecast request URL: {}", url);
        self.fetch_daily(&self.forecast_client, &url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "latitude": 10.0,
        "longitude": 76.625,
        "timezone": "Asia/Kolkata",
        "daily": {
            "time": ["2024-07-10", "2024-07-11", "2024-07-12"],
            "temperature_2m_max": [29.1, null, 30.4],
            "temperature_2m_min": [23.0, 22.8, 23.5],
            "precipitation_sum": [12.3, 4.0, 0.0],
            "windspeed_10m_max": [14.2, 11.0, 9.7]
        }
    }"#;

    #[test]
    fn test_daily_response_into_records() {
        let response: DailyResponse = serde_json::from_str(SAMPLE).unwrap();
        let records = response.daily.unwrap().into_records();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 7, 10).unwrap());
        assert_eq!(records[0].precipitation, Some(12.3));
        assert_eq!(records[1].max_temperature, None);
        assert!(records[1].complete().is_none());
        assert!(records[2].complete().is_some());
    }

    #[test]
    fn test_missing_column_yields_none() {
        let json = r#"{"time": ["2024-01-01"], "temperature_2m_max": [5.0]}"#;
        let data: DailyData = serde_json::from_str(json).unwrap();
        let records = data.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].max_temperature, Some(5.0));
        assert_eq!(records[0].precipitation, None);
    }

    #[test]
    fn test_short_column_yields_none() {
        let json = r#"{"time": ["2024-01-01", "2024-01-02"], "precipitation_sum": [1.0]}"#;
        let data: DailyData = serde_json::from_str(json).unwrap();
        let records = data.into_records();
        assert_eq!(records[1].precipitation, None);
    }

    #[test]
    fn test_client_trims_base_urls() {
        let config = WeatherConfig {
            archive_base_url: "https://archive.example/v1/".to_string(),
            ..WeatherConfig::default()
        };
        let client = OpenMeteoClient::new(&config).unwrap();
        assert_eq!(client.archive_base_url, "https://archive.example/v1");
    }
}
