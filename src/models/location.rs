//! Location model for geographic coordinates and metadata

use serde::{Deserialize, Serialize};

/// A resolved place
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Location name (city, region, etc.)
    pub name: String,
    /// Full display address, most specific part first
    pub address: String,
    /// Country name
    pub country: Option<String>,
}

impl Location {
    /// Create a new location whose address is just its name
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: String) -> Self {
        Self {
            latitude,
            longitude,
            address: name.clone(),
            name,
            country: None,
        }
    }

    /// Create location with a display address and country
    #[must_use]
    pub fn with_address(
        latitude: f64,
        longitude: f64,
        name: String,
        address: String,
        country: Option<String>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            name,
            address,
            country,
        }
    }

    /// Country name, falling back to the last segment of the address
    #[must_use]
    pub fn country_name(&self) -> &str {
        match &self.country {
            Some(country) => country.as_str(),
            None => self
                .address
                .rsplit(',')
                .next()
                .map_or("", str::trim),
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Round a coordinate pair to `precision` decimal places for cache keys
#[must_use]
pub fn round_coordinates(latitude: f64, longitude: f64, precision: u32) -> (f64, f64) {
    let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
    let lat = (latitude * multiplier).round() / multiplier;
    let lon = (longitude * multiplier).round() / multiplier;
    (lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_coordinates() {
        let (lat, lon) = round_coordinates(46.818_234, 8.227_456, 2);
        assert_eq!(lat, 46.82);
        assert_eq!(lon, 8.23);
    }

    #[test]
    fn test_country_name_prefers_explicit_country() {
        let location = Location::with_address(
            10.06,
            76.63,
            "Kothamangalam".to_string(),
            "Kothamangalam, Ernakulam, Kerala, India".to_string(),
            Some("India".to_string()),
        );
        assert_eq!(location.country_name(), "India");
    }

    #[test]
    fn test_country_name_from_address() {
        let mut location = Location::new(48.85, 2.35, "Paris".to_string());
        location.address = "Paris, Ile-de-France, France".to_string();
        assert_eq!(location.country_name(), "France");
    }
}
