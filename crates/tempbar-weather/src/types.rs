use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// One current-temperature observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    /// Air temperature 2 m above ground, degrees Celsius
    pub celsius: f64,
    pub location: Coordinates,
    pub fetched_at: DateTime<Utc>,
}

impl TemperatureReading {
    pub fn new(celsius: f64, location: Coordinates) -> Self {
        Self {
            celsius,
            location,
            fetched_at: Utc::now(),
        }
    }

    /// Status line text, rounded to one decimal
    pub fn status_text(&self) -> String {
        format!("Current temperature: {:.1}°C", self.celsius)
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// The request could not be completed (timeout, DNS, connect, non-2xx)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered, but without a usable current temperature
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Invalid provider URL: {0}")]
    InvalidUrl(String),
}

impl WeatherError {
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text_rounds_to_one_decimal() {
        let location = Coordinates::new(55.7522, 37.6156);
        assert_eq!(
            TemperatureReading::new(21.34, location).status_text(),
            "Current temperature: 21.3°C"
        );
        assert_eq!(
            TemperatureReading::new(-0.06, location).status_text(),
            "Current temperature: -0.1°C"
        );
        assert_eq!(
            TemperatureReading::new(5.0, location).status_text(),
            "Current temperature: 5.0°C"
        );
    }

    #[test]
    fn test_coordinates_display() {
        assert_eq!(Coordinates::new(10.0, -0.5).to_string(), "10, -0.5");
    }

    #[test]
    fn test_provider_error_is_not_network() {
        assert!(!WeatherError::Provider("empty".into()).is_network());
    }
}
