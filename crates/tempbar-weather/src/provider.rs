//! Open-Meteo current temperature client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;
use url::Url;

use crate::types::{Coordinates, TemperatureReading, WeatherError};

pub const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com";
const FORECAST_PATH: &str = "v1/forecast";
const CURRENT_VARIABLE: &str = "temperature_2m";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("tempbar/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: Option<f64>,
}

/// Body Open-Meteo sends with 4xx answers
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    reason: String,
}

/// Anything that can produce the current temperature for a coordinate.
#[async_trait]
pub trait TemperatureSource: Send + Sync {
    /// Current air temperature at 2 m, degrees Celsius.
    async fn current_temperature(&self, latitude: f64, longitude: f64)
        -> Result<f64, WeatherError>;

    async fn fetch_reading(
        &self,
        location: Coordinates,
    ) -> Result<TemperatureReading, WeatherError> {
        let celsius = self
            .current_temperature(location.latitude, location.longitude)
            .await?;
        Ok(TemperatureReading::new(celsius, location))
    }
}

/// Stateless client for the Open-Meteo forecast endpoint.
///
/// Coordinates are passed through unchecked; the provider rejects values
/// outside the valid ranges. No retries.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Arc<Client>,
    forecast_url: Url,
}

impl WeatherClient {
    pub fn new() -> Result<Self, WeatherError> {
        Self::with_base_url(OPEN_METEO_BASE_URL)
    }

    /// Point the client at another Open-Meteo compatible host.
    pub fn with_base_url(base_url: &str) -> Result<Self, WeatherError> {
        let forecast_url = forecast_url(base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            forecast_url,
        })
    }

    pub fn forecast_url(&self) -> &Url {
        &self.forecast_url
    }

    /// Fetch the current temperature for a coordinate.
    #[instrument(skip(self), level = "debug")]
    pub async fn current_temperature(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<f64, WeatherError> {
        let response = self
            .client
            .get(self.forecast_url.clone())
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_VARIABLE.to_string()),
            ])
            .send()
            .await?;

        let status_error = response.error_for_status_ref().err();
        if let Some(err) = status_error {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.reason)
                .unwrap_or(body);
            tracing::warn!("Open-Meteo returned status {}: {}", status, reason);
            return Err(WeatherError::Network(err));
        }

        let body = response.text().await?;
        let celsius = parse_current_temperature(&body)?;

        tracing::debug!("Current temperature at {}, {}: {}", latitude, longitude, celsius);
        Ok(celsius)
    }
}

#[async_trait]
impl TemperatureSource for WeatherClient {
    async fn current_temperature(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<f64, WeatherError> {
        WeatherClient::current_temperature(self, latitude, longitude).await
    }
}

fn forecast_url(base_url: &str) -> Result<Url, WeatherError> {
    let url = Url::parse(&format!("{}/{}", base_url.trim_end_matches('/'), FORECAST_PATH))
        .map_err(|e| WeatherError::InvalidUrl(format!("{}: {}", base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(WeatherError::InvalidUrl(format!(
            "URL must use http or https scheme, got: {}",
            url.scheme()
        )));
    }

    Ok(url)
}

/// Pull `current.temperature_2m` out of a forecast response body.
fn parse_current_temperature(body: &str) -> Result<f64, WeatherError> {
    let parsed: ForecastResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::Provider(format!("malformed response: {}", e)))?;

    let current = parsed
        .current
        .ok_or_else(|| WeatherError::Provider("response has no current block".to_string()))?;

    current.temperature_2m.ok_or_else(|| {
        WeatherError::Provider(format!("current block has no {} value", CURRENT_VARIABLE))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_current_temperature() {
        let body = r#"{
            "latitude": 55.75,
            "longitude": 37.625,
            "current_units": { "time": "iso8601", "interval": "seconds", "temperature_2m": "°C" },
            "current": { "time": "2026-10-16T12:00", "interval": 900, "temperature_2m": 21.34 }
        }"#;
        assert_eq!(parse_current_temperature(body).unwrap(), 21.34);
    }

    #[test]
    fn test_missing_current_block_is_provider_error() {
        let err = parse_current_temperature(r#"{ "latitude": 55.75 }"#).unwrap_err();
        assert!(matches!(err, WeatherError::Provider(ref m) if m.contains("no current block")));
    }

    #[test]
    fn test_missing_value_is_provider_error() {
        for body in [
            r#"{ "current": { "time": "2026-10-16T12:00" } }"#,
            r#"{ "current": { "temperature_2m": null } }"#,
        ] {
            let err = parse_current_temperature(body).unwrap_err();
            assert!(matches!(err, WeatherError::Provider(_)), "{}", body);
        }
    }

    #[test]
    fn test_garbage_body_is_provider_error() {
        let err = parse_current_temperature("<html>oops</html>").unwrap_err();
        assert!(matches!(err, WeatherError::Provider(ref m) if m.contains("malformed")));
    }

    #[test]
    fn test_forecast_url() {
        assert_eq!(
            forecast_url(OPEN_METEO_BASE_URL).unwrap().as_str(),
            "https://api.open-meteo.com/v1/forecast"
        );
        assert_eq!(
            forecast_url("http://localhost:8080/").unwrap().as_str(),
            "http://localhost:8080/v1/forecast"
        );
        assert!(matches!(
            forecast_url("ftp://example.com"),
            Err(WeatherError::InvalidUrl(_))
        ));
        assert!(matches!(forecast_url("not a url"), Err(WeatherError::InvalidUrl(_))));
    }
}
