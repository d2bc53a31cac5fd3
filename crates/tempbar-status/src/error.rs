use tempbar_weather::WeatherError;
use thiserror::Error;

/// Errors surfaced by the refresh controller.
///
/// Settings parse problems never appear here; they only disable the
/// schedule or skip a cycle.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error("Failed to persist settings: {0}")]
    Persist(#[source] anyhow::Error),
}
