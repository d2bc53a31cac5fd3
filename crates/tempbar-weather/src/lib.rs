//! Current temperature lookups for tempbar
//!
//! Wraps the Open-Meteo forecast API, which needs no API key.

pub mod provider;
pub mod types;

pub use provider::{TemperatureSource, WeatherClient, OPEN_METEO_BASE_URL};
pub use types::*;
