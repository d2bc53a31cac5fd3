//! Maps status errors to tempbar_core::AppError for consistent user-facing messages.

use tempbar_core::{AppError, ConfigError, ReqwestErrorExt, StorageError};
use tempbar_weather::WeatherError;

use crate::error::StatusError;

impl From<StatusError> for AppError {
    fn from(e: StatusError) -> Self {
        match e {
            StatusError::Weather(WeatherError::Network(e)) => {
                AppError::Network(e.into_network_error())
            }
            StatusError::Weather(WeatherError::Provider(msg)) => {
                AppError::Weather(tempbar_core::WeatherError::ApiError(msg))
            }
            StatusError::Weather(WeatherError::InvalidUrl(msg)) => {
                AppError::Config(ConfigError::ParseError(msg))
            }
            StatusError::Persist(e) => match e.downcast::<StorageError>() {
                Ok(storage) => AppError::Storage(storage),
                Err(other) => AppError::Other(other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_maps_to_weather() {
        let app_err: AppError = StatusError::Weather(WeatherError::Provider("empty".into())).into();
        assert!(matches!(app_err, AppError::Weather(_)));
        assert_eq!(
            app_err.user_message(),
            "Weather service returned no data. Please try again."
        );
    }

    #[test]
    fn test_storage_failure_keeps_its_type() {
        let persist = StatusError::Persist(StorageError::WriteFailed("disk full".into()).into());
        let app_err: AppError = persist.into();
        assert!(matches!(app_err, AppError::Storage(StorageError::WriteFailed(_))));
    }

    #[test]
    fn test_other_persist_failure_is_generic() {
        let persist = StatusError::Persist(anyhow::anyhow!("host refused"));
        let app_err: AppError = persist.into();
        assert!(matches!(app_err, AppError::Other(_)));
        assert!(app_err.to_string().contains("host refused"));
    }
}
