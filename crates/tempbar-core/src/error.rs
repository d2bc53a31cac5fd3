//! Centralized error types for tempbar.
//!
//! Every crate-local error converts into [`AppError`], which carries a
//! `user_message()` suitable for a settings pane or notification. The
//! status line itself never shows error text.

use thiserror::Error;

use crate::config::ConfigParseError;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Storage(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => {
                "The request was rejected. Check your coordinates."
            }
        }
    }
}

/// Settings errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid setting: {0}")]
    Invalid(#[from] ConfigParseError),

    #[error("Settings parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid setting. Check your settings.",
            ConfigError::ParseError(_) => "Saved settings are malformed. Using defaults.",
        }
    }
}

/// Settings persistence errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read settings: {0}")]
    ReadFailed(String),

    #[error("Failed to write settings: {0}")]
    WriteFailed(String),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::ReadFailed(_) => "Saved settings could not be read. Using defaults.",
            StorageError::WriteFailed(_) => "Settings could not be saved. Please try again.",
        }
    }
}

/// Weather provider errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Weather API error: {0}")]
    ApiError(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::ApiError(_) => "Weather service returned no data. Please try again.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingKey;

    #[test]
    fn test_config_error_conversion() {
        let parse = ConfigParseError::Empty {
            field: SettingKey::Latitude,
        };
        let app_err: AppError = ConfigError::from(parse).into();
        assert!(matches!(app_err, AppError::Config(ConfigError::Invalid(_))));
        assert_eq!(app_err.user_message(), "Invalid setting. Check your settings.");
    }

    #[test]
    fn test_server_error_messages_depend_on_status() {
        let upstream = NetworkError::ServerError {
            status: 503,
            message: "down".into(),
        };
        let rejected = NetworkError::ServerError {
            status: 400,
            message: "bad latitude".into(),
        };
        assert_ne!(upstream.user_message(), rejected.user_message());
        assert!(upstream.to_string().contains("503"));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Weather(WeatherError::ApiError("no current block".into()));
        assert_eq!(
            app_err.user_message(),
            "Weather service returned no data. Please try again."
        );
    }
}
