use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// 1 hour
pub const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 3600;

// Moscow
pub const DEFAULT_LATITUDE: &str = "55.7522";
pub const DEFAULT_LONGITUDE: &str = "37.6156";

/// Longest refresh interval that will be scheduled (one leap year).
pub const MAX_UPDATE_INTERVAL_SECS: u64 = 366 * 24 * 3600;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of settings validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Names of the editable settings fields.
///
/// `as_str` yields the key used both in the persisted record and in
/// settings form callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    UpdateInterval,
    Latitude,
    Longitude,
}

impl SettingKey {
    pub const ALL: [SettingKey; 3] = [
        SettingKey::Latitude,
        SettingKey::Longitude,
        SettingKey::UpdateInterval,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpdateInterval => "updateIntervalSeconds",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = ConfigParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "updateIntervalSeconds" | "interval" => Ok(Self::UpdateInterval),
            "latitude" | "lat" => Ok(Self::Latitude),
            "longitude" | "lon" => Ok(Self::Longitude),
            other => Err(ConfigParseError::UnknownField(other.to_string())),
        }
    }
}

/// Failure to turn a raw settings text into a usable value.
///
/// Always recovered locally: an unusable interval means no schedule, an
/// unusable coordinate means the refresh cycle is skipped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigParseError {
    #[error("{field} is empty")]
    Empty { field: SettingKey },

    #[error("{field} is not a valid number: {value:?}")]
    NotANumber { field: SettingKey, value: String },

    #[error("{field} is out of range: {value:?}")]
    OutOfRange { field: SettingKey, value: String },

    #[error("unknown settings field: {0}")]
    UnknownField(String),
}

/// Persisted plugin settings.
///
/// Every field is kept as the exact text the user typed. Parsing happens
/// only where a value is used, never when it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSettings {
    /// Refresh interval in whole seconds
    pub update_interval_seconds: String,

    /// Decimal degrees
    pub latitude: String,

    /// Decimal degrees
    pub longitude: String,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            update_interval_seconds: DEFAULT_UPDATE_INTERVAL_SECS.to_string(),
            latitude: DEFAULT_LATITUDE.to_string(),
            longitude: DEFAULT_LONGITUDE.to_string(),
        }
    }
}

impl WeatherSettings {
    /// Merge persisted data over the defaults, field by field.
    ///
    /// Missing fields keep their default. Fields holding something other
    /// than a string or number are ignored with a warning, as is a
    /// persisted blob that is not a JSON object.
    pub fn from_persisted(data: Option<&Value>) -> Self {
        let mut settings = Self::default();

        let Some(data) = data else {
            return settings;
        };

        let Some(object) = data.as_object() else {
            if !data.is_null() {
                tracing::warn!("Persisted settings are not an object, using defaults");
            }
            return settings;
        };

        for key in SettingKey::ALL {
            match object.get(key.as_str()) {
                None | Some(Value::Null) => {}
                Some(Value::String(s)) => settings.set(key, s.clone()),
                Some(Value::Number(n)) => settings.set(key, n.to_string()),
                Some(other) => {
                    tracing::warn!("Ignoring persisted {}: unexpected value {}", key, other);
                }
            }
        }

        settings
    }

    /// The full record in its persisted form.
    pub fn to_persisted(&self) -> Value {
        let mut record = serde_json::Map::new();
        for key in SettingKey::ALL {
            record.insert(key.as_str().to_string(), Value::String(self.get(key).to_string()));
        }
        Value::Object(record)
    }

    pub fn get(&self, key: SettingKey) -> &str {
        match key {
            SettingKey::UpdateInterval => &self.update_interval_seconds,
            SettingKey::Latitude => &self.latitude,
            SettingKey::Longitude => &self.longitude,
        }
    }

    pub fn set(&mut self, key: SettingKey, value: String) {
        match key {
            SettingKey::UpdateInterval => self.update_interval_seconds = value,
            SettingKey::Latitude => self.latitude = value,
            SettingKey::Longitude => self.longitude = value,
        }
    }

    /// Parse the refresh interval as positive whole seconds.
    pub fn interval_seconds(&self) -> Result<u64, ConfigParseError> {
        parse_interval(&self.update_interval_seconds)
    }

    pub fn update_interval(&self) -> Result<Duration, ConfigParseError> {
        self.interval_seconds().map(Duration::from_secs)
    }

    /// Parse `(latitude, longitude)` as finite decimal degrees.
    ///
    /// No range check happens here; the provider rejects impossible values.
    pub fn coordinates(&self) -> Result<(f64, f64), ConfigParseError> {
        let latitude = parse_degrees(SettingKey::Latitude, &self.latitude)?;
        let longitude = parse_degrees(SettingKey::Longitude, &self.longitude)?;
        Ok((latitude, longitude))
    }

    /// Validate the settings for logging purposes.
    ///
    /// Nothing is rejected on edit; this only reports what will be skipped
    /// or passed through as-is.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        match self.interval_seconds() {
            Ok(secs) if secs > 24 * 3600 => {
                result.add_warning(
                    SettingKey::UpdateInterval.as_str(),
                    "Refresh interval is more than 24 hours",
                );
            }
            Ok(_) => {}
            Err(e) => result.add_error(SettingKey::UpdateInterval.as_str(), e.to_string()),
        }

        for (key, limit) in [(SettingKey::Latitude, 90.0), (SettingKey::Longitude, 180.0)] {
            match parse_degrees(key, self.get(key)) {
                Ok(degrees) if degrees.abs() > limit => {
                    result.add_warning(
                        key.as_str(),
                        format!("Value {} is outside -{}..{}", degrees, limit, limit),
                    );
                }
                Ok(_) => {}
                Err(e) => result.add_error(key.as_str(), e.to_string()),
            }
        }

        result
    }
}

/// Parse an interval text as positive whole seconds.
pub fn parse_interval(raw: &str) -> Result<u64, ConfigParseError> {
    let field = SettingKey::UpdateInterval;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigParseError::Empty { field });
    }

    let secs: u64 = trimmed.parse().map_err(|_| {
        // "-5" is a number, just not a usable interval
        if trimmed.parse::<i64>().is_ok() {
            ConfigParseError::OutOfRange {
                field,
                value: raw.to_string(),
            }
        } else {
            ConfigParseError::NotANumber {
                field,
                value: raw.to_string(),
            }
        }
    })?;

    if secs == 0 || secs > MAX_UPDATE_INTERVAL_SECS {
        return Err(ConfigParseError::OutOfRange {
            field,
            value: raw.to_string(),
        });
    }

    Ok(secs)
}

fn parse_degrees(field: SettingKey, raw: &str) -> Result<f64, ConfigParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigParseError::Empty { field });
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ConfigParseError::NotANumber {
            field,
            value: raw.to_string(),
        }),
    }
}
