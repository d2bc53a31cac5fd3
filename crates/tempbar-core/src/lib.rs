pub mod app;
pub mod config;
pub mod error;
pub mod plugin;
pub mod storage;
pub mod timers;

pub use app::App;
pub use config::{
    ConfigParseError, SettingKey, ValidationResult, WeatherSettings,
    DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_UPDATE_INTERVAL_SECS,
};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt, StorageError, WeatherError};
pub use plugin::{
    PluginContext, PluginProvider, SettingDescriptor, SettingsCallback, SettingsForm,
    SettingsStore, SettingsTab, StatusSurface,
};
pub use storage::{JsonFileStore, MemoryStore};
pub use timers::{ManagedTimer, ManagedTimers, TimerRegistry};

use anyhow::Result;

/// Initialize logging for the host process.
///
/// Reads the filter from `RUST_LOG`, defaulting to `info`. Safe to call more
/// than once; later calls are no-ops.
pub fn init() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    tracing::info!("Tempbar core initialized");
    Ok(())
}
