//! Temperature status line plugin
//!
//! Keeps one refresh timer running against the configured interval, shows
//! the latest reading on the host's status surface and reconciles edits
//! from the settings pane.

pub mod controller;
pub mod error;
mod error_mapping;
pub mod plugin;
pub mod settings_tab;
pub mod timer;

pub use controller::{RefreshController, RefreshOutcome, TimerState};
pub use error::StatusError;
pub use plugin::{WeatherStatusPlugin, PLUGIN_ID, PLUGIN_NAME};
pub use settings_tab::settings_tab;
pub use timer::ActiveTimer;
