//! Contracts between the host runtime and plugins.
//!
//! The host owns storage, the status line, the settings pane and timer
//! cleanup; plugins receive them as capabilities through [`PluginContext`].

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::config::SettingKey;
use crate::timers::TimerRegistry;

/// Plugin lifecycle driven by the host.
#[async_trait]
pub trait PluginProvider: Send + Sync {
    /// Unique identifier for this plugin
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Called once when the host loads the plugin
    async fn start(&self) -> Result<()>;

    /// Called once when the host unloads the plugin
    async fn stop(&self) -> Result<()>;
}

/// Host-provided persistence for a plugin's settings record.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns whatever was saved last, or `None` on first run.
    async fn load(&self) -> Result<Option<Value>>;

    async fn save(&self, data: &Value) -> Result<()>;
}

/// A persistent single-line display surface.
pub trait StatusSurface: Send + Sync {
    fn set_text(&self, text: &str);
}

/// One editable text field in a settings pane.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDescriptor {
    pub key: SettingKey,
    pub name: &'static str,
    pub description: &'static str,
    pub placeholder: &'static str,
    /// Current raw value
    pub value: String,
}

/// A plugin's settings pane.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsTab {
    pub title: String,
    pub fields: Vec<SettingDescriptor>,
}

impl SettingsTab {
    pub fn field(&self, key: SettingKey) -> Option<&SettingDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// Invoked by the host with the field key and new raw text on every edit.
pub type SettingsCallback = Arc<dyn Fn(SettingKey, String) + Send + Sync>;

/// Host facility that presents a settings pane.
pub trait SettingsForm: Send + Sync {
    fn render(&self, tab: SettingsTab, on_change: SettingsCallback);
}

/// Capabilities handed to plugins at construction
#[derive(Clone)]
pub struct PluginContext {
    pub store: Arc<dyn SettingsStore>,
    pub status: Arc<dyn StatusSurface>,
    pub timers: Arc<dyn TimerRegistry>,
    pub settings_form: Arc<dyn SettingsForm>,
}

impl PluginContext {
    pub fn new(
        store: Arc<dyn SettingsStore>,
        status: Arc<dyn StatusSurface>,
        timers: Arc<dyn TimerRegistry>,
        settings_form: Arc<dyn SettingsForm>,
    ) -> Self {
        Self {
            store,
            status,
            timers,
            settings_form,
        }
    }
}
