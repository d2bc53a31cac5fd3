use anyhow::Result;
use std::sync::Arc;

use crate::plugin::{PluginContext, PluginProvider, SettingsForm, SettingsStore, StatusSurface};
use crate::timers::ManagedTimers;

/// Host application state and plugin lifecycle manager
pub struct App {
    timers: Arc<ManagedTimers>,
    plugins: Vec<Arc<dyn PluginProvider>>,
    context: PluginContext,
}

impl App {
    /// Create a host around the given capabilities
    pub fn new(
        store: Arc<dyn SettingsStore>,
        status: Arc<dyn StatusSurface>,
        settings_form: Arc<dyn SettingsForm>,
    ) -> Self {
        let timers = Arc::new(ManagedTimers::new());
        let context = PluginContext::new(store, status, timers.clone(), settings_form);

        Self {
            timers,
            plugins: Vec::new(),
            context,
        }
    }

    /// Capabilities to hand to a plugin under construction
    pub fn context(&self) -> PluginContext {
        self.context.clone()
    }

    /// Register a plugin with the application
    pub fn register_plugin(&mut self, plugin: Arc<dyn PluginProvider>) {
        tracing::info!("Registering plugin: {}", plugin.name());
        self.plugins.push(plugin);
    }

    /// Start all registered plugins in registration order
    pub async fn start(&self) -> Result<()> {
        tracing::info!("Starting application with {} plugins", self.plugins.len());

        for plugin in &self.plugins {
            tracing::debug!("Starting plugin: {}", plugin.id());
            plugin.start().await?;
        }

        tracing::info!("Application started");
        Ok(())
    }

    /// Stop all plugins in reverse order, then release every managed timer
    pub async fn stop(&self) -> Result<()> {
        tracing::info!("Shutting down application");

        for plugin in self.plugins.iter().rev() {
            tracing::debug!("Stopping plugin: {}", plugin.id());
            if let Err(e) = plugin.stop().await {
                tracing::error!("Error stopping plugin {}: {}", plugin.name(), e);
            }
        }

        let released = self.timers.release_all();
        if released > 0 {
            tracing::debug!("Released {} timers left running by plugins", released);
        }

        Ok(())
    }

    pub fn timers(&self) -> &ManagedTimers {
        &self.timers
    }

    /// Get list of all registered plugins
    pub fn plugins(&self) -> &[Arc<dyn PluginProvider>] {
        &self.plugins
    }
}
