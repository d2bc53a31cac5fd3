use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use tempbar_core::{PluginContext, PluginProvider};
use tempbar_weather::{TemperatureSource, WeatherClient, WeatherError};

use crate::controller::RefreshController;

pub const PLUGIN_ID: &str = "tempbar-weather";
pub const PLUGIN_NAME: &str = "Weather status";

/// Status line plugin showing the current temperature.
pub struct WeatherStatusPlugin {
    controller: RefreshController,
}

impl WeatherStatusPlugin {
    pub fn new(ctx: PluginContext, source: Arc<dyn TemperatureSource>) -> Self {
        Self {
            controller: RefreshController::new(ctx, source),
        }
    }

    /// Plugin backed by the public Open-Meteo API
    pub fn with_open_meteo(ctx: PluginContext) -> Result<Self, WeatherError> {
        Ok(Self::new(ctx, Arc::new(WeatherClient::new()?)))
    }

    pub fn controller(&self) -> &RefreshController {
        &self.controller
    }
}

#[async_trait]
impl PluginProvider for WeatherStatusPlugin {
    fn id(&self) -> &str {
        PLUGIN_ID
    }

    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    async fn start(&self) -> Result<()> {
        // The first reading failing must not keep the host from loading us
        if let Err(e) = self.controller.start().await {
            tracing::debug!("Initial weather refresh failed: {}", e);
        }
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.controller.stop();
        Ok(())
    }
}
