//! Scheduled refresh and settings reconciliation.
//!
//! [`RefreshController`] owns the settings record, the single refresh timer
//! and the fetch-and-render cycle. Host capabilities arrive through
//! [`PluginContext`]; nothing else reads or writes the settings or timer.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tempbar_core::config::parse_interval;
use tempbar_core::{
    AppError, ConfigParseError, PluginContext, SettingKey, SettingsCallback, WeatherSettings,
};
use tempbar_weather::{Coordinates, TemperatureReading, TemperatureSource, WeatherError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::StatusError;
use crate::settings_tab::settings_tab;
use crate::timer::ActiveTimer;

/// Whether a periodic refresh is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Stopped,
    Scheduled(Duration),
}

/// What a refresh cycle did.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// A reading was fetched and written to the status surface
    Rendered(TemperatureReading),
    /// The coordinates could not be parsed; nothing was fetched
    Skipped(ConfigParseError),
}

#[derive(Default)]
struct ControllerState {
    settings: WeatherSettings,
    timer: Option<ActiveTimer>,
    next_timer_id: u64,
    last_reading: Option<TemperatureReading>,
    edit_loop: Option<JoinHandle<()>>,
}

struct Inner {
    ctx: PluginContext,
    source: Arc<dyn TemperatureSource>,
    state: Mutex<ControllerState>,
}

/// Cheap-to-clone handle to the refresh controller.
#[derive(Clone)]
pub struct RefreshController {
    inner: Arc<Inner>,
}

impl RefreshController {
    pub fn new(ctx: PluginContext, source: Arc<dyn TemperatureSource>) -> Self {
        Self {
            inner: Arc::new(Inner {
                ctx,
                source,
                state: Mutex::new(ControllerState::default()),
            }),
        }
    }

    /// Load settings, schedule the timer, show the settings pane and
    /// refresh once.
    ///
    /// Returns the result of the immediate refresh. A failed refresh does
    /// not undo anything else `start` did.
    pub async fn start(&self) -> Result<RefreshOutcome, WeatherError> {
        let settings = self.inner.load_settings().await;
        let interval = settings.update_interval_seconds.clone();
        let tab = settings_tab(&settings);
        self.inner.state.lock().settings = settings;

        Inner::reconfigure(&self.inner, &interval);
        self.render_settings_form(tab);

        tracing::info!("Weather status started");
        self.inner.refresh_now().await
    }

    /// Cancel the refresh timer and stop accepting settings edits.
    pub fn stop(&self) {
        let (timer, edit_loop) = {
            let mut state = self.inner.state.lock();
            (state.timer.take(), state.edit_loop.take())
        };

        if let Some(timer) = timer {
            timer.cancel();
        }
        if let Some(edit_loop) = edit_loop {
            edit_loop.abort();
        }

        tracing::info!("Weather status stopped");
    }

    /// Replace the refresh timer with one firing every `interval` seconds.
    ///
    /// The old timer is always cancelled first. Text that is not a positive
    /// whole number of seconds leaves no timer running.
    pub fn reconfigure(&self, interval: &str) -> TimerState {
        Inner::reconfigure(&self.inner, interval)
    }

    /// Fetch the temperature for the configured coordinates and render it.
    pub async fn refresh_now(&self) -> Result<RefreshOutcome, WeatherError> {
        self.inner.refresh_now().await
    }

    /// Apply one settings edit: store it, persist the whole record,
    /// reschedule on interval edits, then refresh.
    pub async fn update_field(
        &self,
        key: SettingKey,
        value: impl Into<String>,
    ) -> Result<RefreshOutcome, StatusError> {
        Inner::update_field(&self.inner, key, value.into()).await
    }

    pub fn settings(&self) -> WeatherSettings {
        self.inner.state.lock().settings.clone()
    }

    pub fn timer_state(&self) -> TimerState {
        self.inner.timer_state()
    }

    pub fn last_reading(&self) -> Option<TemperatureReading> {
        self.inner.state.lock().last_reading
    }

    /// Hand the settings pane to the host. Edits are queued and applied one
    /// at a time in arrival order.
    fn render_settings_form(&self, tab: tempbar_core::SettingsTab) {
        let (tx, mut rx) = mpsc::unbounded_channel::<(SettingKey, String)>();
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);

        let edit_loop = tokio::spawn(async move {
            while let Some((key, value)) = rx.recv().await {
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                if let Err(e) = Inner::update_field(&inner, key, value).await {
                    let app_err = AppError::from(e);
                    tracing::warn!(
                        "Settings edit to {} incomplete: {} ({})",
                        key,
                        app_err,
                        app_err.user_message()
                    );
                }
            }
        });

        if let Some(previous) = self.inner.state.lock().edit_loop.replace(edit_loop) {
            previous.abort();
        }

        let on_change: SettingsCallback = Arc::new(move |key, value| {
            if tx.send((key, value)).is_err() {
                tracing::debug!("Ignoring settings edit to {} after stop", key);
            }
        });

        self.inner.ctx.settings_form.render(tab, on_change);
    }
}

impl Inner {
    async fn load_settings(&self) -> WeatherSettings {
        let persisted = match self.ctx.store.load().await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Failed to load saved settings, using defaults: {}", e);
                None
            }
        };

        let settings = WeatherSettings::from_persisted(persisted.as_ref());

        let validation = settings.validate();
        for error in &validation.errors {
            tracing::warn!("Settings problem: {}", error);
        }
        for warning in &validation.warnings {
            tracing::warn!("Settings warning: {}", warning);
        }

        settings
    }

    fn timer_state(&self) -> TimerState {
        match &self.state.lock().timer {
            Some(timer) if timer.is_active() => TimerState::Scheduled(timer.period()),
            _ => TimerState::Stopped,
        }
    }

    fn reconfigure(this: &Arc<Self>, interval: &str) -> TimerState {
        let mut state = this.state.lock();

        if let Some(old) = state.timer.take() {
            old.cancel();
        }

        let period = match parse_interval(interval) {
            Ok(secs) => Duration::from_secs(secs),
            Err(e) => {
                tracing::debug!("No refresh schedule: {}", e);
                return TimerState::Stopped;
            }
        };

        state.next_timer_id += 1;
        let id = state.next_timer_id;
        let weak = Arc::downgrade(this);

        let timer = ActiveTimer::spawn(id, period, move || {
            let weak = weak.clone();
            async move {
                let Some(inner) = weak.upgrade() else {
                    return false;
                };
                tracing::debug!("Refresh timer #{} tick", id);
                // Failures are logged by refresh_now and never stop the timer
                let _ = inner.refresh_now().await;
                true
            }
        });

        let Some(timer) = timer else {
            return TimerState::Stopped;
        };

        this.ctx.timers.register_timer(timer.managed());
        tracing::info!("Refreshing weather every {:?}", period);
        state.timer = Some(timer);

        TimerState::Scheduled(period)
    }

    async fn refresh_now(&self) -> Result<RefreshOutcome, WeatherError> {
        let coordinates = self.state.lock().settings.coordinates();
        let (latitude, longitude) = match coordinates {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Skipping weather refresh: {}", e);
                return Ok(RefreshOutcome::Skipped(e));
            }
        };

        let reading = match self
            .source
            .fetch_reading(Coordinates::new(latitude, longitude))
            .await
        {
            Ok(reading) => reading,
            Err(e) => {
                tracing::warn!("Weather refresh failed: {}", e);
                return Err(e);
            }
        };

        self.ctx.status.set_text(&reading.status_text());
        self.state.lock().last_reading = Some(reading);

        Ok(RefreshOutcome::Rendered(reading))
    }

    async fn update_field(
        this: &Arc<Self>,
        key: SettingKey,
        value: String,
    ) -> Result<RefreshOutcome, StatusError> {
        let record = {
            let mut state = this.state.lock();
            state.settings.set(key, value.clone());
            state.settings.to_persisted()
        };
        tracing::debug!("Setting {} = {:?}", key, value);

        let persisted = this.ctx.store.save(&record).await;
        if let Err(e) = &persisted {
            tracing::warn!("Failed to save settings: {}", e);
        }

        if key == SettingKey::UpdateInterval {
            Self::reconfigure(this, &value);
        }

        let outcome = this.refresh_now().await;

        persisted.map_err(StatusError::Persist)?;
        Ok(outcome?)
    }
}
