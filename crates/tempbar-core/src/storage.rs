//! Settings stores provided by the host.

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{ConfigError, StorageError};
use crate::plugin::SettingsStore;

const DATA_FILE: &str = "data.json";

/// Stores the settings record as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/tempbar/data.json`
    pub fn default_location() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("tempbar");

        Ok(Self::new(config_dir.join(DATA_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for JsonFileStore {
    async fn load(&self) -> Result<Option<Value>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No saved settings at {:?}", self.path);
                return Ok(None);
            }
            Err(e) => return Err(StorageError::ReadFailed(e.to_string()).into()),
        };

        if contents.trim().is_empty() {
            return Ok(None);
        }

        let data = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        tracing::debug!("Loaded settings from {:?}", self.path);
        Ok(Some(data))
    }

    async fn save(&self, data: &Value) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        }

        let contents =
            serde_json::to_string_pretty(data).context("Failed to serialize settings")?;

        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        tracing::debug!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

/// In-memory store for embedding hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<Option<Value>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: Value) -> Self {
        Self {
            data: Mutex::new(Some(data)),
            saves: AtomicUsize::new(0),
        }
    }

    /// The last saved record
    pub fn snapshot(&self) -> Option<Value> {
        self.data.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn load(&self) -> Result<Option<Value>> {
        Ok(self.snapshot())
    }

    async fn save(&self, data: &Value) -> Result<()> {
        *self.data.lock() = Some(data.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
