//! Minimal terminal host for the weather status plugin.
//!
//! The status line is printed to stdout and the settings pane is driven by
//! `key=value` lines on stdin.

use anyhow::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use tempbar_core::{
    App, JsonFileStore, SettingKey, SettingsCallback, SettingsForm, SettingsTab, StatusSurface,
};
use tempbar_status::{settings_tab, WeatherStatusPlugin};
use tokio::io::{AsyncBufReadExt, BufReader};

const DATA_PATH_ENV: &str = "TEMPBAR_DATA_PATH";

struct TerminalStatus;

impl StatusSurface for TerminalStatus {
    fn set_text(&self, text: &str) {
        println!("[status] {}", text);
    }
}

#[derive(Default)]
struct ConsoleSettingsForm {
    on_change: Mutex<Option<SettingsCallback>>,
}

impl ConsoleSettingsForm {
    fn edit(&self, key: SettingKey, value: String) {
        match self.on_change.lock().as_ref() {
            Some(on_change) => on_change(key, value),
            None => println!("Settings are not available yet"),
        }
    }
}

impl SettingsForm for ConsoleSettingsForm {
    fn render(&self, tab: SettingsTab, on_change: SettingsCallback) {
        print_tab(&tab);
        *self.on_change.lock() = Some(on_change);
    }
}

fn print_tab(tab: &SettingsTab) {
    println!("{} settings:", tab.title);
    for field in &tab.fields {
        println!(
            "  {}={}    # {}. {}",
            field.key, field.value, field.name, field.description
        );
    }
}

/// Returns false when the host should shut down.
async fn handle_command(
    line: &str,
    form: &ConsoleSettingsForm,
    plugin: &WeatherStatusPlugin,
) -> bool {
    match line.trim() {
        "" => {}
        "quit" | "exit" => return false,
        "refresh" => {
            if let Err(e) = plugin.controller().refresh_now().await {
                println!("Refresh failed: {}", e);
            }
        }
        "settings" => print_tab(&settings_tab(&plugin.controller().settings())),
        "help" => print_help(),
        command => match line.split_once('=') {
            Some((key, value)) => match key.parse::<SettingKey>() {
                Ok(key) => form.edit(key, value.to_string()),
                Err(e) => println!("{}", e),
            },
            None => println!("Unknown command: {} (try `help`)", command),
        },
    }
    true
}

fn print_help() {
    println!("Commands:");
    println!("  latitude=<degrees>              set latitude");
    println!("  longitude=<degrees>             set longitude");
    println!("  updateIntervalSeconds=<secs>    set refresh interval");
    println!("  settings | refresh | quit");
}

#[tokio::main]
async fn main() -> Result<()> {
    tempbar_core::init()?;

    let store = match std::env::var_os(DATA_PATH_ENV) {
        Some(path) => JsonFileStore::new(path),
        None => JsonFileStore::default_location()?,
    };
    tracing::info!("Settings file: {}", store.path().display());

    let form = Arc::new(ConsoleSettingsForm::default());
    let mut app = App::new(Arc::new(store), Arc::new(TerminalStatus), form.clone());

    let plugin = Arc::new(WeatherStatusPlugin::with_open_meteo(app.context())?);
    app.register_plugin(plugin.clone());
    app.start().await?;
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => match line? {
                Some(line) => {
                    if !handle_command(&line, &form, &plugin).await {
                        break;
                    }
                }
                None => {
                    // stdin closed; keep the status line running until ctrl-c
                    tokio::signal::ctrl_c().await?;
                    break;
                }
            },
        }
    }

    app.stop().await?;
    Ok(())
}
