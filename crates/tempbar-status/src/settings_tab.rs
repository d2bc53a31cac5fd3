use tempbar_core::{SettingDescriptor, SettingKey, SettingsTab, WeatherSettings};

pub const SETTINGS_TITLE: &str = "Weather";

/// Build the settings pane from the current values.
pub fn settings_tab(settings: &WeatherSettings) -> SettingsTab {
    let fields = SettingKey::ALL
        .into_iter()
        .map(|key| {
            let (name, description, placeholder) = field_text(key);
            SettingDescriptor {
                key,
                name,
                description,
                placeholder,
                value: settings.get(key).to_string(),
            }
        })
        .collect();

    SettingsTab {
        title: SETTINGS_TITLE.to_string(),
        fields,
    }
}

fn field_text(key: SettingKey) -> (&'static str, &'static str, &'static str) {
    match key {
        SettingKey::Latitude => (
            "Latitude",
            "Example: 55.7522",
            "Enter latitude (example: 55.7522)",
        ),
        SettingKey::Longitude => (
            "Longitude",
            "Example: 37.6156",
            "Enter longitude (example: 37.6156)",
        ),
        SettingKey::UpdateInterval => (
            "Update interval",
            "Seconds between refreshes. Example: 3600",
            "Enter interval in seconds (example: 3600)",
        ),
    }
}
