use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use tracing::warn;

use crate::theme::Theme;

pub const DEFAULT_API_URL: &str = "https://6799e5a0747b09cdcccce6fe.mockapi.io/api";
pub const SETTINGS_FILE: &str = "events.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub api_url: String,
    pub page_size: u32,
    pub debounce_ms: u64,
    pub min_query_len: usize,
    pub scroll_threshold_px: f64,
    pub request_timeout_secs: u64,
    pub theme: Theme,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            page_size: 10,
            debounce_ms: 300,
            min_query_len: 3,
            scroll_threshold_px: 10.0,
            request_timeout_secs: 15,
            theme: Theme::Light,
        }
    }
}

impl ClientSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Defaults, then `events.toml` in the working directory, then environment.
pub fn load_settings() -> ClientSettings {
    let settings = load_settings_file(Path::new(SETTINGS_FILE));
    apply_env_overrides(settings, |key| std::env::var(key).ok())
}

pub fn load_settings_file(path: &Path) -> ClientSettings {
    let Ok(raw) = fs::read_to_string(path) else {
        return ClientSettings::default();
    };
    match toml::from_str::<ClientSettings>(&raw) {
        Ok(settings) => settings,
        Err(error) => {
            warn!(path = %path.display(), %error, "ignoring unreadable settings file");
            ClientSettings::default()
        }
    }
}

pub fn apply_env_overrides(
    mut settings: ClientSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    if let Some(v) = lookup("EVENTS_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = lookup("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = lookup("APP__PAGE_SIZE").and_then(|v| v.parse().ok()) {
        settings.page_size = v;
    }
    if let Some(v) = lookup("APP__DEBOUNCE_MS").and_then(|v| v.parse().ok()) {
        settings.debounce_ms = v;
    }
    if let Some(v) = lookup("APP__MIN_QUERY_LEN").and_then(|v| v.parse().ok()) {
        settings.min_query_len = v;
    }
    if let Some(v) = lookup("APP__SCROLL_THRESHOLD_PX").and_then(|v| v.parse().ok()) {
        settings.scroll_threshold_px = v;
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = lookup("APP__THEME").and_then(|v| v.parse().ok()) {
        settings.theme = v;
    }

    settings
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    #[test]
    fn settings_file_overrides_only_present_keys() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("events_settings_test_{suffix}.toml"));
        fs::write(&path, "api_url = \"http://127.0.0.1:9000\"\npage_size = 15\n")
            .expect("write settings");

        let settings = load_settings_file(&path);
        assert_eq!(settings.api_url, "http://127.0.0.1:9000");
        assert_eq!(settings.page_size, 15);
        assert_eq!(settings.debounce_ms, 300);

        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn missing_settings_file_yields_defaults() {
        let settings = load_settings_file(Path::new("/nonexistent/events.toml"));
        assert_eq!(settings, ClientSettings::default());
    }

    #[test]
    fn env_overrides_win_and_bad_numbers_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("EVENTS_API_URL", "http://legacy"),
            ("APP__API_URL", "http://preferred"),
            ("APP__PAGE_SIZE", "not-a-number"),
            ("APP__DEBOUNCE_MS", "50"),
            ("APP__THEME", "dark"),
        ]);
        let settings = apply_env_overrides(ClientSettings::default(), |key| {
            env.get(key).map(|v| v.to_string())
        });

        assert_eq!(settings.api_url, "http://preferred");
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.debounce(), Duration::from_millis(50));
        assert_eq!(settings.theme, Theme::Dark);
    }
}
