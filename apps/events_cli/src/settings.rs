use std::path::{Path, PathBuf};

use client_core::{
    config::{apply_env_overrides, load_settings_file, SETTINGS_FILE},
    ClientSettings, Theme,
};

/// Overrides given on the command line; they win over file and environment.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub page_size: Option<u32>,
    pub theme: Option<Theme>,
}

/// `--config`, else `./events.toml`, else `<config dir>/events/events.toml`.
pub fn settings_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(SETTINGS_FILE);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("events").join(SETTINGS_FILE))
        .filter(|path| path.exists())
}

pub fn resolve(
    path: Option<&Path>,
    overrides: CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let file = path.map(load_settings_file).unwrap_or_default();
    let mut settings = apply_env_overrides(file, env);

    if let Some(v) = overrides.api_url {
        settings.api_url = v;
    }
    if let Some(v) = overrides.page_size {
        settings.page_size = v;
    }
    if let Some(v) = overrides.theme {
        settings.theme = v;
    }
    settings
}
