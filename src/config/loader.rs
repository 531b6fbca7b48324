// Configuration loader
// Loads settings from ~/.noteforge/config.toml or environment variable

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::PathBuf;

use super::settings::Settings;

/// Load configuration from the noteforge config file or environment.
pub fn load_settings() -> Result<Settings> {
    if let Some(path) = config_path() {
        if let Some(settings) = try_load_from_file(&path)? {
            return Ok(settings);
        }
    }

    // Fall back to environment variable with all-default tunables
    if let Ok(api_key) = std::env::var("NOTEFORGE_API_KEY") {
        if !api_key.is_empty() {
            return Ok(Settings {
                api_key,
                ..Settings::default()
            });
        }
    }

    bail!(
        "No configuration found. Create ~/.noteforge/config.toml:\n\n\
        api_key = \"sk-...\"\n\
        drafter_model = \"gpt-4o\"\n\
        critic_model = \"gpt-4o-mini\"\n\n\
        Alternatively, set environment variable:\n\
        export NOTEFORGE_API_KEY=\"sk-...\""
    );
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".noteforge/config.toml"))
}

fn try_load_from_file(path: &PathBuf) -> Result<Option<Settings>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let mut settings: Settings = toml::from_str(&contents)
        .with_context(|| format!("Invalid TOML in {}", path.display()))?;

    // The credential may live in the environment rather than on disk.
    if settings.api_key.is_empty() {
        if let Ok(api_key) = std::env::var("NOTEFORGE_API_KEY") {
            settings.api_key = api_key;
        }
    }

    if settings.api_key.is_empty() {
        bail!(
            "Config file {} has no api_key and NOTEFORGE_API_KEY is unset",
            path.display()
        );
    }

    Ok(Some(settings))
}
