// Configuration loader
// Loads ~/.tasklark/config.toml (or an explicit path), then falls back to
// environment variables for the API key, then applies command-line overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::constants::API_KEY_ENV_VARS;
use super::settings::{default_data_dir, Config};
use crate::errors::{self, TaskError};

/// Values supplied on the command line; they win over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Explicit config file; must exist when given
    pub config_path: Option<PathBuf>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// On-disk format; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    max_history_messages: Option<usize>,
    transcript_enabled: Option<bool>,
    data_dir: Option<PathBuf>,
}

/// Load configuration from the process environment
pub fn load_config(overrides: &ConfigOverrides) -> Result<Config> {
    load_config_with(overrides, default_data_dir(), |name| std::env::var(name).ok())
}

/// Load configuration with an explicit data dir and environment lookup
pub fn load_config_with<F>(overrides: &ConfigOverrides, data_dir: PathBuf, env: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let (file_path, required) = match &overrides.config_path {
        Some(path) => (path.clone(), true),
        None => (data_dir.join("config.toml"), false),
    };

    let file = read_toml_config(&file_path, required)?;

    let mut config = Config::new(String::new());
    config.data_dir = data_dir;

    if let Some(file) = file {
        tracing::debug!("Loaded configuration from {}", file_path.display());
        apply_file(&mut config, file);
    }

    if config.api_key.trim().is_empty() {
        if let Some((name, key)) = API_KEY_ENV_VARS
            .iter()
            .find_map(|name| env(name).filter(|v| !v.trim().is_empty()).map(|v| (name, v)))
        {
            tracing::debug!("Using API key from ${}", name);
            config.api_key = key;
        }
    }

    if let Some(model) = &overrides.model {
        config.model = model.clone();
    }
    if let Some(base_url) = &overrides.base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }

    config.validate().context("Configuration validation failed")?;

    Ok(config)
}

fn read_toml_config(path: &Path, required: bool) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        if required {
            return Err(TaskError::Config(format!(
                "Configuration file {} does not exist",
                path.display()
            ))
            .into());
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

    let parsed: TomlConfig = toml::from_str(&contents).map_err(|e| {
        TaskError::Config(errors::config_parse_error(
            &path.display().to_string(),
            &e.to_string(),
        ))
    })?;

    Ok(Some(parsed))
}

fn apply_file(config: &mut Config, file: TomlConfig) {
    if let Some(api_key) = file.api_key {
        config.api_key = api_key;
    }
    if let Some(base_url) = file.base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }
    if let Some(model) = file.model {
        config.model = model;
    }
    if let Some(max_tokens) = file.max_tokens {
        config.max_tokens = max_tokens;
    }
    if file.temperature.is_some() {
        config.temperature = file.temperature;
    }
    if let Some(max_history) = file.max_history_messages {
        config.max_history_messages = max_history;
    }
    if let Some(enabled) = file.transcript_enabled {
        config.transcript_enabled = enabled;
    }
    if let Some(dir) = file.data_dir {
        config.data_dir = dir;
    }
}
