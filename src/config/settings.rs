// Configuration structs

use std::path::PathBuf;

use super::constants::*;
use crate::errors::{self, TaskError};

/// Everything the collaborator client and the loop need, resolved once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,

    /// API endpoint root, e.g. "https://api.openai.com"
    pub base_url: String,

    pub model: String,

    /// Maximum tokens per reply
    pub max_tokens: u32,

    /// Sampling temperature (provider default when unset)
    pub temperature: Option<f32>,

    /// Conversation window size sent with each request
    pub max_history_messages: usize,

    /// Write every exchange to `<data_dir>/logs/session-*.jsonl`
    pub transcript_enabled: bool,

    /// Root for the config file and transcripts (default ~/.tasklark)
    pub data_dir: PathBuf,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            max_history_messages: DEFAULT_MAX_HISTORY_MESSAGES,
            transcript_enabled: true,
            data_dir: default_data_dir(),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Validate configuration and return helpful errors
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.api_key.trim().is_empty() {
            return Err(TaskError::Config(errors::missing_api_key_error(
                &self.config_path().display().to_string(),
            )));
        }

        if self.model.trim().is_empty() {
            return Err(TaskError::Config("Model name must not be empty".to_string()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(TaskError::Config(format!(
                "Invalid base_url '{}': expected an http:// or https:// URL",
                self.base_url
            )));
        }

        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(TaskError::Config(format!(
                    "temperature ({t}) must be between 0.0 and 2.0"
                )));
            }
        }

        if self.max_tokens == 0 {
            return Err(TaskError::Config("max_tokens must be greater than 0".to_string()));
        }

        if self.max_history_messages < 2 {
            return Err(TaskError::Config(
                "max_history_messages must be at least 2 (one exchange)".to_string(),
            ));
        }

        Ok(())
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}
