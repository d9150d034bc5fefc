// Error taxonomy and user-facing error messages

use std::path::PathBuf;
use thiserror::Error;

/// Maximum number of characters of a raw collaborator reply kept in an error
const RAW_REPLY_PREVIEW_CHARS: usize = 400;

/// Errors raised while loading tasks or interpreting collaborator replies
#[derive(Debug, Error)]
pub enum TaskError {
    /// Input file could not be opened or read
    #[error("Failed to read task file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file was read but does not have the expected shape
    #[error("Task file {} is malformed: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Collaborator reply is not valid JSON or is missing required fields
    #[error("Invalid collaborator response: {reason}\n\nReply was:\n{raw}")]
    InvalidResponse { reason: String, raw: String },

    /// Configuration is incomplete or inconsistent
    #[error("{0}")]
    Config(String),
}

impl TaskError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Build an `InvalidResponse`, keeping only a prefix of the raw reply
    pub fn invalid_response(reason: impl Into<String>, raw: &str) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
            raw: truncate_chars(raw, RAW_REPLY_PREVIEW_CHARS),
        }
    }
}

/// Message shown when no API key could be found anywhere
pub fn missing_api_key_error(config_path: &str) -> String {
    format!(
        "No API key configured.\n\n\
        Add one to {config_path}:\n\n\
        \x1b[1;36mapi_key = \"sk-...\"\x1b[0m\n\n\
        or set one of these environment variables:\n\
        export OPENAI_API_KEY=\"sk-...\"\n\
        export OPENAI_KEY=\"sk-...\""
    )
}

/// Message shown when the config file cannot be parsed
pub fn config_parse_error(path: &str, details: &str) -> String {
    format!(
        "Could not parse configuration file {path}\n\n{details}\n\n\
        Check the TOML syntax, or delete the file to fall back to environment variables."
    )
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_response_truncates_raw_reply() {
        let raw = "x".repeat(1000);
        match TaskError::invalid_response("bad", &raw) {
            TaskError::InvalidResponse { raw, .. } => {
                assert_eq!(raw.chars().count(), RAW_REPLY_PREVIEW_CHARS + 1);
                assert!(raw.ends_with('…'));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_response_keeps_short_reply() {
        let err = TaskError::invalid_response("missing field `tasks`", "{}");
        let message = err.to_string();
        assert!(message.contains("missing field `tasks`"));
        assert!(message.ends_with("{}"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé…");
        assert_eq!(truncate_chars("hi", 5), "hi");
    }

    #[test]
    fn test_missing_api_key_mentions_both_env_vars() {
        let msg = missing_api_key_error("~/.tasklark/config.toml");
        assert!(msg.contains("OPENAI_API_KEY"));
        assert!(msg.contains("OPENAI_KEY"));
        assert!(msg.contains("~/.tasklark/config.toml"));
    }
}
