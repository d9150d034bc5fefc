// Project-wide constants
//
// Import via `use crate::config::constants::*;`.

/// Default OpenAI-compatible API endpoint (without the `/v1/...` suffix)
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Default maximum tokens per reply. Replies echo the whole task tree, so this
/// is kept generous.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default number of history messages kept in the conversation window.
pub const DEFAULT_MAX_HISTORY_MESSAGES: usize = 40;

/// Per-request HTTP timeout.
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Data directory under the user's home.
pub const DATA_DIR_NAME: &str = ".tasklark";

/// Environment variables checked for an API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["OPENAI_API_KEY", "OPENAI_KEY"];
