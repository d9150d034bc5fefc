// Provider error types with retry classification
//
// Distinguishes transient failures (worth retrying) from permanent ones.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection refused, DNS failure, timeout, etc.
    #[error("Network error talking to {provider}: {message}")]
    Network { provider: String, message: String },

    /// 401/403: the API key was rejected
    #[error("{provider} rejected the API key (status {status}): {body}")]
    Auth {
        provider: String,
        status: u16,
        body: String,
    },

    /// 429
    #[error("{provider} rate limit reached: {body}")]
    RateLimited { provider: String, body: String },

    /// 5xx
    #[error("{provider} server error (status {status}): {body}")]
    Server {
        provider: String,
        status: u16,
        body: String,
    },

    /// Any other non-success status
    #[error("{provider} request failed (status {status}): {body}")]
    Client {
        provider: String,
        status: u16,
        body: String,
    },

    /// Response body did not match the expected API format
    #[error("Failed to decode {provider} response: {message}")]
    Decode { provider: String, message: String },
}

impl ProviderError {
    /// Classify a non-success HTTP status
    pub fn from_status(provider: &str, status: u16, body: String) -> Self {
        let provider = provider.to_string();
        match status {
            401 | 403 => Self::Auth {
                provider,
                status,
                body,
            },
            429 => Self::RateLimited { provider, body },
            500..=599 => Self::Server {
                provider,
                status,
                body,
            },
            _ => Self::Client {
                provider,
                status,
                body,
            },
        }
    }

    pub fn network(provider: &str, err: impl std::fmt::Display) -> Self {
        Self::Network {
            provider: provider.to_string(),
            message: err.to_string(),
        }
    }

    pub fn decode(provider: &str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            provider: provider.to_string(),
            message: err.to_string(),
        }
    }

    /// Whether the same request might succeed if sent again
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::RateLimited { .. } | Self::Server { .. }
        )
    }
}
