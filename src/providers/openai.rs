// OpenAI chat-completions provider
//
// Works for OpenAI and any server exposing the same `/v1/chat/completions`
// API (Azure-style proxies, local inference servers) via a custom base URL.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::ProviderError;
use super::retry::{with_retry, RetryPolicy};
use super::types::{ChatRequest, ChatResponse};
use super::ChatProvider;
use crate::config::constants::{DEFAULT_BASE_URL, DEFAULT_MODEL, REQUEST_TIMEOUT_SECS};
use crate::config::Config;

#[derive(Clone)]
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
    provider_name: String,
    retry: RetryPolicy,
}

impl OpenAIProvider {
    /// Create a provider against the public OpenAI API
    pub fn new_openai(api_key: String) -> Result<Self> {
        Self::new(
            api_key,
            DEFAULT_BASE_URL.to_string(),
            DEFAULT_MODEL.to_string(),
            "openai".to_string(),
        )
    }

    /// Create a provider from loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_key.clone(),
            config.base_url.clone(),
            config.model.clone(),
            "openai".to_string(),
        )
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn new(api_key: String, base_url: String, default_model: String, provider_name: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_model,
            provider_name,
            retry: RetryPolicy::default(),
        })
    }

    fn to_openai_request(&self, request: &ChatRequest) -> OpenAIRequest {
        let model = if request.model.is_empty() {
            self.default_model.clone()
        } else {
            request.model.clone()
        };

        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if let Some(system) = &request.system {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }

        messages.extend(request.messages.iter().map(|m| OpenAIMessage {
            role: m.role.clone(),
            content: m.content.clone(),
        }));

        OpenAIRequest {
            model,
            messages,
            max_tokens: Some(request.max_tokens),
            temperature: request.temperature,
        }
    }

    fn from_openai_response(&self, response: OpenAIResponse) -> Result<ChatResponse, ProviderError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::decode(&self.provider_name, "response contained no choices"))?;

        Ok(ChatResponse {
            id: response.id,
            model: response.model,
            text: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason,
            provider: self.provider_name.clone(),
        })
    }

    /// Send a single request (no retry)
    async fn complete_once(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let openai_request = self.to_openai_request(request);
        let url = format!("{}/v1/chat/completions", self.base_url);

        tracing::debug!(
            "Sending {} messages to {} ({})",
            openai_request.messages.len(),
            url,
            openai_request.model
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| ProviderError::network(&self.provider_name, e))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(
                &self.provider_name,
                status.as_u16(),
                error_body,
            ));
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::decode(&self.provider_name, e))?;

        tracing::debug!("Received response {} from {}", openai_response.id, openai_response.model);

        self.from_openai_response(openai_response)
    }
}

#[async_trait]
impl ChatProvider for OpenAIProvider {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let response = with_retry(self.retry, || self.complete_once(request))
            .await
            .with_context(|| format!("{} request failed", self.provider_name))?;
        Ok(response)
    }

    fn name(&self) -> &str {
        &self.provider_name
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

// OpenAI API types

#[derive(Debug, Clone, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponse {
    id: String,
    model: String,
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}
