// Conversation session: persona plus rolling history over a ChatProvider

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::types::{ChatRequest, Message};
use super::{ChatProvider, Collaborator};
use crate::config::Config;
use crate::logging::TranscriptLogger;

/// Keeps the conversation with one provider under one system prompt
pub struct ChatSession {
    provider: Arc<dyn ChatProvider>,
    system: String,
    messages: Vec<Message>,
    max_messages: usize,
    max_tokens: u32,
    temperature: Option<f32>,
    transcript: Option<TranscriptLogger>,
}

impl ChatSession {
    pub fn new(provider: Arc<dyn ChatProvider>, system: impl Into<String>) -> Self {
        Self {
            provider,
            system: system.into(),
            messages: Vec::new(),
            max_messages: 40,
            max_tokens: 4096,
            temperature: None,
            transcript: None,
        }
    }

    /// Create a session using the limits and transcript settings from `config`
    pub fn from_config(
        provider: Arc<dyn ChatProvider>,
        system: impl Into<String>,
        config: &Config,
    ) -> Self {
        let mut session = Self::new(provider, system)
            .with_max_messages(config.max_history_messages)
            .with_max_tokens(config.max_tokens)
            .with_temperature(config.temperature);

        if config.transcript_enabled {
            // The transcript is a side log; carry on without it
            match TranscriptLogger::in_dir(&config.logs_dir()) {
                Ok(transcript) => session.transcript = Some(transcript),
                Err(e) => tracing::warn!("Session transcript disabled: {:#}", e),
            }
        }

        session
    }

    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        // Never trim below the turn currently being answered
        self.max_messages = max_messages.max(2);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_transcript(mut self, transcript: TranscriptLogger) -> Self {
        self.transcript = Some(transcript);
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of completed user/assistant exchanges still in the window
    pub fn turn_count(&self) -> usize {
        self.messages.len() / 2
    }

    fn build_request(&self) -> ChatRequest {
        ChatRequest::new(self.messages.clone())
            .with_system(self.system.clone())
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
    }

    /// Drop the oldest messages beyond the limit, keeping a user message first
    fn trim_if_needed(&mut self) {
        if self.messages.len() > self.max_messages {
            let remove_count = self.messages.len() - self.max_messages;
            self.messages.drain(0..remove_count);
        }

        while self.messages.len() > 1 && self.messages[0].role != "user" {
            self.messages.remove(0);
        }
    }
}

#[async_trait]
impl Collaborator for ChatSession {
    async fn say(&mut self, message: &str) -> Result<String> {
        self.messages.push(Message::user(message));

        let request = self.build_request();
        let response = match self.provider.complete(&request).await {
            Ok(response) => response,
            Err(e) => {
                // Leave history as it was before this turn
                self.messages.pop();
                return Err(e);
            }
        };

        if let Some(transcript) = self.transcript.as_mut() {
            if let Err(e) = transcript.log_exchange(message, &response.text, &response.model) {
                tracing::warn!("Failed to record transcript entry: {:#}", e);
            }
        }

        self.messages.push(Message::assistant(response.text.clone()));
        self.trim_if_needed();

        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::types::ChatResponse;
    use std::sync::Mutex;

    /// Replies "echo: <last user message>" and records every request
    struct EchoProvider {
        requests: Mutex<Vec<ChatRequest>>,
        fail: bool,
    }

    impl EchoProvider {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                fail,
            })
        }
    }

    #[async_trait]
    impl ChatProvider for EchoProvider {
        async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                anyhow::bail!("provider down");
            }
            let last = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
            Ok(ChatResponse {
                id: "resp-1".into(),
                model: "echo-1".into(),
                text: format!("echo: {last}"),
                finish_reason: Some("stop".into()),
                provider: "echo".into(),
            })
        }

        fn name(&self) -> &str {
            "echo"
        }

        fn default_model(&self) -> &str {
            "echo-1"
        }
    }

    #[tokio::test]
    async fn test_say_keeps_history_and_system_prompt() {
        let provider = EchoProvider::new(false);
        let mut session = ChatSession::new(provider.clone(), "persona");

        assert_eq!(session.say("first").await.unwrap(), "echo: first");
        assert_eq!(session.say("second").await.unwrap(), "echo: second");
        assert_eq!(session.turn_count(), 2);

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].system.as_deref(), Some("persona"));
        assert_eq!(requests[1].messages.len(), 3);
        assert_eq!(requests[1].messages[1].content, "echo: first");
    }

    #[tokio::test]
    async fn test_history_trimmed_to_limit() {
        let provider = EchoProvider::new(false);
        let mut session = ChatSession::new(provider, "persona").with_max_messages(4);

        for i in 0..5 {
            session.say(&format!("msg {i}")).await.unwrap();
        }

        let messages = session.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[0].content, "msg 3");
        assert_eq!(messages[3].content, "echo: msg 4");
    }

    #[tokio::test]
    async fn test_failed_turn_rolls_back_history() {
        let provider = EchoProvider::new(true);
        let mut session = ChatSession::new(provider, "persona");

        assert!(session.say("hello").await.is_err());
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_transcript_records_exchange() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = TranscriptLogger::new(dir.path().join("t.jsonl")).unwrap();
        let path = transcript.path().to_path_buf();

        let mut session = ChatSession::new(EchoProvider::new(false), "persona").with_transcript(transcript);
        session.say("progress").await.unwrap();
        drop(session);

        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("\"message\":\"progress\""));
        assert!(contents.contains("\"reply\":\"echo: progress\""));
    }

    #[test]
    fn test_unwritable_transcript_dir_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("data");
        std::fs::write(&blocker, "not a directory").unwrap();

        let mut config = Config::new("key");
        config.data_dir = blocker;

        let session = ChatSession::from_config(EchoProvider::new(false), "persona", &config);
        assert!(session.transcript.is_none());
    }

    #[test]
    fn test_transcript_disabled_in_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new("key");
        config.data_dir = dir.path().to_path_buf();
        config.transcript_enabled = false;

        let session = ChatSession::from_config(EchoProvider::new(false), "persona", &config);
        assert!(session.transcript.is_none());
        assert!(!dir.path().join("logs").exists());
    }
}
