// Chat-completion providers
//
// `ChatProvider` abstracts one HTTP API; `Collaborator` is the stateful
// "send a message, get text back" view the prioritization loop talks to.
// `ChatSession` bridges the two by owning the persona and conversation history.

use anyhow::Result;
use async_trait::async_trait;

pub mod error;
pub mod openai;
pub mod retry;
pub mod session;
pub mod types;

pub use error::ProviderError;
pub use openai::OpenAIProvider;
pub use retry::{with_retry, RetryPolicy};
pub use session::ChatSession;
pub use types::{ChatRequest, ChatResponse, Message};

/// A chat-completion API
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a request and wait for the complete response
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// Provider name (e.g. "openai")
    fn name(&self) -> &str;

    fn default_model(&self) -> &str;
}

/// The remote party in a prioritization conversation
///
/// Stateful: each call continues the same conversation under the same persona.
#[async_trait]
pub trait Collaborator: Send {
    async fn say(&mut self, message: &str) -> Result<String>;
}

#[async_trait]
impl<T: Collaborator + ?Sized> Collaborator for &mut T {
    async fn say(&mut self, message: &str) -> Result<String> {
        (**self).say(message).await
    }
}
