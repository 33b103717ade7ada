pub mod openai;
pub mod prompts;

use async_trait::async_trait;

pub use openai::OpenAiClient;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("completion contained no message content")]
    EmptyResponse,
}

/// A hosted chat-completion model driven by a fixed system prompt.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Sends `system` and `user` as a two-message conversation and returns
    /// the assistant's reply. `None` leaves the temperature to the provider.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: Option<f32>,
    ) -> Result<String, LlmError>;
}
