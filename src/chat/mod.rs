//! ChatService trait and chat-completion integration.
//!
//! Provides an abstraction layer over the chat-completion HTTP API to
//! decouple the pipeline from the wire protocol and enable mock-driven
//! testing.

pub mod http;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;

pub use http::HttpChatService;

/// Errors from the chat service.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("chat API error: {0}")]
    Api(String),

    #[error("chat service returned no content")]
    Empty,

    #[error("chat stream error: {0}")]
    Stream(String),

    #[error("chat service not configured: {0}")]
    NotConfigured(String),
}

/// One message in a chat-completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// One event in a streaming chat completion.
///
/// A stream is a finite, non-restartable sequence of `Delta` events
/// terminated by exactly one `Done` or `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// An incremental piece of response text.
    Delta(String),
    /// Natural end of the stream.
    Done,
    /// The service surfaced an error mid-stream; no further deltas follow.
    Error(String),
}

/// Trait for the chat-completion service consumed by the analysis invoker.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Whole-response completion: returns the first choice's message content.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError>;

    /// Streaming completion: returns a channel of ordered [`StreamEvent`]s.
    async fn stream(
        &self,
        messages: &[ChatMessage],
    ) -> Result<mpsc::Receiver<StreamEvent>, ChatError>;
}
