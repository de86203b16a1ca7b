//! OpenAI-compatible `/chat/completions` client.
//!
//! Whole-response mode posts once and reads `choices[0].message.content`.
//! Streaming mode sets `"stream": true` and consumes the SSE body line by
//! line, forwarding `choices[0].delta.content` pieces through an mpsc
//! channel until `data: [DONE]` or an error payload arrives.

use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::debug;

use crate::config::ChatConfig;

use super::{ChatError, ChatMessage, ChatService, StreamEvent};

/// Channel capacity for streaming deltas.
const STREAM_BUFFER: usize = 64;

/// HTTP chat-completion service.
#[derive(Debug)]
pub struct HttpChatService {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl HttpChatService {
    /// Create a service from config. `base_url` is required.
    pub fn new(config: &ChatConfig) -> Result<Self, ChatError> {
        let base_url = config.base_url.as_deref().ok_or_else(|| {
            ChatError::NotConfigured(format!(
                "no chat endpoint configured. Set [chat].base_url or {}",
                crate::constants::ENV_CHAT_URL
            ))
        })?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn post(
        &self,
        messages: &[ChatMessage],
        stream: bool,
    ) -> Result<reqwest::Response, ChatError> {
        let body = json!({
            "model": self.model,
            "messages": messages,
            "stream": stream,
        });
        debug!(endpoint = %self.endpoint(), stream, "chat request");

        let mut builder = self.http.post(self.endpoint()).json(&body);
        if let Some(ref key) = self.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }
        let response = builder
            .send()
            .await
            .map_err(|e| ChatError::Api(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(ChatError::Api(format!("HTTP {status}: {text}")));
        }
        Ok(response)
    }
}

#[derive(Debug, Deserialize)]
struct CompletionDto {
    #[serde(default)]
    choices: Vec<ChoiceDto>,
}

#[derive(Debug, Deserialize)]
struct ChoiceDto {
    message: Option<MessageDto>,
}

#[derive(Debug, Deserialize)]
struct MessageDto {
    content: Option<String>,
}

/// Pull the first choice's content out of a whole-response payload.
fn extract_content(dto: CompletionDto) -> Result<String, ChatError> {
    dto.choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|content| !content.is_empty())
        .ok_or(ChatError::Empty)
}

/// Parse one SSE line into a [`StreamEvent`].
///
/// Lines that are not `data:` payloads (comments, event names, keep-alive
/// blanks) and deltas without text content yield `None`.
fn parse_sse_line(line: &str) -> Option<StreamEvent> {
    let data = line.strip_prefix("data: ").or_else(|| line.strip_prefix("data:"))?;
    let data = data.trim();

    if data == "[DONE]" {
        return Some(StreamEvent::Done);
    }

    let json: serde_json::Value = serde_json::from_str(data).ok()?;

    if let Some(error) = json.get("error") {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown error");
        return Some(StreamEvent::Error(message.to_string()));
    }

    json.pointer("/choices/0/delta/content")
        .and_then(|c| c.as_str())
        .filter(|delta| !delta.is_empty())
        .map(|delta| StreamEvent::Delta(delta.to_string()))
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let response = self.post(messages, false).await?;
        let dto: CompletionDto = response
            .json()
            .await
            .map_err(|e| ChatError::Api(format!("malformed completion response: {e}")))?;
        extract_content(dto)
    }

    async fn stream(
        &self,
        messages: &[ChatMessage],
    ) -> Result<mpsc::Receiver<StreamEvent>, ChatError> {
        let response = self.post(messages, true).await?;
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);

        tokio::spawn(async move {
            let mut body = response.bytes_stream();
            let mut buf = String::new();

            while let Some(chunk) = body.next().await {
                let bytes = match chunk {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                        return;
                    }
                };
                buf.push_str(&String::from_utf8_lossy(&bytes));

                // SSE frames are newline-delimited; keep any partial line
                // in the buffer until the next chunk completes it.
                while let Some(pos) = buf.find('\n') {
                    let line = buf[..pos].trim_end_matches('\r').to_string();
                    buf.drain(..=pos);
                    if let Some(event) = parse_sse_line(&line) {
                        let terminal =
                            matches!(event, StreamEvent::Done | StreamEvent::Error(_));
                        if tx.send(event).await.is_err() || terminal {
                            return;
                        }
                    }
                }
            }

            // Body ended without an explicit [DONE]; treat as natural end.
            let _ = tx.send(StreamEvent::Done).await;
        });

        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatConfig;

    #[test]
    fn new_requires_base_url() {
        let config = ChatConfig {
            base_url: None,
            ..ChatConfig::default()
        };
        let result = HttpChatService::new(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("base_url"));
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let config = ChatConfig {
            base_url: Some("https://api.example.com/v1/".to_string()),
            ..ChatConfig::default()
        };
        let service = HttpChatService::new(&config).unwrap();
        assert_eq!(service.endpoint(), "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn extract_content_takes_first_choice() {
        let dto: CompletionDto = serde_json::from_str(
            r#"{"choices": [{"message": {"content": "Looks good."}},
                            {"message": {"content": "ignored"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(dto).unwrap(), "Looks good.");
    }

    #[test]
    fn extract_content_empty_choices_is_error() {
        let dto: CompletionDto = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(extract_content(dto), Err(ChatError::Empty)));
    }

    #[test]
    fn extract_content_null_content_is_error() {
        let dto: CompletionDto =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(matches!(extract_content(dto), Err(ChatError::Empty)));
    }

    #[test]
    fn parse_sse_delta() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hel"}}]}"#;
        assert_eq!(
            parse_sse_line(line),
            Some(StreamEvent::Delta("Hel".to_string()))
        );
    }

    #[test]
    fn parse_sse_done() {
        assert_eq!(parse_sse_line("data: [DONE]"), Some(StreamEvent::Done));
    }

    #[test]
    fn parse_sse_error_payload() {
        let line = r#"data: {"error":{"message":"rate limited"}}"#;
        assert_eq!(
            parse_sse_line(line),
            Some(StreamEvent::Error("rate limited".to_string()))
        );
    }

    #[test]
    fn parse_sse_ignores_non_data_lines() {
        assert_eq!(parse_sse_line(""), None);
        assert_eq!(parse_sse_line(": keep-alive"), None);
        assert_eq!(parse_sse_line("event: message"), None);
    }

    #[test]
    fn parse_sse_ignores_malformed_json() {
        assert_eq!(parse_sse_line("data: {not json"), None);
    }

    #[test]
    fn parse_sse_ignores_empty_delta() {
        let line = r#"data: {"choices":[{"delta":{"content":""}}]}"#;
        assert_eq!(parse_sse_line(line), None);
        let line = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_sse_line(line), None);
    }
}
