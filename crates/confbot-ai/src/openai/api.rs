//! CompletionClient trait implementation for OpenAiClient.

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::io::BufReader;
use tokio_util::io::StreamReader;
use tracing::{debug, warn};

use crate::streaming::sse_events;
use crate::{AiError, CompletionClient, DeltaStream, Message, ToolDefinition};

use super::client::{decode_chunk, OpenAiClient};

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn stream_completion(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<DeltaStream, AiError> {
        let body = self.build_request_body(messages, tools);

        debug!(
            model = %self.config.model,
            messages = messages.len(),
            tools = tools.len(),
            "Chat completions streaming request"
        );

        let response = self
            .http
            .post(&self.url)
            .headers(self.auth_headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout
                } else {
                    AiError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }

        let byte_stream = response
            .bytes_stream()
            .map(|result| result.map_err(std::io::Error::other));
        let reader = BufReader::new(StreamReader::new(byte_stream));

        let deltas = sse_events(reader).filter_map(|event| async move {
            let event = match event {
                Ok(event) => event,
                Err(e) => return Some(Err(e)),
            };
            match decode_chunk(&event.data) {
                Ok(delta) => delta.map(Ok),
                Err(AiError::ParseError(e)) => {
                    warn!(error = %e, "Skipping malformed stream chunk");
                    None
                }
                Err(e) => Some(Err(e)),
            }
        });

        Ok(Box::pin(deltas))
    }
}
