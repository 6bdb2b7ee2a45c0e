//! Conversation engine for the conference bot.
//!
//! Provides:
//! - An OpenAI / Azure OpenAI chat-completions client with SSE streaming
//! - A stream processor that separates forwardable text from tool calls
//! - A tool dispatcher backed by the conference catalog
//! - Chat sessions running the streaming tool-call loop, and their store
//! - Token usage tracking

pub mod openai;
pub mod processor;
pub mod session;
pub mod store;
pub mod streaming;
pub mod token_tracker;
pub mod tools;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use serde::{Deserialize, Serialize};

pub use openai::{OpenAiClient, OpenAiConfig};
pub use processor::{ProcessedTurn, StreamProcessor};
pub use session::{ChatSession, RunContext, RunOutcome, SessionError, TurnStream};
pub use store::SessionStore;
pub use token_tracker::TokenTracker;
pub use tools::{ToolDispatcher, ToolHandler, ToolInvocationError, ToolResult};

/// Ordered deltas of one completion, ending when the upstream response ends.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<CompletionDelta, AiError>> + Send>>;

/// A streaming chat-completions backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Submit the history and the available tools, returning the delta stream.
    async fn stream_completion(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<DeltaStream, AiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
    Tool,
}

/// One entry of a session's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub content: String,
    /// Set on tool results: the call this entry answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Set on assistant tool-request entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            content: content.into(),
            tool_call_id: None,
            tool_calls: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            content: content.into(),
            tool_call_id: None,
            tool_calls: Vec::new(),
        }
    }

    /// Assistant entry asking for `calls` to be executed.
    pub fn tool_request(content: impl Into<String>, calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: calls,
            ..Self::assistant(content)
        }
    }

    pub fn tool_result(result: &ToolResult) -> Self {
        Self {
            sender: Sender::Tool,
            content: result.payload.to_string(),
            tool_call_id: Some(result.tool_call_id.clone()),
            tool_calls: Vec::new(),
        }
    }

    pub fn is_tool_request(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// A history entry as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: serde_json::Value,
}

/// A fully assembled tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Raw argument document, exactly as streamed.
    pub arguments: String,
}

/// One streamed piece of a completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionDelta {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCallDelta>,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

impl CompletionDelta {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn finished(reason: impl Into<String>) -> Self {
        Self {
            finish_reason: Some(reason.into()),
            ..Default::default()
        }
    }
}

/// A fragment of one in-flight tool call. Fragments sharing an `index`
/// belong to the same call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCallDelta {
    pub index: u32,
    pub id: Option<String>,
    pub name: Option<String>,
    pub arguments: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
}

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_result_message_carries_call_id() {
        let result = ToolResult {
            tool_call_id: "call_1".into(),
            payload: serde_json::json!({"error": "Invalid arguments"}),
        };
        let msg = Message::tool_result(&result);
        assert_eq!(msg.sender, Sender::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(msg.content, r#"{"error":"Invalid arguments"}"#);
    }

    #[test]
    fn chat_message_serializes_lowercase_sender() {
        let msg = ChatMessage {
            sender: Sender::Assistant,
            message: "hi".into(),
        };
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"sender":"assistant","message":"hi"}"#
        );
    }

    #[test]
    fn token_usage_total_saturates() {
        let usage = TokenUsage {
            input_tokens: u64::MAX,
            output_tokens: 1,
        };
        assert_eq!(usage.total_tokens(), u64::MAX);
    }
}
