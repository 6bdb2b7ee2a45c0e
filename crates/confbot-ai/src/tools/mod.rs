//! Tools the model can call.
//!
//! Each tool is a [`ToolHandler`] registered by name in a
//! [`ToolDispatcher`]. Handlers answer from the read-only conference
//! catalog; failures become JSON error payloads the model can read, so a
//! bad call never ends a conversation.

mod conference;
mod registry;

pub use conference::{GetExperts, GetSessionsByExpert};
pub use registry::ToolDispatcher;

use confbot_program::Catalog;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::ToolDefinition;

/// A callable tool.
pub trait ToolHandler: Send + Sync {
    /// Name, description and argument schema advertised to the model.
    fn definition(&self) -> ToolDefinition;

    /// Run the tool with the raw argument document.
    fn call(&self, arguments: &str, catalog: &Catalog) -> Result<Value, ToolInvocationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolInvocationError {
    #[error("Unknown function name")]
    UnknownFunction,
    #[error("Invalid arguments")]
    InvalidArguments,
}

impl ToolInvocationError {
    /// The `{"error": ...}` document returned to the model.
    pub fn to_payload(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

/// Outcome of one tool call, appended to the history as a tool message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub payload: Value,
}
