//! Demultiplexes a completion's delta stream.
//!
//! Text is handed back immediately so it can be forwarded with no extra
//! latency. Tool-call fragments are buffered per call index and only
//! surface, fully assembled, once the stream is finished.

use std::collections::HashMap;

use tracing::debug;

use crate::{CompletionDelta, TokenUsage, ToolCall};

/// Accumulator for one in-flight tool call.
#[derive(Debug, Clone, Default)]
struct ToolCallFragment {
    index: u32,
    id: Option<String>,
    name: String,
    arguments: String,
}

impl ToolCallFragment {
    fn assemble(self) -> ToolCall {
        ToolCall {
            id: self.id.unwrap_or_else(|| format!("call_{}", self.index)),
            name: self.name,
            arguments: self.arguments,
        }
    }
}

/// Everything one completion produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessedTurn {
    /// Concatenation of every text delta.
    pub text: String,
    /// Assembled calls in the order their index first appeared.
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Default)]
pub struct StreamProcessor {
    text: String,
    fragments: Vec<ToolCallFragment>,
    /// Call index -> position in `fragments`.
    positions: HashMap<u32, usize>,
    finish_reason: Option<String>,
    usage: Option<TokenUsage>,
}

impl StreamProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one delta, returning the text to forward (if any).
    pub fn process(&mut self, delta: CompletionDelta) -> Option<String> {
        for fragment in delta.tool_calls {
            let pos = *self.positions.entry(fragment.index).or_insert_with(|| {
                self.fragments.push(ToolCallFragment {
                    index: fragment.index,
                    ..Default::default()
                });
                self.fragments.len() - 1
            });
            let call = &mut self.fragments[pos];
            if let Some(id) = fragment.id.filter(|id| !id.is_empty()) {
                call.id = Some(id);
            }
            if let Some(name) = fragment.name {
                call.name.push_str(&name);
            }
            if let Some(arguments) = fragment.arguments {
                call.arguments.push_str(&arguments);
            }
        }

        if let Some(reason) = delta.finish_reason {
            debug!(finish_reason = %reason, "Completion finished");
            self.finish_reason = Some(reason);
        }
        if delta.usage.is_some() {
            self.usage = delta.usage;
        }

        let text = delta.content.filter(|t| !t.is_empty())?;
        self.text.push_str(&text);
        Some(text)
    }

    /// Whether any tool-call fragment has been seen so far.
    pub fn has_pending_tool_calls(&self) -> bool {
        !self.fragments.is_empty()
    }

    /// End of stream: assemble the buffered tool calls.
    pub fn finish(self) -> ProcessedTurn {
        ProcessedTurn {
            text: self.text,
            tool_calls: self
                .fragments
                .into_iter()
                .map(ToolCallFragment::assemble)
                .collect(),
            finish_reason: self.finish_reason,
            usage: self.usage,
        }
    }
}
