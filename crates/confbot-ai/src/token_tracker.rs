//! Token usage tracking per session.

use crate::TokenUsage;

/// Tracks cumulative token usage of the completions a session requested.
#[derive(Debug, Default)]
pub struct TokenTracker {
    total: TokenUsage,
    /// Number of completions that reported usage.
    call_count: u64,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record token usage from one completion.
    pub fn record(&mut self, usage: &TokenUsage) {
        self.total.input_tokens = self.total.input_tokens.saturating_add(usage.input_tokens);
        self.total.output_tokens = self.total.output_tokens.saturating_add(usage.output_tokens);
        self.call_count += 1;
    }

    pub fn total(&self) -> &TokenUsage {
        &self.total
    }

    pub fn call_count(&self) -> u64 {
        self.call_count
    }
}
