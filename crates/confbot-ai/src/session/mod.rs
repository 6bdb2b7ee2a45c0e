//! Conversation sessions.
//!
//! A `ChatSession` owns a conversation's history and runs the streaming
//! tool-call loop: submit the history, forward text as it arrives, execute
//! requested tools, and resubmit until the model answers without calling
//! any tool.

mod chat;
mod manager;
mod types;

pub use manager::ChatSession;
pub use types::{RunContext, RunOutcome, SessionError, TurnStream};
