//! Session types and concurrency guards.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use confbot_config::schema::SessionsConfig;
use futures_util::Stream;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::DropGuard;

use crate::{AiError, CompletionClient, ToolDispatcher};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session is busy with another request")]
    Busy,
    #[error("Completion failed: {0}")]
    Upstream(#[from] AiError),
}

/// Shared collaborators of a run.
#[derive(Clone)]
pub struct RunContext {
    pub client: Arc<dyn CompletionClient>,
    pub dispatcher: Arc<ToolDispatcher>,
    /// Tool round-trips allowed per run; `None` is unbounded.
    pub max_tool_rounds: Option<u32>,
    /// Capacity of the chunk channel between the loop and the consumer.
    pub buffer: usize,
}

impl RunContext {
    pub fn new(client: Arc<dyn CompletionClient>, dispatcher: Arc<ToolDispatcher>) -> Self {
        Self {
            client,
            dispatcher,
            max_tool_rounds: None,
            buffer: 32,
        }
    }

    /// Apply the `[sessions]` guard settings.
    pub fn with_settings(mut self, settings: &SessionsConfig) -> Self {
        self.max_tool_rounds = settings.max_tool_rounds();
        self.buffer = settings.stream_buffer as usize;
        self
    }
}

/// What `run_with_tools` did.
pub enum RunOutcome {
    /// The last message is not from the user: nothing to answer.
    NothingToDo,
    /// A turn is running; its text chunks arrive on the stream.
    Streaming(TurnStream),
}

impl std::fmt::Debug for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutcome::NothingToDo => f.write_str("NothingToDo"),
            RunOutcome::Streaming(_) => f.write_str("Streaming"),
        }
    }
}

/// Text chunks of a running turn.
///
/// Ends after the final chunk, or after a single `Err` when the completion
/// service fails. Dropping the stream cancels the turn.
pub struct TurnStream {
    chunks: ReceiverStream<Result<String, SessionError>>,
    _cancel_on_drop: DropGuard,
}

impl TurnStream {
    pub(crate) fn new(
        chunks: ReceiverStream<Result<String, SessionError>>,
        cancel_on_drop: DropGuard,
    ) -> Self {
        Self {
            chunks,
            _cancel_on_drop: cancel_on_drop,
        }
    }
}

impl Stream for TurnStream {
    type Item = Result<String, SessionError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.chunks).poll_next(cx)
    }
}

/// Held for the whole of a run; at most one per session.
pub(crate) type Turnstile = Arc<Mutex<()>>;
pub(crate) type TurnstilePermit = OwnedMutexGuard<()>;
