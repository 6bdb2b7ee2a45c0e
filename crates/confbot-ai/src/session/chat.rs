//! The streaming tool-call loop.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::processor::StreamProcessor;
use crate::{Message, ToolResult};

use super::manager::ChatSession;
use super::types::{RunContext, RunOutcome, SessionError, TurnStream};

type ChunkSender = mpsc::Sender<Result<String, SessionError>>;

/// How a turn ended without an upstream error.
#[derive(Debug, PartialEq, Eq)]
enum TurnEnd {
    Answered,
    Cancelled,
}

impl ChatSession {
    /// Answer the pending user message.
    ///
    /// Returns [`RunOutcome::NothingToDo`] when the last message is not from
    /// the user (for instance a client reconnecting after the answer was
    /// already streamed). Otherwise the turn runs on a spawned task and its
    /// text chunks are delivered through the returned stream. Cancelling
    /// `cancel`, or dropping the stream, stops the turn; nothing partial is
    /// added to the history, but tool round-trips already completed stay.
    pub async fn run_with_tools(
        self: Arc<Self>,
        ctx: RunContext,
        cancel: CancellationToken,
    ) -> Result<RunOutcome, SessionError> {
        let permit = self.acquire_turnstile().await?;

        // Re-checked under the turnstile: a queued reconnect finds the
        // answer already recorded.
        if !self.last_message_is_from_user().await {
            debug!(session = %self.id(), "Nothing to answer");
            return Ok(RunOutcome::NothingToDo);
        }

        let (tx, rx) = mpsc::channel(ctx.buffer.max(1));
        let producer_cancel = cancel.clone();
        let session = Arc::clone(&self);

        tokio::spawn(async move {
            let result = session.drive_turn(&ctx, &producer_cancel, &tx).await;
            drop(permit);
            match result {
                Ok(TurnEnd::Answered) => {
                    let state = session.state.lock().await;
                    let usage = state.tracker.total();
                    info!(
                        session = %session.id(),
                        input_tokens = usage.input_tokens,
                        output_tokens = usage.output_tokens,
                        completions = state.tracker.call_count(),
                        "Turn answered"
                    );
                }
                Ok(TurnEnd::Cancelled) => info!(session = %session.id(), "Turn cancelled"),
                Err(e) => {
                    warn!(session = %session.id(), error = %e, "Turn failed");
                    let _ = tx.send(Err(e)).await;
                }
            }
        });

        Ok(RunOutcome::Streaming(TurnStream::new(
            ReceiverStream::new(rx),
            cancel.drop_guard(),
        )))
    }

    async fn drive_turn(
        &self,
        ctx: &RunContext,
        cancel: &CancellationToken,
        tx: &ChunkSender,
    ) -> Result<TurnEnd, SessionError> {
        let mut rounds: u32 = 0;

        loop {
            let history = self.messages().await;
            let definitions = ctx.dispatcher.definitions();

            let mut deltas = tokio::select! {
                _ = cancel.cancelled() => return Ok(TurnEnd::Cancelled),
                stream = ctx.client.stream_completion(&history, definitions) => stream?,
            };

            let mut processor = StreamProcessor::new();
            loop {
                let next = tokio::select! {
                    _ = cancel.cancelled() => return Ok(TurnEnd::Cancelled),
                    next = deltas.next() => next,
                };
                let Some(delta) = next else { break };
                if let Some(text) = processor.process(delta?) {
                    if tx.send(Ok(text)).await.is_err() {
                        // Consumer went away.
                        return Ok(TurnEnd::Cancelled);
                    }
                }
            }
            let turn = processor.finish();

            let mut state = self.state.lock().await;
            if let Some(usage) = turn.usage {
                state.tracker.record(&usage);
            }

            if turn.tool_calls.is_empty() {
                state.push(Message::assistant(turn.text));
                state.last_message_is_from_user = false;
                return Ok(TurnEnd::Answered);
            }

            rounds += 1;
            if ctx.max_tool_rounds.is_some_and(|max| rounds > max) {
                warn!(session = %self.id(), rounds, "Tool round limit reached, ending turn");
                if !turn.text.is_empty() {
                    state.push(Message::assistant(turn.text));
                }
                state.last_message_is_from_user = false;
                return Ok(TurnEnd::Answered);
            }
            drop(state);

            // Tools are synchronous catalog lookups; the round is recorded
            // as a whole.
            let results: Vec<ToolResult> = turn
                .tool_calls
                .iter()
                .map(|call| ctx.dispatcher.execute(call))
                .collect();

            let mut state = self.state.lock().await;
            state.push(Message::tool_request(turn.text, turn.tool_calls));
            for result in &results {
                state.push(Message::tool_result(result));
            }
        }
    }
}
