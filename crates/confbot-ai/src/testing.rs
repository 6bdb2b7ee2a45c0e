//! Scripted completion client for exercising the turn loop.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use futures_util::stream;
use futures_util::StreamExt;
use tokio::sync::oneshot;

use crate::{
    AiError, CompletionClient, CompletionDelta, DeltaStream, Message, ToolCallDelta,
    ToolDefinition,
};

pub(crate) enum Reply {
    /// Stream these deltas, then end.
    Deltas(Vec<CompletionDelta>),
    /// Stream these deltas, then fail mid-stream.
    FailAfter(Vec<CompletionDelta>, AiError),
    /// Fail before streaming anything.
    Reject(AiError),
    /// Stream these deltas, then never end.
    Hang(Vec<CompletionDelta>),
    /// Stream the first deltas, wait for the gate, then stream the rest.
    Paused(Vec<CompletionDelta>, oneshot::Receiver<()>, Vec<CompletionDelta>),
}

/// Replays one scripted reply per request and records what was sent.
#[derive(Default)]
pub(crate) struct ScriptedClient {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<Vec<Message>>>,
    tools: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub(crate) fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Histories submitted so far, one per request.
    pub(crate) fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }

    /// Tool names advertised on the most recent request.
    pub(crate) fn advertised_tools(&self) -> Vec<String> {
        self.tools.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn stream_completion(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<DeltaStream, AiError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        *self.tools.lock().unwrap() = tools.iter().map(|t| t.name.clone()).collect();

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AiError::ApiError("script exhausted".into()))?;

        let stream: DeltaStream = match reply {
            Reply::Deltas(deltas) => Box::pin(stream::iter(deltas.into_iter().map(Ok))),
            Reply::FailAfter(deltas, error) => Box::pin(
                stream::iter(deltas.into_iter().map(Ok)).chain(stream::once(async { Err(error) })),
            ),
            Reply::Reject(error) => return Err(error),
            Reply::Hang(deltas) => {
                Box::pin(stream::iter(deltas.into_iter().map(Ok)).chain(stream::pending()))
            }
            Reply::Paused(before, gate, after) => Box::pin(
                stream::iter(before.into_iter().map(Ok)).chain(
                    stream::once(async move {
                        let _ = gate.await;
                    })
                    .flat_map(move |()| stream::iter(after.clone().into_iter().map(Ok))),
                ),
            ),
        };
        Ok(stream)
    }
}

/// A complete tool call in a single delta.
pub(crate) fn tool_call(index: u32, id: &str, name: &str, arguments: &str) -> CompletionDelta {
    CompletionDelta {
        tool_calls: vec![ToolCallDelta {
            index,
            id: Some(id.into()),
            name: Some(name.into()),
            arguments: Some(arguments.into()),
        }],
        ..Default::default()
    }
}

/// Text chunks followed by a `stop` finish.
pub(crate) fn answer(chunks: &[&str]) -> Reply {
    let mut deltas: Vec<_> = chunks.iter().map(|c| CompletionDelta::text(*c)).collect();
    deltas.push(CompletionDelta::finished("stop"));
    Reply::Deltas(deltas)
}
