//! Server-Sent Events (SSE) parser.
//!
//! The chat completions API streams its output as SSE. This module turns
//! any buffered byte reader (in production, a reqwest body wrapped in a
//! `StreamReader`) into a stream of parsed events.

use futures_util::Stream;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::AiError;

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The event type, when the server sent an `event:` field.
    pub event: Option<String>,
    /// The event data; multiple `data:` lines are joined with `\n`.
    pub data: String,
}

struct ParserState<R> {
    lines: Lines<R>,
    event: Option<String>,
    data: String,
    done: bool,
}

impl<R> ParserState<R> {
    fn take_event(&mut self) -> SseEvent {
        SseEvent {
            event: self.event.take(),
            data: std::mem::take(&mut self.data),
        }
    }
}

/// Parse an SSE byte stream into events.
///
/// A read error ends the stream after yielding one `NetworkError`.
pub fn sse_events<R>(reader: R) -> impl Stream<Item = Result<SseEvent, AiError>> + Send
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let state = ParserState {
        lines: reader.lines(),
        event: None,
        data: String::new(),
        done: false,
    };

    futures_util::stream::unfold(state, |mut state| async move {
        if state.done {
            return None;
        }
        loop {
            let line = match state.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    state.done = true;
                    // Flush any event not terminated by a blank line.
                    if state.data.is_empty() {
                        return None;
                    }
                    let event = state.take_event();
                    return Some((Ok(event), state));
                }
                Err(e) => {
                    state.done = true;
                    return Some((Err(AiError::NetworkError(e.to_string())), state));
                }
            };

            if line.is_empty() {
                // Empty line = end of event
                if !state.data.is_empty() {
                    let event = state.take_event();
                    return Some((Ok(event), state));
                }
                state.event = None;
                continue;
            }

            if let Some(event_type) = field(&line, "event") {
                state.event = Some(event_type.to_string());
            } else if let Some(data) = field(&line, "data") {
                if !state.data.is_empty() {
                    state.data.push('\n');
                }
                state.data.push_str(data);
            }
            // Ignore other fields (id:, retry:, comments)
        }
    })
}

/// Value of `name: value` (the space after the colon is optional).
fn field<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}
