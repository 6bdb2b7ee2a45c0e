//! HTTP wire protocol: JSON bodies and the event-stream framing of a run.

use std::convert::Infallible;

use axum::body::Body;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::response::Response;
use confbot_ai::TurnStream;
use confbot_common::SessionId;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

/// Response to `POST /chat/complete`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: SessionId,
}

/// Body of `POST /chat/complete/{session_id}/messages`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddMessageRequest {
    pub message: String,
}

/// One text chunk as an SSE `data:` frame. Newlines are escaped so every
/// chunk fits on a single line.
pub fn data_frame(chunk: &str) -> String {
    format!("data: {}\n\n", chunk.replace('\n', "\\n"))
}

/// Terminal frame sent when the completion service fails mid-run.
pub fn error_frame(message: &str) -> String {
    format!("event: error\ndata: {}\n\n", message.replace('\n', "\\n"))
}

/// Stream a running turn as `text/event-stream`.
///
/// The body owns the turn stream, so a client disconnect drops it and
/// cancels the turn.
pub fn event_stream(turn: TurnStream) -> Response {
    let frames = turn.map(|item| {
        Ok::<_, Infallible>(match item {
            Ok(chunk) => data_frame(&chunk),
            Err(e) => error_frame(&e.to_string()),
        })
    });

    let mut response = Response::new(Body::from_stream(frames));
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/event-stream"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}
