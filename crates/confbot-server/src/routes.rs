//! Chat API handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use confbot_ai::{ChatMessage, ChatSession, RunOutcome};
use confbot_common::SessionId;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::app::AppState;
use crate::error::ApiError;
use crate::protocol::{event_stream, AddMessageRequest, SessionCreated};

/// Resolve a path id. Malformed ids are simply unknown.
fn lookup(state: &AppState, raw_id: &str) -> Result<Arc<ChatSession>, ApiError> {
    let id: SessionId = raw_id.parse().map_err(|_| ApiError::NotFound)?;
    state.store.get(&id).ok_or(ApiError::NotFound)
}

pub async fn ping() -> &'static str {
    "pong"
}

pub async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.store.create();
    info!(session_id = %session.id(), sessions = state.store.len(), "Session created");
    (
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id: session.id(),
        }),
    )
}

pub async fn add_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<AddMessageRequest>,
) -> Result<StatusCode, ApiError> {
    let session = lookup(&state, &session_id)?;
    session.add_user_message(request.message).await?;
    debug!(session_id = %session.id(), "User message added");
    Ok(StatusCode::OK)
}

pub async fn get_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let session = lookup(&state, &session_id)?;
    Ok(Json(session.message_history().await))
}

pub async fn run_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Response, ApiError> {
    let session = lookup(&state, &session_id)?;
    let id = session.id();

    // Cancelled when the response body (and with it the turn stream) is
    // dropped.
    let cancel = CancellationToken::new();
    match session.run_with_tools(state.run_context.clone(), cancel).await {
        Ok(RunOutcome::NothingToDo) => {
            // An SSE reconnect after the answer was delivered; 204 stops it.
            debug!(session_id = %id, "Nothing to stream");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        Ok(RunOutcome::Streaming(turn)) => {
            info!(session_id = %id, "Streaming turn");
            Ok(event_stream(turn))
        }
        Err(e) => Err(e.into()),
    }
}
