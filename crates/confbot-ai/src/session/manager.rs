//! ChatSession struct and history management.

use std::sync::Arc;
use std::time::{Duration, Instant};

use confbot_common::SessionId;
use confbot_config::schema::ConcurrentRunPolicy;
use tokio::sync::Mutex;

use crate::token_tracker::TokenTracker;
use crate::{ChatMessage, Message, Sender};

use super::types::{SessionError, Turnstile, TurnstilePermit};

pub(super) struct SessionState {
    pub(super) messages: Vec<Message>,
    pub(super) last_message_is_from_user: bool,
    pub(super) tracker: TokenTracker,
    pub(super) last_active: Instant,
}

impl SessionState {
    pub(super) fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.last_active = Instant::now();
    }
}

/// One conversation.
pub struct ChatSession {
    id: SessionId,
    pub(super) state: Mutex<SessionState>,
    turnstile: Turnstile,
    policy: ConcurrentRunPolicy,
}

impl ChatSession {
    pub fn new(id: SessionId, policy: ConcurrentRunPolicy) -> Self {
        Self {
            id,
            state: Mutex::new(SessionState {
                messages: Vec::new(),
                last_message_is_from_user: false,
                tracker: TokenTracker::new(),
                last_active: Instant::now(),
            }),
            turnstile: Arc::new(Mutex::new(())),
            policy,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Append a question. Goes through the turnstile like a run, so it waits
    /// for (or, under the reject policy, refuses during) a running turn.
    pub async fn add_user_message(&self, text: impl Into<String>) -> Result<(), SessionError> {
        let _permit = self.acquire_turnstile().await?;
        let mut state = self.state.lock().await;
        state.push(Message::user(text));
        state.last_message_is_from_user = true;
        Ok(())
    }

    pub async fn last_message_is_from_user(&self) -> bool {
        self.state.lock().await.last_message_is_from_user
    }

    /// Client-visible history: user and assistant entries only.
    ///
    /// Tool traffic is hidden, and consecutive assistant entries (text
    /// streamed during tool rounds plus the final answer) are merged, so no
    /// two assistant entries are ever adjacent.
    pub async fn message_history(&self) -> Vec<ChatMessage> {
        let state = self.state.lock().await;
        let mut history: Vec<ChatMessage> = Vec::new();
        for msg in &state.messages {
            match msg.sender {
                Sender::Tool => continue,
                Sender::Assistant if msg.is_tool_request() && msg.content.is_empty() => continue,
                Sender::Assistant => {
                    if let Some(last) = history.last_mut() {
                        if last.sender == Sender::Assistant {
                            last.message.push_str(&msg.content);
                            continue;
                        }
                    }
                }
                Sender::User => {}
            }
            history.push(ChatMessage {
                sender: msg.sender,
                message: msg.content.clone(),
            });
        }
        history
    }

    /// Full internal history, tool traffic included.
    pub async fn messages(&self) -> Vec<Message> {
        self.state.lock().await.messages.clone()
    }

    pub async fn message_count(&self) -> usize {
        self.state.lock().await.messages.len()
    }

    /// Whether a run currently holds the turnstile.
    pub fn is_running(&self) -> bool {
        self.turnstile.try_lock().is_err()
    }

    /// Idle time, or `None` when the session is in use right now.
    pub fn idle_for(&self) -> Option<Duration> {
        if self.is_running() {
            return None;
        }
        let state = self.state.try_lock().ok()?;
        Some(state.last_active.elapsed())
    }

    /// Wait for (or, under the reject policy, demand) exclusive use.
    pub(super) async fn acquire_turnstile(&self) -> Result<TurnstilePermit, SessionError> {
        match self.policy {
            ConcurrentRunPolicy::Queue => Ok(self.turnstile.clone().lock_owned().await),
            ConcurrentRunPolicy::Reject => self
                .turnstile
                .clone()
                .try_lock_owned()
                .map_err(|_| SessionError::Busy),
        }
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
