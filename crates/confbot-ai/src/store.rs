//! Session store: maps session ids to live chat sessions.

use std::sync::Arc;
use std::time::Duration;

use confbot_common::SessionId;
use confbot_config::schema::ConcurrentRunPolicy;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::info;

use crate::ChatSession;

/// Thread-safe session store backed by a sharded map.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<SessionId, Arc<ChatSession>>>,
    policy: ConcurrentRunPolicy,
}

impl SessionStore {
    pub fn new(policy: ConcurrentRunPolicy) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            policy,
        }
    }

    /// Create a session under a fresh id.
    pub fn create(&self) -> Arc<ChatSession> {
        loop {
            let id = SessionId::new();
            // Ids are never reused.
            if let Entry::Vacant(slot) = self.sessions.entry(id) {
                let session = Arc::new(ChatSession::new(id, self.policy));
                slot.insert(Arc::clone(&session));
                return session;
            }
        }
    }

    pub fn get(&self, id: &SessionId) -> Option<Arc<ChatSession>> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Evict sessions idle for longer than `ttl`. Running sessions are kept.
    ///
    /// Returns the number of sessions removed.
    pub fn reap_idle(&self, ttl: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|id, session| {
            let stale = session.idle_for().is_some_and(|idle| idle > ttl);
            if stale {
                info!(session_id = %id, "Reaping idle session");
            }
            !stale
        });
        before.saturating_sub(self.sessions.len())
    }
}
