//! Chat session lifecycle and turn-loop guards.

use serde::{Deserialize, Serialize};

/// What to do when a second run request arrives for a session whose turn
/// is still in flight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConcurrentRunPolicy {
    /// Wait for the running turn to finish, then re-check for new input.
    #[default]
    Queue,
    /// Fail immediately with a busy error.
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Evict sessions idle for longer than this many seconds. 0 disables eviction.
    pub idle_ttl_secs: u32,
    /// How often the idle reaper runs (valid range: 1-86400).
    pub reap_interval_secs: u32,
    /// Maximum tool round-trips per run. 0 means unbounded.
    pub max_tool_rounds: u32,
    pub concurrent_run: ConcurrentRunPolicy,
    /// Capacity of the chunk channel between the turn loop and the transport.
    pub stream_buffer: u32,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: 0,
            reap_interval_secs: 60,
            max_tool_rounds: 0,
            concurrent_run: ConcurrentRunPolicy::Queue,
            stream_buffer: 32,
        }
    }
}

impl SessionsConfig {
    pub fn idle_ttl(&self) -> Option<std::time::Duration> {
        (self.idle_ttl_secs > 0).then(|| std::time::Duration::from_secs(self.idle_ttl_secs.into()))
    }

    pub fn max_tool_rounds(&self) -> Option<u32> {
        (self.max_tool_rounds > 0).then_some(self.max_tool_rounds)
    }
}
