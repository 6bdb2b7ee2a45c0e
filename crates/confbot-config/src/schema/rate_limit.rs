//! Admission control for the `/chat` and `/ping` routes.

use serde::{Deserialize, Serialize};

/// Fixed-window rate limiting.
///
/// At most `permit_limit` requests are admitted per `window_secs`. Up to
/// `queue_limit` further requests wait (oldest first) for the next window;
/// anything beyond that is rejected with `429 Too Many Requests`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub permit_limit: u32,
    pub window_secs: u32,
    pub queue_limit: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            permit_limit: 100,
            window_secs: 10,
            queue_limit: 2,
        }
    }
}
