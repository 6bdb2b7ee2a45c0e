//! Fixed-window admission control.
//!
//! At most `permit_limit` requests are admitted per window. When a window
//! is exhausted, up to `queue_limit` requests wait (oldest first) for the
//! next one; anything beyond that is rejected with `429`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use confbot_config::schema::RateLimitConfig;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
#[error("rate limit exceeded")]
pub struct RateLimitExceeded;

#[derive(Debug)]
struct WindowState {
    window_start: Instant,
    used: u32,
    queued: u32,
}

impl WindowState {
    fn roll(&mut self, now: Instant, window: Duration) {
        if now.duration_since(self.window_start) >= window {
            self.window_start = now;
            self.used = 0;
        }
    }
}

pub struct FixedWindowLimiter {
    state: Mutex<WindowState>,
    permit_limit: u32,
    window: Duration,
    queue_limit: u32,
}

/// A place in the wait queue, released on drop (including when the
/// waiting request is abandoned).
struct QueueSlot<'a> {
    limiter: &'a FixedWindowLimiter,
}

impl Drop for QueueSlot<'_> {
    fn drop(&mut self) {
        let mut state = self.limiter.lock();
        state.queued = state.queued.saturating_sub(1);
    }
}

impl FixedWindowLimiter {
    pub fn new(permit_limit: u32, window: Duration, queue_limit: u32) -> Self {
        Self {
            state: Mutex::new(WindowState {
                window_start: Instant::now(),
                used: 0,
                queued: 0,
            }),
            permit_limit,
            window,
            queue_limit,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.permit_limit,
            Duration::from_secs(u64::from(config.window_secs)),
            config.queue_limit,
        )
    }

    fn lock(&self) -> MutexGuard<'_, WindowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admit a request, waiting in the queue if the window is exhausted.
    pub async fn acquire(&self) -> Result<(), RateLimitExceeded> {
        let mut slot: Option<QueueSlot<'_>> = None;
        loop {
            let wait = {
                let mut state = self.lock();
                let now = Instant::now();
                state.roll(now, self.window);

                // Newcomers may not overtake queued requests.
                let may_take = slot.is_some() || state.queued == 0;
                if may_take && state.used < self.permit_limit {
                    state.used += 1;
                    None
                } else {
                    if slot.is_none() {
                        if state.queued >= self.queue_limit {
                            return Err(RateLimitExceeded);
                        }
                        state.queued += 1;
                    }
                    let elapsed = now.duration_since(state.window_start);
                    Some(self.window.saturating_sub(elapsed))
                }
            };

            match wait {
                None => return Ok(()),
                Some(delay) => {
                    if slot.is_none() {
                        debug!(?delay, "Request queued by rate limiter");
                        slot = Some(QueueSlot { limiter: self });
                    }
                    // Never spin on a zero delay.
                    tokio::time::sleep(delay.max(Duration::from_millis(1))).await;
                }
            }
        }
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<Arc<FixedWindowLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    match limiter.acquire().await {
        Ok(()) => next.run(request).await,
        Err(e) => {
            warn!(path = %request.uri().path(), "Rejecting request: {e}");
            StatusCode::TOO_MANY_REQUESTS.into_response()
        }
    }
}
