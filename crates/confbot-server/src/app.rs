//! Application state and router assembly.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use confbot_ai::{RunContext, SessionStore};
use confbot_config::schema::RateLimitConfig;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};

use crate::error::panic_response;
use crate::rate_limit::{rate_limit_middleware, FixedWindowLimiter};
use crate::routes;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: SessionStore,
    pub run_context: RunContext,
}

/// Build the HTTP router: the chat API and `/ping`, all rate limited.
pub fn build_router(
    state: AppState,
    rate_limit: &RateLimitConfig,
    allowed_origins: Vec<String>,
) -> Router {
    let limiter = Arc::new(FixedWindowLimiter::from_config(rate_limit));

    Router::new()
        .route("/chat/complete", post(routes::create_session))
        .route(
            "/chat/complete/{session_id}/messages",
            post(routes::add_message).get(routes::get_messages),
        )
        .route("/chat/complete/{session_id}/run", get(routes::run_session))
        .route("/ping", get(routes::ping))
        .route_layer(axum::middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        ))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(create_cors_layer(allowed_origins))
        .with_state(state)
}

/// Any origin when the list is empty, otherwise exactly the listed ones.
fn create_cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .into_iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    cors.max_age(Duration::from_secs(3600))
}
