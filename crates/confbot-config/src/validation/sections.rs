//! Validation for each config section.

use crate::schema::ConfbotConfig;

use super::helpers::{validate_range, validate_range_f64};

pub(crate) fn validate_server(errors: &mut Vec<String>, config: &ConfbotConfig) {
    validate_range(errors, "server.port", config.server.port, 1, 65535);
    if config.server.host.trim().is_empty() {
        errors.push("server.host must not be empty".into());
    }
}

pub(crate) fn validate_completion(errors: &mut Vec<String>, config: &ConfbotConfig) {
    let completion = &config.completion;
    if !(completion.endpoint.starts_with("http://") || completion.endpoint.starts_with("https://"))
    {
        errors.push(format!(
            "completion.endpoint = {:?} must be an http(s) URL",
            completion.endpoint
        ));
    }
    if completion.model.trim().is_empty() {
        errors.push("completion.model must not be empty".into());
    }
    validate_range(
        errors,
        "completion.max_tokens",
        completion.max_tokens,
        1,
        128_000,
    );
    validate_range_f64(
        errors,
        "completion.temperature",
        completion.temperature,
        0.0,
        2.0,
    );
    validate_range(
        errors,
        "completion.connect_timeout_secs",
        completion.connect_timeout_secs,
        1,
        300,
    );
    validate_range(
        errors,
        "completion.request_timeout_secs",
        completion.request_timeout_secs,
        1,
        3600,
    );
}

pub(crate) fn validate_rate_limit(errors: &mut Vec<String>, config: &ConfbotConfig) {
    validate_range(
        errors,
        "rate_limit.permit_limit",
        config.rate_limit.permit_limit,
        1,
        1_000_000,
    );
    validate_range(
        errors,
        "rate_limit.window_secs",
        config.rate_limit.window_secs,
        1,
        3600,
    );
    validate_range(
        errors,
        "rate_limit.queue_limit",
        config.rate_limit.queue_limit,
        0,
        10_000,
    );
}

pub(crate) fn validate_sessions(errors: &mut Vec<String>, config: &ConfbotConfig) {
    validate_range(
        errors,
        "sessions.reap_interval_secs",
        config.sessions.reap_interval_secs,
        1,
        86_400,
    );
    validate_range(
        errors,
        "sessions.stream_buffer",
        config.sessions.stream_buffer,
        1,
        4096,
    );
}
