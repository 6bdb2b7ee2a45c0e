//! Tests for the full validation pipeline.

use super::*;
use crate::schema::*;

#[test]
fn default_config_validates() {
    let config = ConfbotConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_port_zero() {
    let mut config = ConfbotConfig::default();
    config.server.port = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("server.port"));
}

#[test]
fn catches_port_too_large() {
    let mut config = ConfbotConfig::default();
    config.server.port = 70_000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("server.port"));
}

#[test]
fn catches_non_http_endpoint() {
    let mut config = ConfbotConfig::default();
    config.completion.endpoint = "ftp://example.com".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("completion.endpoint"));
}

#[test]
fn catches_temperature_out_of_range() {
    let mut config = ConfbotConfig::default();
    config.completion.temperature = 3.5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("completion.temperature"));
}

#[test]
fn catches_zero_permit_limit() {
    let mut config = ConfbotConfig::default();
    config.rate_limit.permit_limit = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("rate_limit.permit_limit"));
}

#[test]
fn catches_zero_stream_buffer() {
    let mut config = ConfbotConfig::default();
    config.sessions.stream_buffer = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("sessions.stream_buffer"));
}

#[test]
fn zero_guards_are_valid() {
    let mut config = ConfbotConfig::default();
    config.sessions.idle_ttl_secs = 0;
    config.sessions.max_tool_rounds = 0;
    config.rate_limit.queue_limit = 0;
    assert!(validate(&config).is_ok());
}

#[test]
fn collects_multiple_errors() {
    let mut config = ConfbotConfig::default();
    config.server.port = 0;
    config.rate_limit.window_secs = 0;
    config.completion.max_tokens = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("server.port"));
    assert!(err.contains("rate_limit.window_secs"));
    assert!(err.contains("completion.max_tokens"));
}
