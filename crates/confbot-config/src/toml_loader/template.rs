//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Conference bot configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[server]
# host = "0.0.0.0"
# port = 5215
# allowed_origins = []          # empty = any origin

[completion]
# flavor = "openai"             # openai, azure
# endpoint = "https://api.openai.com/v1"
# api_key = ""                  # falls back to OPENAI_API_KEY / AZURE_OPENAI_API_KEY
# model = "gpt-4o-mini"         # deployment name for azure
# api_version = "2024-06-01"    # azure only
# max_tokens = 1024
# temperature = 0.7             # 0.0-2.0
# system_prompt = ""
# connect_timeout_secs = 10
# request_timeout_secs = 120

[rate_limit]
# permit_limit = 100
# window_secs = 10
# queue_limit = 2

[sessions]
# idle_ttl_secs = 0             # 0 = sessions live until shutdown
# reap_interval_secs = 60
# max_tool_rounds = 0           # 0 = unbounded
# concurrent_run = "queue"      # queue, reject
# stream_buffer = 32

[catalog]
# path = "sessions.json"

[logging]
# level = "INFO"                # TRACE, DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
