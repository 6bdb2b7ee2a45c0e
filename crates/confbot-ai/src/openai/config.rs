//! OpenAI client configuration.

use std::fmt;
use std::time::Duration;

use confbot_config::schema::{ApiFlavor, CompletionConfig};

use crate::AiError;

/// OpenAI client configuration.
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub flavor: ApiFlavor,
    /// Base URL, without a trailing slash.
    pub endpoint: String,
    /// Model name, or deployment name for Azure.
    pub model: String,
    pub api_version: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub system_prompt: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("flavor", &self.flavor)
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_version", &self.api_version)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_parts(api_key.into(), &CompletionConfig::default())
    }

    /// Build from the `[completion]` settings.
    ///
    /// The key must already be resolved (file value or environment); a
    /// missing or blank key is an error naming the variable to set.
    pub fn from_settings(settings: &CompletionConfig) -> Result<Self, AiError> {
        match settings.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(Self::from_parts(key.to_string(), settings)),
            _ => Err(AiError::ApiError(format!(
                "Completion API not configured. Set `completion.api_key` or {}.",
                settings.flavor.api_key_env()
            ))),
        }
    }

    fn from_parts(api_key: String, settings: &CompletionConfig) -> Self {
        Self {
            api_key,
            flavor: settings.flavor,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_version: settings.api_version.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            system_prompt: settings
                .system_prompt
                .clone()
                .filter(|p| !p.trim().is_empty()),
            connect_timeout: Duration::from_secs(u64::from(settings.connect_timeout_secs)),
            request_timeout: Duration::from_secs(u64::from(settings.request_timeout_secs)),
        }
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        match self.flavor {
            ApiFlavor::OpenAi => format!("{}/chat/completions", self.endpoint),
            ApiFlavor::Azure => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                self.endpoint, self.model, self.api_version
            ),
        }
    }
}
