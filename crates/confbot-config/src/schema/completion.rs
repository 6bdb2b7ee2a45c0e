//! Completion service (OpenAI-compatible chat completions) settings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which flavor of the chat completions API the endpoint speaks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiFlavor {
    /// `POST {endpoint}/chat/completions` with `Authorization: Bearer`.
    #[default]
    OpenAi,
    /// `POST {endpoint}/openai/deployments/{model}/chat/completions?api-version=..`
    /// with an `api-key` header.
    Azure,
}

impl ApiFlavor {
    /// Environment variable consulted when no key is present in the file.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ApiFlavor::OpenAi => "OPENAI_API_KEY",
            ApiFlavor::Azure => "AZURE_OPENAI_API_KEY",
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub flavor: ApiFlavor,
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Model name, or deployment name for Azure.
    pub model: String,
    /// Only used by the Azure flavor.
    pub api_version: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub system_prompt: Option<String>,
    pub connect_timeout_secs: u32,
    pub request_timeout_secs: u32,
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("flavor", &self.flavor)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("api_version", &self.api_version)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("system_prompt", &self.system_prompt)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            flavor: ApiFlavor::OpenAi,
            endpoint: "https://api.openai.com/v1".into(),
            api_key: None,
            model: "gpt-4o-mini".into(),
            api_version: "2024-06-01".into(),
            max_tokens: 1024,
            temperature: 0.7,
            system_prompt: None,
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}
