//! OpenAI chat completions client.
//!
//! Speaks the streaming chat completions API of both OpenAI
//! (`{endpoint}/chat/completions`) and Azure OpenAI
//! (`{endpoint}/openai/deployments/{model}/chat/completions`).

mod api;
mod client;
mod config;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;
