//! Configuration schema types for the conference bot.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with defaults that reproduce the behavior of
//! an unconfigured deployment.

mod catalog;
mod completion;
mod rate_limit;
mod server;
mod sessions;
mod system;

pub use catalog::*;
pub use completion::*;
pub use rate_limit::*;
pub use server::*;
pub use sessions::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConfbotConfig {
    pub server: ServerConfig,
    pub completion: CompletionConfig,
    pub rate_limit: RateLimitConfig,
    pub sessions: SessionsConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}
