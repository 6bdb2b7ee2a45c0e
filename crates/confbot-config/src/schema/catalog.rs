use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Location of the conference program loaded at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("sessions.json"),
        }
    }
}
