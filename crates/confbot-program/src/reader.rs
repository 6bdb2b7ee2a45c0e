//! Loading the program export from disk.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::analyzer::Catalog;
use crate::model::ConferenceSession;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read the program export (a JSON array of sessions) from `path`.
pub fn read_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = Catalog::from_json_str(&content)?;
    info!(
        sessions = catalog.len(),
        "loaded program catalog from {}",
        path.display()
    );
    Ok(catalog)
}

impl Catalog {
    /// Parse a program export held in memory.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let sessions: Vec<ConferenceSession> = serde_json::from_str(json)?;
        Ok(Self::new(sessions))
    }
}
