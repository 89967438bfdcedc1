use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::normalize::Normalization;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;
pub const DEFAULT_PAGE_SIZE: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Maximum number of suggestions shown per keystroke.
    pub suggestion_limit: usize,
    /// Items per page when listing the catalog.
    pub page_size: usize,
    pub normalization: Normalization,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
            normalization: Normalization::default(),
        }
    }
}

impl SearchConfig {
    /// Reads a JSON config file. Missing fields fall back to defaults.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config = serde_json::from_str(&json).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}
