use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::Item;
use crate::error::SourceError;

/// Somewhere the initial catalog comes from.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load(&self) -> Result<Vec<Item>, SourceError>;
}

/// A JSON file holding a list of `{"name": ..., "description": ...}` items.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl CatalogSource for JsonFileSource {
    async fn load(&self) -> Result<Vec<Item>, SourceError> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        let items: Vec<Item> = serde_json::from_str(&json).map_err(|source| SourceError::Json {
            path: self.path.clone(),
            source,
        })?;
        info!("Loaded {} items from {}", items.len(), self.path.display());
        Ok(items)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    items: Vec<Item>,
}

impl StaticSource {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }
}

#[async_trait::async_trait]
impl CatalogSource for StaticSource {
    async fn load(&self) -> Result<Vec<Item>, SourceError> {
        Ok(self.items.clone())
    }
}
