use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CatalogError;
use crate::normalize::Normalization;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Item {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// Ordered list of items. The search index is always rebuilt from this.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `item` unless an item with the exact same name exists.
    ///
    /// Returns whether the catalog changed.
    pub fn add(&mut self, item: Item) -> Result<bool, CatalogError> {
        if item.name.trim().is_empty() {
            return Err(CatalogError::BlankName);
        }
        if self.items.iter().any(|existing| existing.name == item.name) {
            debug!("Skipping duplicate item {:?}", item.name);
            return Ok(false);
        }
        self.items.push(item);
        Ok(true)
    }

    /// Removes every item named exactly `name`.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.name != name);
        self.items.len() != before
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.items.is_empty();
        self.items.clear();
        changed
    }

    /// Loads `items` only into an empty catalog. Blank names are skipped.
    pub fn seed_if_empty(&mut self, items: impl IntoIterator<Item = Item>) -> bool {
        if !self.items.is_empty() {
            return false;
        }
        for item in items {
            if let Err(e) = self.add(item) {
                debug!("Skipping seed item: {}", e);
            }
        }
        !self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(|item| item.name.as_str())
    }

    /// First item whose normalized name equals the normalized `query`.
    pub fn find_by_normalized_name(
        &self,
        query: &str,
        normalization: Normalization,
    ) -> Option<&Item> {
        let query = normalization.apply(query);
        self.items
            .iter()
            .find(|item| normalization.apply(&item.name) == query)
    }

    /// 1-based page of items. Out of range pages are empty.
    pub fn page(&self, page: usize, per_page: usize) -> &[Item] {
        if page == 0 || per_page == 0 {
            return &[];
        }
        let start = (page - 1).saturating_mul(per_page);
        if start >= self.items.len() {
            return &[];
        }
        let end = start.saturating_add(per_page).min(self.items.len());
        &self.items[start..end]
    }

    pub fn page_count(&self, per_page: usize) -> usize {
        if per_page == 0 {
            return 0;
        }
        self.items.len().div_ceil(per_page)
    }
}
