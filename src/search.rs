//! Live search over a catalog.
//!
//! The index is never patched. Every catalog change builds a fresh
//! [`PrefixIndex`] from the whole catalog and then publishes it in a single
//! swap, so readers only ever see a fully built index.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::catalog::{Catalog, Item};
use crate::config::SearchConfig;
use crate::error::{CatalogError, SourceError};
use crate::normalize::Normalization;
use crate::prefix_index::{CharMatch, PrefixIndex};
use crate::source::CatalogSource;

/// Builds a fresh index holding every name, normalized.
pub fn build_index<'a>(
    names: impl IntoIterator<Item = &'a str>,
    normalization: Normalization,
) -> PrefixIndex {
    let mut index = PrefixIndex::new();
    for name in names {
        index.insert(&normalization.apply(name));
    }
    index
}

/// Write side of the published index. Owned by whoever owns the catalog.
#[derive(Debug)]
pub struct IndexPublisher {
    tx: watch::Sender<Arc<PrefixIndex>>,
}

/// Read side of the published index. Cheap to clone.
#[derive(Debug, Clone)]
pub struct IndexReader {
    rx: watch::Receiver<Arc<PrefixIndex>>,
}

/// Creates a publisher/reader pair starting from an empty index.
pub fn index_channel() -> (IndexPublisher, IndexReader) {
    let (tx, rx) = watch::channel(Arc::new(PrefixIndex::new()));
    (IndexPublisher { tx }, IndexReader { rx })
}

impl IndexPublisher {
    /// Replaces the current index. Only call with a fully built index.
    pub fn publish(&self, index: PrefixIndex) {
        self.tx.send_replace(Arc::new(index));
    }

    pub fn subscribe(&self) -> IndexReader {
        IndexReader {
            rx: self.tx.subscribe(),
        }
    }
}

impl IndexReader {
    /// Snapshot of the most recently published index.
    pub fn current(&self) -> Arc<PrefixIndex> {
        self.rx.borrow().clone()
    }
}

/// What a search box shows after one keystroke.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchFeedback {
    pub query: String,
    pub trace: Vec<CharMatch>,
    /// `None` when nothing was searched (blank query).
    pub exact_match: Option<bool>,
    pub suggestions: Vec<String>,
    pub found: Option<Item>,
}

/// A catalog together with the index built from it.
#[derive(Debug)]
pub struct SearchSession {
    catalog: Catalog,
    config: SearchConfig,
    publisher: IndexPublisher,
    reader: IndexReader,
}

/// Create operations.
impl SearchSession {
    pub fn new(config: SearchConfig) -> Self {
        let (publisher, reader) = index_channel();
        Self {
            catalog: Catalog::new(),
            config,
            publisher,
            reader,
        }
    }

    /// Creates a session seeded from `source`.
    pub async fn from_source(
        source: &dyn CatalogSource,
        config: SearchConfig,
    ) -> Result<Self, SourceError> {
        let mut session = Self::new(config);
        let items = source.load().await?;
        session.seed(items);
        Ok(session)
    }
}

/// Catalog operations. Each change rebuilds and republishes the index.
impl SearchSession {
    pub fn add(&mut self, item: Item) -> Result<bool, CatalogError> {
        let changed = self.catalog.add(item)?;
        if changed {
            self.rebuild();
        }
        Ok(changed)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let changed = self.catalog.remove(name);
        if changed {
            self.rebuild();
        }
        changed
    }

    pub fn clear(&mut self) -> bool {
        let changed = self.catalog.clear();
        if changed {
            self.rebuild();
        }
        changed
    }

    /// Seeds an empty catalog. A non-empty catalog is left alone.
    pub fn seed(&mut self, items: impl IntoIterator<Item = Item>) -> bool {
        let changed = self.catalog.seed_if_empty(items);
        if changed {
            self.rebuild();
        }
        changed
    }

    fn rebuild(&mut self) {
        let index = build_index(self.catalog.names(), self.config.normalization);
        self.publisher.publish(index);
        info!("Rebuilt search index over {} items", self.catalog.len());
    }
}

/// Query operations.
impl SearchSession {
    /// Runs all three index queries for one keystroke.
    pub fn feedback(&self, query: &str) -> SearchFeedback {
        if query.trim().is_empty() {
            return SearchFeedback {
                query: query.to_string(),
                ..Default::default()
            };
        }

        let normalized = self.config.normalization.apply(query);
        let index = self.reader.current();
        let mut suggestions = index.suggest_by_prefix(&normalized);
        suggestions.truncate(self.config.suggestion_limit);

        let mut feedback = self.lookup(query, &normalized, &index);
        feedback.suggestions = suggestions;
        debug!(
            "Query {:?}: exact={:?}, {} suggestions",
            normalized,
            feedback.exact_match,
            feedback.suggestions.len()
        );
        feedback
    }

    /// Feedback after picking a suggestion: the suggestion list is closed.
    pub fn select_suggestion(&self, word: &str) -> SearchFeedback {
        let normalized = self.config.normalization.apply(word);
        self.lookup(word, &normalized, &self.reader.current())
    }

    fn lookup(&self, query: &str, normalized: &str, index: &PrefixIndex) -> SearchFeedback {
        let exact = index.search_exact(normalized);
        let found = if exact {
            self.catalog
                .find_by_normalized_name(normalized, self.config.normalization)
                .cloned()
        } else {
            None
        };
        SearchFeedback {
            query: query.to_string(),
            trace: index.search_char_by_char(normalized),
            exact_match: Some(exact),
            suggestions: Vec::new(),
            found,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// A reader that keeps following this session's rebuilds.
    pub fn reader(&self) -> IndexReader {
        self.publisher.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;

    fn session_of(names: &[&str]) -> SearchSession {
        let mut session = SearchSession::new(SearchConfig::default());
        session.seed(names.iter().map(|n| Item::named(*n)));
        session
    }

    #[test]
    fn test_build_index_normalizes_names() {
        let index = build_index(["Apple", "APP"], Normalization::Lowercase);
        assert!(index.search_exact("apple"));
        assert!(index.search_exact("app"));
        assert!(!index.search_exact("Apple"));

        let index = build_index(["Apple"], Normalization::Exact);
        assert!(index.search_exact("Apple"));
        assert!(!index.search_exact("apple"));
    }

    #[test]
    fn test_build_index_from_empty_catalog() {
        let index = build_index(Catalog::new().names(), Normalization::Lowercase);
        assert!(index.is_empty());
        assert!(index.suggest_by_prefix("a").is_empty());
        assert!(!index.search_exact(""));
    }

    #[test]
    fn test_reader_sees_whole_index_swaps() {
        let (publisher, reader) = index_channel();
        let before = reader.current();
        assert!(before.is_empty());

        publisher.publish(build_index(["tea", "toast"], Normalization::Lowercase));

        // The old snapshot is untouched; the reader now sees the new index.
        assert!(before.is_empty());
        assert_eq!(reader.current().suggest_by_prefix("t"), ["tea", "toast"]);
    }

    #[test]
    fn test_session_reader_follows_rebuilds() {
        let mut session = session_of(&["tea"]);
        let reader = session.reader();

        session.add(Item::named("Coffee")).unwrap();
        assert!(reader.current().search_exact("coffee"));
    }

    #[test]
    fn test_clear_empty_catalog_keeps_published_index() {
        let mut session = session_of(&["Milk"]);
        assert!(session.clear());

        let before = session.reader().current();
        assert!(!session.clear());
        assert!(Arc::ptr_eq(&before, &session.reader().current()));
    }

    #[test]
    fn test_feedback_for_exact_hit() {
        let mut session = SearchSession::new(SearchConfig::default());
        session
            .add(Item {
                name: "Green Tea".into(),
                description: Some("Loose leaf".into()),
            })
            .unwrap();
        session.add(Item::named("Green Tea Bags")).unwrap();

        let feedback = session.feedback("GREEN TEA");
        assert_eq!(feedback.query, "GREEN TEA");
        assert_eq!(feedback.exact_match, Some(true));
        assert_eq!(feedback.suggestions, ["green tea", "green tea bags"]);
        assert_eq!(feedback.trace.len(), 9);
        assert!(feedback.trace.iter().all(|m| m.exists));
        assert_eq!(
            feedback.found.and_then(|item| item.description),
            Some("Loose leaf".to_string())
        );
    }

    #[test]
    fn test_feedback_for_partial_query() {
        let session = session_of(&["Cat"]);
        let feedback = session.feedback("cow");
        assert_eq!(feedback.exact_match, Some(false));
        assert!(feedback.suggestions.is_empty());
        assert!(feedback.found.is_none());
        let exists: Vec<bool> = feedback.trace.iter().map(|m| m.exists).collect();
        assert_eq!(exists, [true, false, false]);
    }

    #[test]
    fn test_blank_query_clears_feedback() {
        let session = session_of(&["Cat"]);
        for query in ["", "   "] {
            let feedback = session.feedback(query);
            assert!(feedback.trace.is_empty());
            assert_eq!(feedback.exact_match, None);
            assert!(feedback.suggestions.is_empty());
            assert!(feedback.found.is_none());
        }
    }

    #[test]
    fn test_suggestions_are_capped() {
        let session = session_of(&["a1", "a2", "a3", "a4", "a5", "a6", "a7"]);
        assert_eq!(
            session.feedback("a").suggestions,
            ["a1", "a2", "a3", "a4", "a5"]
        );

        let mut session = SearchSession::new(SearchConfig {
            suggestion_limit: 2,
            ..Default::default()
        });
        session.seed(["b1", "b2", "b3"].map(Item::named));
        assert_eq!(session.feedback("b").suggestions, ["b1", "b2"]);
    }

    #[test]
    fn test_catalog_changes_rebuild_index() {
        let mut session = session_of(&["Milk"]);
        assert_eq!(session.feedback("milk").exact_match, Some(true));

        assert!(session.remove("Milk"));
        assert_eq!(session.feedback("milk").exact_match, Some(false));

        session.add(Item::named("Bread")).unwrap();
        assert_eq!(session.feedback("bread").exact_match, Some(true));

        assert!(session.clear());
        assert!(session.catalog().is_empty());
        assert!(session.feedback("b").suggestions.is_empty());
        assert_eq!(session.feedback("bread").exact_match, Some(false));
    }

    #[test]
    fn test_failed_add_keeps_index() {
        let mut session = session_of(&["Milk"]);
        assert!(session.add(Item::named("  ")).is_err());
        assert!(!session.add(Item::named("Milk")).unwrap());
        assert_eq!(session.feedback("milk").exact_match, Some(true));
    }

    #[test]
    fn test_select_suggestion_closes_list() {
        let session = session_of(&["Apple", "App"]);
        let feedback = session.select_suggestion("app");
        assert_eq!(feedback.exact_match, Some(true));
        assert!(feedback.suggestions.is_empty());
        assert_eq!(feedback.found, Some(Item::named("App")));
    }

    #[tokio::test]
    async fn test_from_source() {
        let source = StaticSource::new(vec![Item::named("Tea"), Item::named("Toast")]);
        let session = SearchSession::from_source(&source, SearchConfig::default())
            .await
            .unwrap();
        assert_eq!(session.catalog().len(), 2);
        assert_eq!(session.feedback("t").suggestions, ["tea", "toast"]);
    }
}
