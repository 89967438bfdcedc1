//! Prefix search over a small catalog of named items.
//!
//! [`PrefixIndex`] answers the three per-keystroke questions a search box
//! asks: which typed characters match, is the query a whole item name, and
//! which names start with it. [`SearchSession`] keeps a [`Catalog`] and
//! rebuilds the index from scratch whenever the catalog changes.

pub mod catalog;
pub mod config;
pub mod error;
pub mod normalize;
pub mod prefix_index;
pub mod search;
pub mod source;

pub use catalog::{Catalog, Item};
pub use config::SearchConfig;
pub use error::{CatalogError, ConfigError, SourceError};
pub use normalize::Normalization;
pub use prefix_index::{CharMatch, PrefixIndex};
pub use search::{
    build_index, index_channel, IndexPublisher, IndexReader, SearchFeedback, SearchSession,
};
pub use source::{CatalogSource, JsonFileSource, StaticSource};
