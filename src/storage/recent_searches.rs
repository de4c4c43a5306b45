use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::kv::{KeyValueStore, read_document, write_document};
use crate::constants::MAX_RECENT_SEARCHES;
use crate::utils::Result;

pub const RECENT_SEARCHES_KEY: &str = "recent_searches";

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecentSearchesDocument {
    #[serde(default)]
    items: Vec<String>,
}

/// Most-recent-first list of search queries, shown while the search box is empty
#[derive(Clone)]
pub struct RecentSearchesStore {
    store: Arc<dyn KeyValueStore>,
}

impl RecentSearchesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<String> {
        let document: RecentSearchesDocument =
            read_document(self.store.as_ref(), RECENT_SEARCHES_KEY);
        document
            .items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }

    /// Move `query` to the front, dropping case-insensitive duplicates
    pub fn push(&self, query: &str) -> Result<()> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }

        let needle = query.to_lowercase();
        let mut items = vec![query.to_string()];
        items.extend(
            self.list()
                .into_iter()
                .filter(|item| item.to_lowercase() != needle),
        );
        items.truncate(MAX_RECENT_SEARCHES);

        self.write(items)?;
        debug!(query, "Recent search recorded");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.write(Vec::new())
    }

    fn write(&self, items: Vec<String>) -> Result<()> {
        write_document(
            self.store.as_ref(),
            RECENT_SEARCHES_KEY,
            &RecentSearchesDocument { items },
        )
    }
}
