use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use super::kv::{KeyValueStore, read_document, write_document};
use crate::utils::Result;

pub const LAST_PLAYED_KEY: &str = "last_played_index";

/// Last played position within each browsing row, stored as `{ "<rowKey>": index }`
#[derive(Clone)]
pub struct LastPlayedIndexStore {
    store: Arc<dyn KeyValueStore>,
}

impl LastPlayedIndexStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn read_all(&self) -> BTreeMap<String, Value> {
        read_document(self.store.as_ref(), LAST_PLAYED_KEY)
    }

    pub fn set_last_index(&self, row_key: &str, index: usize) -> Result<()> {
        if row_key.trim().is_empty() {
            return Ok(());
        }
        let mut all = self.read_all();
        all.insert(row_key.to_string(), Value::from(index));
        write_document(self.store.as_ref(), LAST_PLAYED_KEY, &all)?;
        debug!(row_key, index, "Last played index saved");
        Ok(())
    }

    /// Stored index for the row; negative or non-numeric entries read as absent
    pub fn last_index(&self, row_key: &str) -> Option<usize> {
        if row_key.trim().is_empty() {
            return None;
        }
        self.read_all()
            .get(row_key)
            .and_then(Value::as_u64)
            .and_then(|index| usize::try_from(index).ok())
    }
}
