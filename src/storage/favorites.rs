use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use super::kv::{KeyValueStore, read_document, write_document};
use crate::data::Catalog;
use crate::models::Video;
use crate::utils::Result;

pub const FAVORITES_KEY: &str = "favorites";

#[derive(Debug, Default, Serialize, Deserialize)]
struct FavoritesDocument {
    #[serde(default)]
    ids: Vec<String>,
}

/// The user's watchlist.
///
/// Every change is written to durable storage before the in-memory set is replaced and
/// broadcast, so subscribers only ever observe persisted states. Subscribers receive
/// the full set rather than deltas.
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    state: watch::Sender<BTreeSet<String>>,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("favorites", &*self.state.borrow())
            .finish()
    }
}

impl FavoritesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let initial = read_ids(store.as_ref());
        let (state, _) = watch::channel(initial);
        Self { store, state }
    }

    /// Current persisted set, re-read from storage
    pub fn ids(&self) -> BTreeSet<String> {
        read_ids(self.store.as_ref())
    }

    pub fn is_favorite(&self, video_id: &str) -> bool {
        if video_id.trim().is_empty() {
            return false;
        }
        self.ids().contains(video_id)
    }

    pub fn toggle_favorite(&self, video_id: &str) -> Result<()> {
        if video_id.trim().is_empty() {
            return Ok(());
        }
        let mut next = self.ids();
        if !next.remove(video_id) {
            next.insert(video_id.to_string());
        }
        self.replace(next)
    }

    pub fn set_favorite(&self, video_id: &str, value: bool) -> Result<()> {
        if video_id.trim().is_empty() {
            return Ok(());
        }
        let mut next = self.ids();
        if value {
            next.insert(video_id.to_string());
        } else {
            next.remove(video_id);
        }
        self.replace(next)
    }

    /// Receiver that always holds the latest full favorites set
    pub fn subscribe(&self) -> watch::Receiver<BTreeSet<String>> {
        self.state.subscribe()
    }

    /// Favorite videos in catalog order, skipping ids the catalog no longer knows
    pub fn videos(&self, catalog: &Catalog) -> Vec<Video> {
        let ids = self.ids();
        catalog
            .videos()
            .iter()
            .filter(|video| ids.contains(video.id.as_str()))
            .cloned()
            .collect()
    }

    fn replace(&self, ids: BTreeSet<String>) -> Result<()> {
        let document = FavoritesDocument {
            ids: ids.iter().cloned().collect(),
        };
        write_document(self.store.as_ref(), FAVORITES_KEY, &document)?;
        debug!(count = ids.len(), "Favorites persisted");
        self.state.send_replace(ids);
        info!("Favorites updated");
        Ok(())
    }
}

fn read_ids(store: &dyn KeyValueStore) -> BTreeSet<String> {
    let document: FavoritesDocument = read_document(store, FAVORITES_KEY);
    document
        .ids
        .into_iter()
        .filter(|id| !id.trim().is_empty())
        .collect()
}
