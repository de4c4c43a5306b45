//! Local persistence layered over a string key-value store.
//!
//! Each store owns one key holding a JSON document. Reads always re-parse the stored
//! document and fall back to an empty default when it is missing or malformed.

pub mod favorites;
pub mod kv;
pub mod last_played;
pub mod progress;
pub mod recent_searches;
pub mod subtitle_selection;

use std::sync::Arc;

pub use favorites::FavoritesStore;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use last_played::LastPlayedIndexStore;
pub use progress::{ProgressRecord, ProgressTracker, VideoProgress, watched_percent};
pub use recent_searches::RecentSearchesStore;
pub use subtitle_selection::{SubtitleSelectionStore, TRACK_ID_OFF};

/// Source of wall-clock time in epoch milliseconds
pub type EpochClock = Arc<dyn Fn() -> i64 + Send + Sync>;

pub fn system_clock() -> EpochClock {
    Arc::new(|| chrono::Utc::now().timestamp_millis())
}

/// Every store the application uses, sharing one backing key-value store
#[derive(Clone)]
pub struct Stores {
    pub progress: ProgressTracker,
    pub favorites: Arc<FavoritesStore>,
    pub last_played: LastPlayedIndexStore,
    pub subtitles: SubtitleSelectionStore,
    pub recent_searches: RecentSearchesStore,
}

impl Stores {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            progress: ProgressTracker::new(store.clone()),
            favorites: Arc::new(FavoritesStore::new(store.clone())),
            last_played: LastPlayedIndexStore::new(store.clone()),
            subtitles: SubtitleSelectionStore::new(store.clone()),
            recent_searches: RecentSearchesStore::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}
