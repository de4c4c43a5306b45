use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use super::kv::{KeyValueStore, read_document, write_document};
use crate::utils::Result;

pub const SUBTITLE_SELECTION_KEY: &str = "subtitle_selection";

/// Track id recorded when the user explicitly turned subtitles off
pub const TRACK_ID_OFF: &str = "__off__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSelection {
    #[serde(default)]
    track_id: String,
}

/// Per-video subtitle choice, stored as `{ "<videoId>": {"trackId": "..."} }`
#[derive(Clone)]
pub struct SubtitleSelectionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SubtitleSelectionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn read_all(&self) -> BTreeMap<String, StoredSelection> {
        read_document(self.store.as_ref(), SUBTITLE_SELECTION_KEY)
    }

    /// Saved track id for the video. [`TRACK_ID_OFF`] means subtitles are off.
    pub fn selected_track_id(&self, video_id: &str) -> Option<String> {
        if video_id.trim().is_empty() {
            return None;
        }
        self.read_all()
            .remove(video_id)
            .map(|selection| selection.track_id)
            .filter(|track_id| !track_id.trim().is_empty())
    }

    /// Persist a selection; `None` forgets it
    pub fn set_selected_track_id(&self, video_id: &str, track_id: Option<&str>) -> Result<()> {
        if video_id.trim().is_empty() {
            return Ok(());
        }

        let mut all = self.read_all();
        match track_id {
            Some(track_id) => {
                all.insert(
                    video_id.to_string(),
                    StoredSelection {
                        track_id: track_id.to_string(),
                    },
                );
            }
            None => {
                all.remove(video_id);
            }
        }
        write_document(self.store.as_ref(), SUBTITLE_SELECTION_KEY, &all)?;
        debug!(video_id, ?track_id, "Subtitle selection saved");
        Ok(())
    }
}
