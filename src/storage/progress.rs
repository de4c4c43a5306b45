use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use super::kv::{KeyValueStore, read_document, write_document};
use super::{EpochClock, system_clock};
use crate::constants::COMPLETE_PERCENT;
use crate::data::Catalog;
use crate::models::{Video, VideoId};
use crate::utils::Result;

pub const PROGRESS_KEY: &str = "progress";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredProgress {
    position_ms: i64,
    duration_ms: i64,
    last_played_at: i64,
}

type ProgressDocument = BTreeMap<String, StoredProgress>;

/// Saved playback position of one video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecord {
    pub video_id: VideoId,
    pub position_ms: i64,
    pub duration_ms: i64,
    pub last_played_at: i64,
}

impl ProgressRecord {
    /// Watched share rounded to whole percent, clamped to 0..=100
    pub fn percent(&self) -> u8 {
        watched_percent(self.position_ms, self.duration_ms)
    }

    pub fn is_complete(&self) -> bool {
        self.percent() >= COMPLETE_PERCENT
    }
}

/// A catalog video paired with its saved progress, as shown in "Continue Watching"
#[derive(Debug, Clone, PartialEq)]
pub struct VideoProgress {
    pub video: Video,
    pub progress: ProgressRecord,
}

impl VideoProgress {
    pub fn percent(&self) -> u8 {
        self.progress.percent()
    }
}

pub fn watched_percent(position_ms: i64, duration_ms: i64) -> u8 {
    if duration_ms <= 0 {
        return 0;
    }
    let ratio = position_ms as f64 / duration_ms as f64 * 100.0;
    ratio.clamp(0.0, 100.0).round() as u8
}

/// Per-video playback progress persisted as one JSON document keyed by video id
#[derive(Clone)]
pub struct ProgressTracker {
    store: Arc<dyn KeyValueStore>,
    clock: EpochClock,
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("store", &"<KeyValueStore>")
            .finish()
    }
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            clock: system_clock(),
        }
    }

    pub fn with_clock(mut self, clock: EpochClock) -> Self {
        self.clock = clock;
        self
    }

    fn read_all(&self) -> ProgressDocument {
        read_document(self.store.as_ref(), PROGRESS_KEY)
    }

    fn write_all(&self, document: &ProgressDocument) -> Result<()> {
        write_document(self.store.as_ref(), PROGRESS_KEY, document)
    }

    pub fn progress(&self, video_id: &str) -> Option<ProgressRecord> {
        let all = self.read_all();
        let stored = all.get(video_id)?;
        to_record(video_id, stored)
    }

    /// Save the position of a video. Ignored unless the duration is positive.
    pub fn set_progress(&self, video_id: &str, position_ms: i64, duration_ms: i64) -> Result<()> {
        if duration_ms <= 0 {
            return Ok(());
        }

        let mut all = self.read_all();
        all.insert(
            video_id.to_string(),
            StoredProgress {
                position_ms: position_ms.max(0),
                duration_ms,
                last_played_at: (self.clock)(),
            },
        );
        self.write_all(&all)?;
        debug!(video_id, position_ms, duration_ms, "Progress saved");
        Ok(())
    }

    pub fn clear_progress(&self, video_id: &str) -> Result<()> {
        let mut all = self.read_all();
        if all.remove(video_id).is_some() {
            self.write_all(&all)?;
            debug!(video_id, "Progress cleared");
        }
        Ok(())
    }

    /// Unfinished videos, most recently played first.
    ///
    /// Entries without a valid duration, completed entries and ids the catalog no
    /// longer knows are skipped.
    pub fn list_in_progress(&self, catalog: &Catalog) -> Vec<VideoProgress> {
        let mut out: Vec<VideoProgress> = self
            .read_all()
            .iter()
            .filter_map(|(id, stored)| {
                let video = catalog.get(id)?;
                let progress = to_record(id, stored)?;
                (!progress.is_complete()).then(|| VideoProgress {
                    video: video.clone(),
                    progress,
                })
            })
            .collect();

        out.sort_by(|a, b| b.progress.last_played_at.cmp(&a.progress.last_played_at));
        out
    }
}

fn to_record(video_id: &str, stored: &StoredProgress) -> Option<ProgressRecord> {
    if stored.duration_ms <= 0 {
        return None;
    }
    Some(ProgressRecord {
        video_id: VideoId::from(video_id),
        position_ms: stored.position_ms,
        duration_ms: stored.duration_ms,
        last_played_at: stored.last_played_at,
    })
}
