use super::{RowKey, Video};

/// The browsing row a finished video was launched from, captured when its stream ends
#[derive(Debug, Clone, PartialEq)]
pub struct RowContext {
    /// Key the row was resolved from (category name or a sentinel)
    pub row_key: RowKey,
    /// All videos of the row in display order
    pub row_videos: Vec<Video>,
    /// Index of the video that just finished
    pub current_index: usize,
    /// Curated sequence used once the row is exhausted
    pub global_fallback: Vec<Video>,
}

/// The video currently selected to play after the countdown
#[derive(Debug, Clone, PartialEq)]
pub struct NextUp {
    pub row_key: RowKey,
    pub index: usize,
    pub video: Video,
}

impl RowContext {
    pub fn new(row_key: RowKey, row_videos: Vec<Video>, current_index: usize) -> Self {
        Self {
            row_key,
            row_videos,
            current_index,
            global_fallback: Vec::new(),
        }
    }

    pub fn with_global_fallback(mut self, global_fallback: Vec<Video>) -> Self {
        self.global_fallback = global_fallback;
        self
    }

    /// The video that just ended, if the index points into the row
    pub fn current_video(&self) -> Option<&Video> {
        self.row_videos.get(self.current_index)
    }

    /// Candidate at `index` within this row, keeping the row's key
    pub fn candidate_at(&self, index: usize) -> Option<NextUp> {
        self.row_videos.get(index).map(|video| NextUp {
            row_key: self.row_key.clone(),
            index,
            video: video.clone(),
        })
    }

    /// Pick what should play next.
    ///
    /// The following item of the same row wins. Once the row is exhausted the global
    /// fallback sequence is consulted: the item after the finished video's position in
    /// that sequence, or its first item when the finished video is absent or last.
    /// Returns `None` when neither source has anything to offer.
    pub fn next_up_candidate(&self) -> Option<NextUp> {
        if let Some(next) = self
            .current_index
            .checked_add(1)
            .and_then(|index| self.candidate_at(index))
        {
            return Some(next);
        }

        if self.global_fallback.is_empty() {
            return None;
        }

        let current_id = self.current_video().map(|video| &video.id);
        let fallback_index = current_id
            .and_then(|id| self.global_fallback.iter().position(|v| &v.id == id))
            .filter(|position| position + 1 < self.global_fallback.len())
            .map(|position| position + 1)
            .unwrap_or(0);

        self.global_fallback
            .get(fallback_index)
            .map(|video| NextUp {
                row_key: RowKey::global_fallback(),
                index: fallback_index,
                video: video.clone(),
            })
    }
}
