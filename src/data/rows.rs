use tracing::debug;

use crate::data::Catalog;
use crate::models::{RowKey, Video, VideoId};
use crate::storage::{FavoritesStore, ProgressTracker};

pub const CONTINUE_WATCHING_TITLE: &str = "Continue Watching";
pub const MY_LIST_TITLE: &str = "My List";

/// One browse row on the home screen
#[derive(Debug, Clone, PartialEq)]
pub struct HomeRow {
    pub key: RowKey,
    pub title: String,
    pub videos: Vec<Video>,
}

/// Everything the player needs to know about where a video was launched from
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchContext {
    pub video: Video,
    pub row_key: RowKey,
    /// Row order captured at launch; empty when the row is resolved from its key
    pub row_video_ids: Vec<VideoId>,
    pub current_index: usize,
    pub resume_position_ms: i64,
}

impl LaunchContext {
    /// Launch outside any row, e.g. from search or the details screen
    pub fn standalone(video: Video, resume_position_ms: i64) -> Self {
        Self {
            video,
            row_key: RowKey::new(""),
            row_video_ids: Vec::new(),
            current_index: 0,
            resume_position_ms: resume_position_ms.max(0),
        }
    }
}

/// Rebuilds ordered rows from a row key against the catalog and the local stores
pub struct RowResolver<'a> {
    catalog: &'a Catalog,
    favorites: &'a FavoritesStore,
    progress: &'a ProgressTracker,
}

impl<'a> RowResolver<'a> {
    pub fn new(
        catalog: &'a Catalog,
        favorites: &'a FavoritesStore,
        progress: &'a ProgressTracker,
    ) -> Self {
        Self {
            catalog,
            favorites,
            progress,
        }
    }

    /// Ordered videos of a row.
    ///
    /// Explicit ids win and keep their order. Otherwise derived rows are read from their
    /// stores and any other key names a category; a blank key means the category of
    /// `current`. Unknown ids are dropped.
    pub fn resolve(&self, row_key: &RowKey, explicit_ids: &[VideoId], current: &Video) -> Vec<Video> {
        if !explicit_ids.is_empty() {
            return self.catalog.resolve_ids(explicit_ids);
        }

        let videos = match row_key.as_str() {
            RowKey::FAVORITES => self.favorites.videos(self.catalog),
            RowKey::CONTINUE_WATCHING => self
                .progress
                .list_in_progress(self.catalog)
                .into_iter()
                .map(|entry| entry.video)
                .collect(),
            RowKey::GLOBAL_FALLBACK => self.catalog.global_fallback(),
            _ if row_key.is_blank() => self.catalog.videos_for_category(&current.category),
            category => self.catalog.videos_for_category(category),
        };
        debug!(row_key = %row_key, count = videos.len(), "Resolved row from key");
        videos
    }

    /// Continue Watching and My List when non-empty, then one row per category
    pub fn home_rows(&self) -> Vec<HomeRow> {
        let mut rows = Vec::with_capacity(self.catalog.categories().len() + 2);

        let in_progress: Vec<Video> = self
            .progress
            .list_in_progress(self.catalog)
            .into_iter()
            .map(|entry| entry.video)
            .collect();
        if !in_progress.is_empty() {
            rows.push(HomeRow {
                key: RowKey::continue_watching(),
                title: CONTINUE_WATCHING_TITLE.to_string(),
                videos: in_progress,
            });
        }

        let favorites = self.favorites.videos(self.catalog);
        if !favorites.is_empty() {
            rows.push(HomeRow {
                key: RowKey::favorites(),
                title: MY_LIST_TITLE.to_string(),
                videos: favorites,
            });
        }

        rows.extend(self.catalog.categories().iter().map(|category| HomeRow {
            key: RowKey::new(category.as_str()),
            title: category.clone(),
            videos: self.catalog.videos_for_category(category),
        }));
        rows
    }

    /// Launch context for the item at `index` of `row`, resuming from saved progress
    pub fn launch_from_row(&self, row: &HomeRow, index: usize) -> Option<LaunchContext> {
        let video = row.videos.get(index)?.clone();
        let resume_position_ms = self
            .progress
            .progress(video.id.as_str())
            .map(|record| record.position_ms)
            .unwrap_or(0);

        Some(LaunchContext {
            row_key: row.key.clone(),
            row_video_ids: row.videos.iter().map(|v| v.id.clone()).collect(),
            current_index: index,
            resume_position_ms,
            video,
        })
    }
}
