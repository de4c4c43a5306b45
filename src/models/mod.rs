mod identifiers;
pub mod row_context;

pub use identifiers::{RowKey, VideoId};
pub use row_context::{NextUp, RowContext};

use serde::{Deserialize, Serialize};

/// A single catalog entry. Defined once in the catalog and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    pub category: String,
    pub thumbnail_url: String,
    pub description: String,
    pub video_url: String,
}

impl Video {
    pub fn new(id: impl Into<VideoId>, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            thumbnail_url: String::new(),
            description: String::new(),
            video_url: String::new(),
        }
    }

    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = url.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = url.into();
        self
    }
}
