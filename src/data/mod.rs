pub mod catalog;
pub mod rows;
pub mod search;
pub mod subtitles;

pub use catalog::Catalog;
pub use rows::{HomeRow, LaunchContext, RowResolver};
pub use search::{DEFAULT_SEARCH_LIMIT, VideoSearchIndex};
pub use subtitles::{SubtitleTrack, SubtitlesRepository};
