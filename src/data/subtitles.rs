use serde::{Deserialize, Serialize};

pub const MIME_TEXT_VTT: &str = "text/vtt";
pub const MIME_SUBRIP: &str = "application/x-subrip";

/// A subtitle file bundled with the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    pub id: String,
    pub label: String,
    pub asset_path: String,
    pub mime_type: String,
    pub language: Option<String>,
}

impl SubtitleTrack {
    /// URI the playback host loads the track from
    pub fn asset_uri(&self) -> String {
        format!("asset:///{}", self.asset_path)
    }
}

/// Local subtitle tracks available per video
pub struct SubtitlesRepository;

impl SubtitlesRepository {
    pub fn tracks_for_video(video_id: &str) -> Vec<SubtitleTrack> {
        match video_id {
            "v1" => vec![english("subtitles/v1_en.vtt", MIME_TEXT_VTT)],
            "v2" => vec![english("subtitles/v2_en.srt", MIME_SUBRIP)],
            _ => Vec::new(),
        }
    }
}

fn english(asset_path: &str, mime_type: &str) -> SubtitleTrack {
    SubtitleTrack {
        id: "en".to_string(),
        label: "English".to_string(),
        asset_path: asset_path.to_string(),
        mime_type: mime_type.to_string(),
        language: Some("en".to_string()),
    }
}
