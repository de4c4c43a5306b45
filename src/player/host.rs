use async_trait::async_trait;

use crate::data::SubtitleTrack;
use crate::models::Video;
use crate::utils::Result;

/// Why the playback position jumped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscontinuityReason {
    UserSeek,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Buffering,
    Ready,
    /// Reported exactly once per item
    Ended,
}

/// Notifications from the media engine
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    IsPlayingChanged(bool),
    StateChanged(PlaybackState),
    PositionDiscontinuity { reason: DiscontinuityReason },
}

/// The media engine a playback session drives
#[async_trait]
pub trait PlaybackHost: Send + Sync {
    /// Replace the current item and start playing from `start_position_ms`
    async fn load_and_play(
        &mut self,
        video: &Video,
        start_position_ms: i64,
        subtitles: &[SubtitleTrack],
    ) -> Result<()>;
    async fn seek_to(&mut self, position_ms: i64) -> Result<()>;
    async fn position_ms(&self) -> Result<i64>;
    /// Non-positive until the duration is known
    async fn duration_ms(&self) -> Result<i64>;
    async fn set_playing(&mut self, playing: bool) -> Result<()>;
    async fn is_playing(&self) -> Result<bool>;
    /// `None` disables text tracks
    async fn set_subtitle_track(&mut self, track: Option<&SubtitleTrack>) -> Result<()>;
}
