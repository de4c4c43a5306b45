use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::autoplay_controller::AutoplayHandle;
use super::host::{DiscontinuityReason, HostEvent, PlaybackHost, PlaybackState};
use super::types::{AutoplayEvent, AutoplayMode, AutoplayState};
use crate::config::PlaybackConfig;
use crate::constants::COMPLETE_PERCENT;
use crate::data::{Catalog, LaunchContext, RowResolver, SubtitleTrack, SubtitlesRepository};
use crate::models::{NextUp, RowContext, RowKey, Video, VideoId};
use crate::storage::{Stores, TRACK_ID_OFF, watched_percent};
use crate::utils::Result;

/// Remote-control keys the player screen reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteKey {
    Left,
    Right,
    Up,
    Down,
    Ok,
    Back,
    PlayPause,
    Rewind,
    FastForward,
    /// Quick subtitle toggle
    Subtitles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
    /// The user asked to leave the player
    NavigateBack,
}

/// Single owner of one video's playback: wires host events, remote keys and autoplay
/// together and keeps the local stores up to date.
pub struct PlaybackSession<H: PlaybackHost> {
    host: H,
    catalog: Arc<Catalog>,
    stores: Stores,
    autoplay: AutoplayHandle,
    config: PlaybackConfig,

    video: Video,
    row_key: RowKey,
    row_video_ids: Vec<VideoId>,
    current_index: usize,
    resume_position_ms: i64,
    /// Set once the user dismisses autoplay; cleared when another item starts
    autoplay_canceled: bool,
    last_context: Option<RowContext>,
    overlay: AutoplayState,

    subtitle_tracks: Vec<SubtitleTrack>,
    selected_track_id: String,
}

impl<H: PlaybackHost> std::fmt::Debug for PlaybackSession<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("video", &self.video.id)
            .field("row_key", &self.row_key)
            .field("current_index", &self.current_index)
            .field("autoplay_canceled", &self.autoplay_canceled)
            .finish()
    }
}

impl<H: PlaybackHost> PlaybackSession<H> {
    pub fn new(
        host: H,
        catalog: Arc<Catalog>,
        stores: Stores,
        autoplay: AutoplayHandle,
        config: PlaybackConfig,
        launch: LaunchContext,
    ) -> Self {
        Self {
            host,
            catalog,
            stores,
            autoplay,
            config,
            video: launch.video,
            row_key: launch.row_key,
            row_video_ids: launch.row_video_ids,
            current_index: launch.current_index,
            resume_position_ms: launch.resume_position_ms.max(0),
            autoplay_canceled: false,
            last_context: None,
            overlay: AutoplayState::hidden(),
            subtitle_tracks: Vec::new(),
            selected_track_id: TRACK_ID_OFF.to_string(),
        }
    }

    pub fn video(&self) -> &Video {
        &self.video
    }

    pub fn row_key(&self) -> &RowKey {
        &self.row_key
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Last overlay snapshot received from autoplay
    pub fn overlay(&self) -> &AutoplayState {
        &self.overlay
    }

    pub fn autoplay_canceled(&self) -> bool {
        self.autoplay_canceled
    }

    pub fn subtitle_tracks(&self) -> &[SubtitleTrack] {
        &self.subtitle_tracks
    }

    pub fn selected_track_id(&self) -> &str {
        &self.selected_track_id
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Load the launch video and restore its subtitle choice
    pub async fn start(&mut self) -> Result<()> {
        info!(
            video_id = %self.video.id,
            row_key = %self.row_key,
            resume_position_ms = self.resume_position_ms,
            "Starting playback"
        );
        self.load_current().await
    }

    async fn load_current(&mut self) -> Result<()> {
        self.refresh_subtitles()?;
        self.host
            .load_and_play(&self.video, self.resume_position_ms, &self.subtitle_tracks)
            .await?;
        self.apply_subtitle_track().await
    }

    pub async fn handle_host_event(&mut self, event: HostEvent) -> Result<()> {
        match event {
            HostEvent::IsPlayingChanged(playing) => {
                self.persist_progress().await?;
                // starting playback of any kind closes the prompt
                if playing && self.autoplay.is_active().await? {
                    self.autoplay.cancel(false)?;
                }
            }
            HostEvent::StateChanged(PlaybackState::Ended) => {
                self.stores.progress.clear_progress(self.video.id.as_str())?;

                if self.autoplay_canceled || !self.config.autoplay_enabled {
                    debug!(video_id = %self.video.id, "Video ended, autoplay disabled for this item");
                } else {
                    self.start_autoplay_flow()?;
                }
            }
            HostEvent::StateChanged(_) => self.persist_progress().await?,
            HostEvent::PositionDiscontinuity { reason } => {
                if reason == DiscontinuityReason::UserSeek && self.autoplay.is_active().await? {
                    self.cancel_autoplay("seek discontinuity").await?;
                }
            }
        }
        Ok(())
    }

    pub async fn handle_autoplay_event(&mut self, event: AutoplayEvent) -> Result<()> {
        match event {
            AutoplayEvent::StateChanged(state) => self.overlay = state,
            AutoplayEvent::PlayRequested(next_up) => {
                // a prompt that already closed cannot hand off any more
                if !self.autoplay.is_active().await? {
                    debug!(video_id = %next_up.video.id, "Dropping stale play request");
                    return Ok(());
                }
                self.play_next_up(next_up).await?;
            }
            AutoplayEvent::Canceled => {
                self.overlay.visible = false;
                debug!("Autoplay dismissed by the user");
            }
        }
        Ok(())
    }

    pub async fn handle_key(&mut self, key: RemoteKey) -> Result<KeyOutcome> {
        let prompt = self.autoplay.state().await?;
        if prompt.visible {
            return self.handle_prompt_key(key, prompt.mode).await;
        }

        let outcome = match key {
            RemoteKey::Back => {
                self.cancel_autoplay("back").await?;
                KeyOutcome::NavigateBack
            }
            RemoteKey::Left | RemoteKey::Rewind => {
                self.seek_by(-self.config.seek_step_ms).await?;
                KeyOutcome::Handled
            }
            RemoteKey::Right | RemoteKey::FastForward => {
                self.seek_by(self.config.seek_step_ms).await?;
                KeyOutcome::Handled
            }
            RemoteKey::Ok | RemoteKey::PlayPause => {
                self.toggle_play_pause().await?;
                KeyOutcome::Handled
            }
            RemoteKey::Subtitles => {
                self.toggle_subtitles().await?;
                KeyOutcome::Handled
            }
            RemoteKey::Up | RemoteKey::Down => KeyOutcome::Ignored,
        };
        Ok(outcome)
    }

    async fn handle_prompt_key(&mut self, key: RemoteKey, mode: AutoplayMode) -> Result<KeyOutcome> {
        let outcome = match key {
            RemoteKey::Left => moved(self.autoplay.move_candidate_left().await?),
            RemoteKey::Right => moved(self.autoplay.move_candidate_right().await?),
            RemoteKey::Up => {
                self.cancel_autoplay("dismissed").await?;
                KeyOutcome::Handled
            }
            RemoteKey::Ok if mode == AutoplayMode::Replay => {
                self.replay_current().await?;
                KeyOutcome::Handled
            }
            RemoteKey::Ok => {
                self.autoplay.play_now()?;
                KeyOutcome::Handled
            }
            RemoteKey::Back => {
                self.cancel_autoplay("back").await?;
                KeyOutcome::NavigateBack
            }
            _ => KeyOutcome::Ignored,
        };
        Ok(outcome)
    }

    /// Save the current position; finished videos lose their progress instead
    pub async fn persist_progress(&mut self) -> Result<()> {
        let duration_ms = self.host.duration_ms().await?;
        if duration_ms <= 0 {
            return Ok(());
        }
        let position_ms = self.host.position_ms().await?;
        let video_id = self.video.id.as_str();

        if watched_percent(position_ms, duration_ms) >= COMPLETE_PERCENT {
            self.stores.progress.clear_progress(video_id)
        } else {
            self.stores
                .progress
                .set_progress(video_id, position_ms, duration_ms)
        }
    }

    /// Leave the player: autoplay is dismissed and the position saved
    pub async fn stop(&mut self) -> Result<()> {
        self.cancel_autoplay("stop").await?;
        self.persist_progress().await
    }

    fn start_autoplay_flow(&mut self) -> Result<()> {
        let resolver = RowResolver::new(
            &self.catalog,
            &self.stores.favorites,
            &self.stores.progress,
        );
        let row_videos = resolver.resolve(&self.row_key, &self.row_video_ids, &self.video);

        let current_index = row_videos
            .iter()
            .position(|video| video.id == self.video.id)
            .unwrap_or_else(|| self.current_index.min(row_videos.len().saturating_sub(1)));

        self.stores
            .last_played
            .set_last_index(self.row_key.as_str(), current_index)?;

        let context = RowContext::new(self.row_key.clone(), row_videos, current_index)
            .with_global_fallback(self.catalog.global_fallback());
        debug!(
            row_key = %context.row_key,
            row_len = context.row_videos.len(),
            current_index,
            "Starting autoplay flow"
        );
        self.last_context = Some(context.clone());
        self.autoplay.start_on_ended(context)
    }

    async fn play_next_up(&mut self, next_up: NextUp) -> Result<()> {
        self.autoplay.cancel(false)?;

        // the next item's row is the sequence the candidate was picked from
        let row_video_ids = self
            .last_context
            .take()
            .map(|context| {
                let source = if next_up.row_key.is_global_fallback() {
                    context.global_fallback
                } else {
                    context.row_videos
                };
                source.into_iter().map(|video| video.id).collect()
            })
            .unwrap_or_default();

        info!(
            video_id = %next_up.video.id,
            row_key = %next_up.row_key,
            index = next_up.index,
            "Playing next up"
        );
        self.video = next_up.video;
        self.row_key = next_up.row_key;
        self.current_index = next_up.index;
        self.row_video_ids = row_video_ids;
        self.resume_position_ms = 0;
        self.autoplay_canceled = false;

        self.load_current().await
    }

    async fn replay_current(&mut self) -> Result<()> {
        info!(video_id = %self.video.id, "Replaying from the start");
        self.autoplay.replay()?;
        // replaying is a dismissal: the item does not autoplay when it ends again
        self.autoplay_canceled = true;
        self.overlay.visible = false;
        self.host.seek_to(0).await?;
        self.host.set_playing(true).await
    }

    async fn cancel_autoplay(&mut self, reason: &str) -> Result<()> {
        self.autoplay_canceled = true;
        if self.autoplay.is_active().await? {
            info!(reason, "Canceling autoplay");
            self.autoplay.cancel(true)?;
        }
        self.overlay.visible = false;
        Ok(())
    }

    async fn toggle_play_pause(&mut self) -> Result<()> {
        if self.autoplay.is_active().await? {
            self.cancel_autoplay("manual play/pause").await?;
        }
        let playing = self.host.is_playing().await?;
        self.host.set_playing(!playing).await
    }

    async fn seek_by(&mut self, delta_ms: i64) -> Result<()> {
        if self.autoplay.is_active().await? {
            self.cancel_autoplay("seek").await?;
        }
        let position_ms = self.host.position_ms().await?;
        let duration_ms = self.host.duration_ms().await?.max(0);
        let target = position_ms.saturating_add(delta_ms).clamp(0, duration_ms);
        self.host.seek_to(target).await
    }

    /// Reload tracks for the current video and drop a saved choice that no longer exists
    fn refresh_subtitles(&mut self) -> Result<()> {
        let video_id = self.video.id.as_str();
        self.subtitle_tracks = SubtitlesRepository::tracks_for_video(video_id);

        let mut selected = self
            .stores
            .subtitles
            .selected_track_id(video_id)
            .unwrap_or_else(|| TRACK_ID_OFF.to_string());

        if selected != TRACK_ID_OFF && !self.has_track(&selected) {
            warn!(video_id, track_id = %selected, "Saved subtitle track is gone, turning subtitles off");
            selected = TRACK_ID_OFF.to_string();
            self.stores
                .subtitles
                .set_selected_track_id(video_id, Some(TRACK_ID_OFF))?;
        }
        self.selected_track_id = selected;
        Ok(())
    }

    fn has_track(&self, track_id: &str) -> bool {
        self.subtitle_tracks.iter().any(|track| track.id == track_id)
    }

    async fn apply_subtitle_track(&mut self) -> Result<()> {
        let track = self
            .subtitle_tracks
            .iter()
            .find(|track| track.id == self.selected_track_id);
        self.host.set_subtitle_track(track).await
    }

    async fn apply_subtitle_selection(&mut self, track_id: String) -> Result<()> {
        self.stores
            .subtitles
            .set_selected_track_id(self.video.id.as_str(), Some(&track_id))?;
        debug!(track_id = %track_id, "Subtitle selection applied");
        self.selected_track_id = track_id;
        self.apply_subtitle_track().await
    }

    /// Turn subtitles off, or back on with the saved track or else the first one
    pub async fn toggle_subtitles(&mut self) -> Result<()> {
        let Some(first) = self.subtitle_tracks.first() else {
            return Ok(());
        };

        let next = if self.selected_track_id == TRACK_ID_OFF {
            self.stores
                .subtitles
                .selected_track_id(self.video.id.as_str())
                .filter(|saved| saved != TRACK_ID_OFF && self.has_track(saved))
                .unwrap_or_else(|| first.id.clone())
        } else {
            TRACK_ID_OFF.to_string()
        };
        self.apply_subtitle_selection(next).await
    }

    /// Select from the subtitle menu, where entry 0 is "Off" and entry `n` is track `n - 1`
    pub async fn select_subtitle_by_index(&mut self, index: usize) -> Result<()> {
        if self.subtitle_tracks.is_empty() {
            return Ok(());
        }
        let track_id = index
            .checked_sub(1)
            .and_then(|i| self.subtitle_tracks.get(i))
            .map(|track| track.id.clone())
            .unwrap_or_else(|| TRACK_ID_OFF.to_string());
        self.apply_subtitle_selection(track_id).await
    }

    /// Drive the session until the user navigates back or `shutdown` fires.
    ///
    /// Progress is persisted on the configured interval. Errors from individual events
    /// are logged and do not end the session. Returns the host once playback stopped.
    pub async fn run(
        mut self,
        mut host_events: mpsc::UnboundedReceiver<HostEvent>,
        mut keys: mpsc::UnboundedReceiver<RemoteKey>,
        mut autoplay_events: mpsc::UnboundedReceiver<AutoplayEvent>,
        shutdown: CancellationToken,
    ) -> Result<H> {
        self.start().await?;

        let mut persist = time::interval(self.config.progress_persist_interval());
        persist.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let result = tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,
                Some(event) = autoplay_events.recv() => self.handle_autoplay_event(event).await,
                Some(event) = host_events.recv() => self.handle_host_event(event).await,
                Some(key) = keys.recv() => match self.handle_key(key).await {
                    Ok(KeyOutcome::NavigateBack) => break,
                    other => other.map(|_| ()),
                },
                _ = persist.tick() => self.persist_progress().await,
            };

            if let Err(e) = result {
                warn!("Playback session error: {}", e);
            }
        }

        self.stop().await?;
        self.autoplay.shutdown();
        info!(video_id = %self.video.id, "Playback session ended");
        Ok(self.host)
    }
}

fn moved(moved: bool) -> KeyOutcome {
    if moved {
        KeyOutcome::Handled
    } else {
        KeyOutcome::Ignored
    }
}
