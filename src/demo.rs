//! Stand-in media engine for running the client without a real player.
//!
//! Playback time is simulated: every item lasts a fixed number of seconds and reports
//! `Ended` when it runs out.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

use reeltv::data::SubtitleTrack;
use reeltv::models::Video;
use reeltv::player::{DiscontinuityReason, HostEvent, PlaybackHost, PlaybackState, RemoteKey};
use reeltv::{AppError, Result};

const SIMULATED_DURATION_MS: i64 = 12_000;

#[derive(Debug, Default)]
struct Playback {
    video_id: String,
    /// Position at the moment `resumed_at` was taken
    base_ms: i64,
    duration_ms: i64,
    resumed_at: Option<Instant>,
    generation: u64,
}

impl Playback {
    fn position_ms(&self) -> i64 {
        let elapsed = self
            .resumed_at
            .map(|at| i64::try_from(at.elapsed().as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        self.base_ms.saturating_add(elapsed).min(self.duration_ms)
    }
}

pub struct SimulatedHost {
    state: Arc<Mutex<Playback>>,
    events: mpsc::UnboundedSender<HostEvent>,
}

impl SimulatedHost {
    pub fn new(events: mpsc::UnboundedSender<HostEvent>) -> Self {
        Self {
            state: Arc::new(Mutex::new(Playback::default())),
            events,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Playback>> {
        self.state
            .lock()
            .map_err(|_| AppError::Playback("simulated host state poisoned".to_string()))
    }

    /// Start the clock and arrange for `Ended` once the item runs out
    fn resume(&self, state: &mut Playback) {
        state.generation += 1;
        state.resumed_at = Some(Instant::now());
        let remaining = u64::try_from(state.duration_ms - state.base_ms).unwrap_or(0);

        let generation = state.generation;
        let shared = self.state.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(remaining)).await;
            let Ok(mut state) = shared.lock() else {
                return;
            };
            if state.generation != generation {
                return;
            }
            state.base_ms = state.duration_ms;
            state.resumed_at = None;
            info!(video_id = %state.video_id, "Simulated playback ended");
            let _ = events.send(HostEvent::IsPlayingChanged(false));
            let _ = events.send(HostEvent::StateChanged(PlaybackState::Ended));
        });
    }

    fn freeze(state: &mut Playback) {
        state.base_ms = state.position_ms();
        state.resumed_at = None;
        state.generation += 1;
    }
}

#[async_trait]
impl PlaybackHost for SimulatedHost {
    async fn load_and_play(
        &mut self,
        video: &Video,
        start_position_ms: i64,
        subtitles: &[SubtitleTrack],
    ) -> Result<()> {
        let mut state = self.lock()?;
        Self::freeze(&mut state);
        state.video_id = video.id.to_string();
        state.duration_ms = SIMULATED_DURATION_MS;
        state.base_ms = start_position_ms.clamp(0, SIMULATED_DURATION_MS);
        println!(
            "▶ {} [{}] ({} subtitle tracks)",
            video.title,
            video.category,
            subtitles.len()
        );
        self.resume(&mut state);
        drop(state);

        let _ = self.events.send(HostEvent::StateChanged(PlaybackState::Ready));
        let _ = self.events.send(HostEvent::IsPlayingChanged(true));
        Ok(())
    }

    async fn seek_to(&mut self, position_ms: i64) -> Result<()> {
        let mut state = self.lock()?;
        let playing = state.resumed_at.is_some();
        Self::freeze(&mut state);
        state.base_ms = position_ms.clamp(0, state.duration_ms);
        debug!(position_ms = state.base_ms, "Simulated seek");
        if playing {
            self.resume(&mut state);
        }
        drop(state);

        let _ = self.events.send(HostEvent::PositionDiscontinuity {
            reason: DiscontinuityReason::UserSeek,
        });
        Ok(())
    }

    async fn position_ms(&self) -> Result<i64> {
        Ok(self.lock()?.position_ms())
    }

    async fn duration_ms(&self) -> Result<i64> {
        Ok(self.lock()?.duration_ms)
    }

    async fn set_playing(&mut self, playing: bool) -> Result<()> {
        let mut state = self.lock()?;
        if playing == state.resumed_at.is_some() {
            return Ok(());
        }
        if playing {
            if state.base_ms >= state.duration_ms {
                state.base_ms = 0;
            }
            self.resume(&mut state);
        } else {
            Self::freeze(&mut state);
        }
        drop(state);

        let _ = self.events.send(HostEvent::IsPlayingChanged(playing));
        Ok(())
    }

    async fn is_playing(&self) -> Result<bool> {
        Ok(self.lock()?.resumed_at.is_some())
    }

    async fn set_subtitle_track(&mut self, track: Option<&SubtitleTrack>) -> Result<()> {
        match track {
            Some(track) => println!("  subtitles: {} ({})", track.label, track.asset_uri()),
            None => println!("  subtitles: off"),
        }
        Ok(())
    }
}

/// Map a typed command to a remote key
pub fn parse_key(input: &str) -> Option<RemoteKey> {
    let key = match input.trim().to_lowercase().as_str() {
        "left" | "h" => RemoteKey::Left,
        "right" | "l" => RemoteKey::Right,
        "up" | "k" => RemoteKey::Up,
        "down" | "j" => RemoteKey::Down,
        "ok" | "enter" | "" => RemoteKey::Ok,
        "back" | "q" => RemoteKey::Back,
        "play" | "pause" | "p" => RemoteKey::PlayPause,
        "rew" | "rewind" => RemoteKey::Rewind,
        "ff" | "forward" => RemoteKey::FastForward,
        "s" | "subs" => RemoteKey::Subtitles,
        _ => return None,
    };
    Some(key)
}
