use async_trait::async_trait;
use reeltv::Result;
use reeltv::data::SubtitleTrack;
use reeltv::models::Video;
use reeltv::player::PlaybackHost;
use std::sync::{Arc, Mutex};

pub const FAKE_DURATION_MS: i64 = 10_000;

#[derive(Debug, Default)]
pub struct FakeHostState {
    pub loads: Vec<(String, i64)>,
    pub seeks: Vec<i64>,
    pub position_ms: i64,
    pub duration_ms: i64,
    pub playing: bool,
    pub subtitle: Option<String>,
}

/// Recording media host; clones share state so tests can inspect a host the session owns
#[derive(Debug, Clone, Default)]
pub struct FakeHost {
    pub state: Arc<Mutex<FakeHostState>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_position(&self, position_ms: i64, duration_ms: i64) {
        let mut state = self.state.lock().unwrap();
        state.position_ms = position_ms;
        state.duration_ms = duration_ms;
    }

    pub fn loads(&self) -> Vec<(String, i64)> {
        self.state.lock().unwrap().loads.clone()
    }

    pub fn last_loaded(&self) -> Option<String> {
        self.loads().last().map(|(id, _)| id.clone())
    }

    pub fn seeks(&self) -> Vec<i64> {
        self.state.lock().unwrap().seeks.clone()
    }

    pub fn playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    pub fn subtitle(&self) -> Option<String> {
        self.state.lock().unwrap().subtitle.clone()
    }
}

#[async_trait]
impl PlaybackHost for FakeHost {
    async fn load_and_play(
        &mut self,
        video: &Video,
        start_position_ms: i64,
        _subtitles: &[SubtitleTrack],
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.loads.push((video.id.to_string(), start_position_ms));
        state.position_ms = start_position_ms;
        state.duration_ms = FAKE_DURATION_MS;
        state.playing = true;
        Ok(())
    }

    async fn seek_to(&mut self, position_ms: i64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.seeks.push(position_ms);
        state.position_ms = position_ms;
        Ok(())
    }

    async fn position_ms(&self) -> Result<i64> {
        Ok(self.state.lock().unwrap().position_ms)
    }

    async fn duration_ms(&self) -> Result<i64> {
        Ok(self.state.lock().unwrap().duration_ms)
    }

    async fn set_playing(&mut self, playing: bool) -> Result<()> {
        self.state.lock().unwrap().playing = playing;
        Ok(())
    }

    async fn is_playing(&self) -> Result<bool> {
        Ok(self.state.lock().unwrap().playing)
    }

    async fn set_subtitle_track(&mut self, track: Option<&SubtitleTrack>) -> Result<()> {
        self.state.lock().unwrap().subtitle = track.map(|track| track.id.clone());
        Ok(())
    }
}
