use tokio::sync::mpsc;

use crate::constants::AUTOPLAY_TOTAL_MS;
use crate::models::NextUp;

/// What the end-of-video overlay is offering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoplayMode {
    /// Counting down to the selected candidate
    #[default]
    NextUp,
    /// Nothing left to play, offering to restart the finished video
    Replay,
}

/// Snapshot of the autoplay overlay, emitted after every change
#[derive(Debug, Clone, PartialEq)]
pub struct AutoplayState {
    pub visible: bool,
    /// Always `None` in [`AutoplayMode::Replay`]
    pub next_up: Option<NextUp>,
    pub remaining_ms: u64,
    pub total_ms: u64,
    pub mode: AutoplayMode,
}

impl AutoplayState {
    pub fn hidden() -> Self {
        Self {
            visible: false,
            next_up: None,
            remaining_ms: AUTOPLAY_TOTAL_MS,
            total_ms: AUTOPLAY_TOTAL_MS,
            mode: AutoplayMode::NextUp,
        }
    }

    /// Whole seconds left, rounded up, as shown on the countdown
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms.div_ceil(1_000)
    }
}

/// Notifications flowing out of the autoplay coordinator
#[derive(Debug, Clone, PartialEq)]
pub enum AutoplayEvent {
    StateChanged(AutoplayState),
    PlayRequested(NextUp),
    /// The user actively dismissed the prompt
    Canceled,
}

/// Receives coordinator output synchronously, in the order it was produced
pub trait AutoplayListener: Send {
    fn on_state_changed(&mut self, state: AutoplayState);
    fn on_play_requested(&mut self, next_up: NextUp);
    fn on_canceled(&mut self);
}

impl AutoplayListener for mpsc::UnboundedSender<AutoplayEvent> {
    fn on_state_changed(&mut self, state: AutoplayState) {
        let _ = self.send(AutoplayEvent::StateChanged(state));
    }

    fn on_play_requested(&mut self, next_up: NextUp) {
        let _ = self.send(AutoplayEvent::PlayRequested(next_up));
    }

    fn on_canceled(&mut self) {
        let _ = self.send(AutoplayEvent::Canceled);
    }
}
