use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, trace};

use super::types::{AutoplayListener, AutoplayMode, AutoplayState};
use crate::constants::AUTOPLAY_TOTAL_MS;
use crate::models::{NextUp, RowContext};

#[derive(Debug, Clone)]
struct Countdown {
    remaining_ms: u64,
    last_tick: Option<Instant>,
}

impl Countdown {
    fn new() -> Self {
        Self {
            remaining_ms: AUTOPLAY_TOTAL_MS,
            last_tick: None,
        }
    }

    /// Drain the monotonic time elapsed since the previous tick. The first tick drains nothing.
    fn advance(&mut self, now: Instant) -> u64 {
        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_tick = Some(now);

        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        self.remaining_ms
    }
}

#[derive(Debug, Clone, Default)]
enum Phase {
    #[default]
    Idle,
    CountingDown {
        context: RowContext,
        next_up: NextUp,
        countdown: Countdown,
    },
    /// The countdown ran out and playback of `next_up` was requested
    HandedOff { next_up: NextUp },
    Replay { countdown: Countdown },
}

/// Decides what plays after a video ends and runs the "Next Up" countdown.
///
/// All state lives in a single [`Phase`] value that each operation replaces as a whole.
/// Every operation emits its resulting [`AutoplayState`] to the listener before it
/// returns. Ticks carry the generation they were scheduled for; starting or canceling
/// bumps the generation so ticks scheduled earlier are ignored.
pub struct AutoplayCoordinator {
    phase: Phase,
    generation: u64,
    listener: Option<Box<dyn AutoplayListener>>,
}

impl std::fmt::Debug for AutoplayCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoplayCoordinator")
            .field("phase", &self.phase)
            .field("generation", &self.generation)
            .field("listener", &self.listener.as_ref().map(|_| "<AutoplayListener>"))
            .finish()
    }
}

impl Default for AutoplayCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoplayCoordinator {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
            listener: None,
        }
    }

    pub fn set_listener(&mut self, listener: Option<Box<dyn AutoplayListener>>) {
        self.listener = listener;
    }

    /// Generation that ticks must carry to be applied
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the countdown wants periodic ticks
    pub fn is_ticking(&self) -> bool {
        matches!(self.phase, Phase::CountingDown { .. })
    }

    /// True while a countdown or replay prompt is shown
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    pub fn state(&self) -> AutoplayState {
        match &self.phase {
            Phase::Idle => AutoplayState::hidden(),
            Phase::CountingDown {
                next_up, countdown, ..
            } => AutoplayState {
                visible: true,
                next_up: Some(next_up.clone()),
                remaining_ms: countdown.remaining_ms,
                total_ms: AUTOPLAY_TOTAL_MS,
                mode: AutoplayMode::NextUp,
            },
            Phase::HandedOff { next_up } => AutoplayState {
                visible: true,
                next_up: Some(next_up.clone()),
                remaining_ms: 0,
                total_ms: AUTOPLAY_TOTAL_MS,
                mode: AutoplayMode::NextUp,
            },
            Phase::Replay { countdown } => AutoplayState {
                visible: true,
                next_up: None,
                remaining_ms: countdown.remaining_ms,
                total_ms: AUTOPLAY_TOTAL_MS,
                mode: AutoplayMode::Replay,
            },
        }
    }

    /// Begin the end-of-video flow for `context`.
    ///
    /// Enters the countdown when a candidate exists, otherwise the replay prompt, which
    /// has no timeout of its own.
    pub fn start_on_ended(&mut self, context: RowContext) {
        self.generation = self.generation.wrapping_add(1);

        self.phase = match context.next_up_candidate() {
            Some(next_up) => {
                info!(
                    row_key = %next_up.row_key,
                    index = next_up.index,
                    video_id = %next_up.video.id,
                    "Starting next-up countdown"
                );
                Phase::CountingDown {
                    context,
                    next_up,
                    countdown: Countdown::new(),
                }
            }
            None => {
                info!(row_key = %context.row_key, "No next-up candidate, offering replay");
                Phase::Replay {
                    countdown: Countdown::new(),
                }
            }
        };

        self.emit_state();
    }

    /// Apply one timer tick observed at `now`.
    ///
    /// Returns whether further ticks are wanted. Ticks from an older generation have no
    /// effect.
    pub fn tick(&mut self, generation: u64, now: Instant) -> bool {
        if generation != self.generation {
            trace!(generation, current = self.generation, "Ignoring stale tick");
            return false;
        }

        let remaining = match &mut self.phase {
            Phase::CountingDown { countdown, .. } | Phase::Replay { countdown } => {
                countdown.advance(now)
            }
            Phase::Idle | Phase::HandedOff { .. } => return false,
        };
        self.emit_state();

        if remaining > 0 {
            return self.is_ticking();
        }

        match std::mem::take(&mut self.phase) {
            Phase::CountingDown { next_up, .. } => {
                info!(video_id = %next_up.video.id, "Countdown finished, requesting playback");
                self.phase = Phase::HandedOff {
                    next_up: next_up.clone(),
                };
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_play_requested(next_up);
                }
            }
            phase => {
                // replay prompts never auto-trigger
                self.phase = phase;
                self.cancel(false);
            }
        }
        false
    }

    pub fn move_candidate_left(&mut self) -> bool {
        self.move_candidate(false)
    }

    pub fn move_candidate_right(&mut self) -> bool {
        self.move_candidate(true)
    }

    /// Step the candidate within the row. The countdown keeps draining.
    fn move_candidate(&mut self, forward: bool) -> bool {
        let Phase::CountingDown {
            context, next_up, ..
        } = &mut self.phase
        else {
            return false;
        };

        let target = if forward {
            next_up.index.checked_add(1)
        } else {
            next_up.index.checked_sub(1)
        };
        let Some(candidate) = target.and_then(|index| context.candidate_at(index)) else {
            return false;
        };

        debug!(
            from = next_up.index,
            to = candidate.index,
            video_id = %candidate.video.id,
            "Next-up candidate changed"
        );
        *next_up = candidate;
        self.emit_state();
        true
    }

    /// Request the current candidate right away. Ticking continues until the caller cancels.
    pub fn play_now(&mut self) {
        let Phase::CountingDown { next_up, .. } = &self.phase else {
            return;
        };
        let next_up = next_up.clone();
        info!(video_id = %next_up.video.id, "Play now requested");
        if let Some(listener) = self.listener.as_mut() {
            listener.on_play_requested(next_up);
        }
    }

    /// Dismiss the prompt on the user's behalf; restarting the video is up to the caller
    pub fn replay(&mut self) {
        self.cancel(true);
    }

    /// Stop ticking and hide the prompt. No-op when nothing is shown.
    pub fn cancel(&mut self, user_initiated: bool) {
        if !self.is_active() {
            return;
        }

        let mut hidden = self.state();
        hidden.visible = false;
        self.phase = Phase::Idle;
        self.generation = self.generation.wrapping_add(1);
        debug!(user_initiated, "Autoplay canceled");

        if let Some(listener) = self.listener.as_mut() {
            listener.on_state_changed(hidden);
            if user_initiated {
                listener.on_canceled();
            }
        }
    }

    fn emit_state(&mut self) {
        let state = self.state();
        if let Some(listener) = self.listener.as_mut() {
            listener.on_state_changed(state);
        }
    }
}
