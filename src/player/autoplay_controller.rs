use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::auto_play::AutoplayCoordinator;
use super::types::{AutoplayEvent, AutoplayState};
use crate::models::RowContext;
use crate::utils::{AppError, Result};

/// Commands that can be sent to the autoplay controller
#[derive(Debug)]
pub enum AutoplayCommand {
    /// A video ended; start the next-up flow for its row
    StartOnEnded { context: RowContext },
    MoveCandidateLeft { respond_to: oneshot::Sender<bool> },
    MoveCandidateRight { respond_to: oneshot::Sender<bool> },
    PlayNow,
    Replay,
    Cancel { user_initiated: bool },
    IsActive { respond_to: oneshot::Sender<bool> },
    GetState { respond_to: oneshot::Sender<AutoplayState> },
}

/// Controller that owns the coordinator and drives its countdown timer
pub struct AutoplayController {
    coordinator: AutoplayCoordinator,
    receiver: mpsc::UnboundedReceiver<AutoplayCommand>,
    tick_interval: Duration,
    shutdown: CancellationToken,
}

impl AutoplayController {
    /// Create a controller ticking every `tick_interval`.
    ///
    /// Returns the command handle, the controller to run, and the stream of coordinator
    /// events.
    pub fn new(
        tick_interval: Duration,
    ) -> (
        AutoplayHandle,
        AutoplayController,
        mpsc::UnboundedReceiver<AutoplayEvent>,
    ) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        let mut coordinator = AutoplayCoordinator::new();
        coordinator.set_listener(Some(Box::new(event_tx)));

        let controller = AutoplayController {
            coordinator,
            receiver,
            tick_interval,
            shutdown: shutdown.clone(),
        };
        let handle = AutoplayHandle { sender, shutdown };

        (handle, controller, event_rx)
    }

    /// Run the controller event loop
    pub async fn run(mut self) {
        debug!("AutoplayController event loop started");

        let mut interval = time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    debug!("AutoplayController shutdown requested");
                    break;
                }
                command = self.receiver.recv() => match command {
                    Some(command) => self.handle_command(command, &mut interval),
                    None => break,
                },
                now = interval.tick(), if self.coordinator.is_ticking() => {
                    let generation = self.coordinator.generation();
                    trace!(generation, "Autoplay tick");
                    self.coordinator.tick(generation, now);
                }
            }
        }

        self.coordinator.cancel(false);
        debug!("AutoplayController event loop terminated");
    }

    fn handle_command(&mut self, command: AutoplayCommand, interval: &mut time::Interval) {
        match command {
            AutoplayCommand::StartOnEnded { context } => {
                self.coordinator.start_on_ended(context);
                // first tick of a new countdown fires immediately and drains nothing
                interval.reset_immediately();
            }
            AutoplayCommand::MoveCandidateLeft { respond_to } => {
                let _ = respond_to.send(self.coordinator.move_candidate_left());
            }
            AutoplayCommand::MoveCandidateRight { respond_to } => {
                let _ = respond_to.send(self.coordinator.move_candidate_right());
            }
            AutoplayCommand::PlayNow => self.coordinator.play_now(),
            AutoplayCommand::Replay => self.coordinator.replay(),
            AutoplayCommand::Cancel { user_initiated } => self.coordinator.cancel(user_initiated),
            AutoplayCommand::IsActive { respond_to } => {
                let _ = respond_to.send(self.coordinator.is_active());
            }
            AutoplayCommand::GetState { respond_to } => {
                let _ = respond_to.send(self.coordinator.state());
            }
        }
    }
}

/// Handle to send commands to the autoplay controller
#[derive(Debug, Clone)]
pub struct AutoplayHandle {
    sender: mpsc::UnboundedSender<AutoplayCommand>,
    shutdown: CancellationToken,
}

impl AutoplayHandle {
    fn send(&self, command: AutoplayCommand) -> Result<()> {
        self.sender
            .send(command)
            .map_err(|_| AppError::Playback("Autoplay controller is not running".to_string()))
    }

    async fn ask<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> AutoplayCommand) -> Result<T> {
        let (respond_to, response) = oneshot::channel();
        self.send(command(respond_to))?;
        response
            .await
            .map_err(|_| AppError::Playback("Autoplay controller dropped the request".to_string()))
    }

    pub fn start_on_ended(&self, context: RowContext) -> Result<()> {
        self.send(AutoplayCommand::StartOnEnded { context })
    }

    pub async fn move_candidate_left(&self) -> Result<bool> {
        self.ask(|respond_to| AutoplayCommand::MoveCandidateLeft { respond_to })
            .await
    }

    pub async fn move_candidate_right(&self) -> Result<bool> {
        self.ask(|respond_to| AutoplayCommand::MoveCandidateRight { respond_to })
            .await
    }

    pub fn play_now(&self) -> Result<()> {
        self.send(AutoplayCommand::PlayNow)
    }

    pub fn replay(&self) -> Result<()> {
        self.send(AutoplayCommand::Replay)
    }

    pub fn cancel(&self, user_initiated: bool) -> Result<()> {
        self.send(AutoplayCommand::Cancel { user_initiated })
    }

    pub async fn is_active(&self) -> Result<bool> {
        self.ask(|respond_to| AutoplayCommand::IsActive { respond_to })
            .await
    }

    pub async fn state(&self) -> Result<AutoplayState> {
        self.ask(|respond_to| AutoplayCommand::GetState { respond_to })
            .await
    }

    /// Stop the controller loop; a running countdown is dropped without notification
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
