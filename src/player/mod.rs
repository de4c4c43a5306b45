//! Playback side of the client: the autoplay-next coordinator, the actor that drives its
//! countdown, and the session glue between a media host and the local stores.

pub mod auto_play;
pub mod autoplay_controller;
pub mod host;
pub mod session;
pub mod types;

pub use auto_play::AutoplayCoordinator;
pub use autoplay_controller::{AutoplayCommand, AutoplayController, AutoplayHandle};
pub use host::{DiscontinuityReason, HostEvent, PlaybackHost, PlaybackState};
pub use session::{KeyOutcome, PlaybackSession, RemoteKey};
pub use types::{AutoplayEvent, AutoplayListener, AutoplayMode, AutoplayState};
