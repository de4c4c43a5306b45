// Playback and persistence tuning constants
// Behavioural thresholds live here; user-adjustable values are in config.rs

// === Autoplay ===
// Length of the "Next Up" countdown shown after a video ends
pub const AUTOPLAY_TOTAL_MS: u64 = 5_000;

// Nominal countdown tick period; elapsed monotonic time drives the countdown, not tick count
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 250;

// === Progress ===
// Watched percentage at which a video counts as finished and leaves "Continue Watching"
pub const COMPLETE_PERCENT: u8 = 95;

// How often playback position is written while a video is playing
pub const DEFAULT_PROGRESS_PERSIST_SECS: u64 = 5;

// === Player controls ===
pub const DEFAULT_SEEK_STEP_MS: i64 = 10_000;

// === Search ===
pub const MAX_RECENT_SEARCHES: usize = 5;
