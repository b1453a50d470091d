//! Stage Player Library
//!
//! Drives a [`stage_core::Session`] in real time: while playing, a periodic
//! task ticks the session clock once per interval until it is paused or the
//! clock reaches the end of the last media window.

pub mod player;

pub use player::{PlaybackEvent, Player};

use std::time::Duration;

/// Result type for stage-player operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for stage-player operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Stage core error: {0}")]
    Core(#[from] stage_core::Error),

    #[error("Playback requires a running tokio runtime")]
    NoRuntime,
}

/// Player configuration
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Time between two clock ticks
    pub tick_interval: Duration,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
        }
    }
}
