//! Session state shared by the editor panel, the canvas and the playback controls

use crate::clock::{ClockState, PlaybackClock, TickOutcome};
use crate::media::{MediaId, MediaItem, MediaPatch};
use crate::notice::{Notice, Notifier, UPLOAD_FAILED, UPLOAD_SUCCEEDED};
use crate::registry::MediaRegistry;
use crate::upload::UploadedFile;
use crate::{ItemDefaults, Result};
use tracing::{info, warn};

/// Owned state of one editing session: the media registry and the playback clock
#[derive(Debug, Clone, Default)]
pub struct Session {
    registry: MediaRegistry,
    clock: PlaybackClock,
}

impl Session {
    /// Creates an empty session with the standard item defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session whose uploads start from `defaults`
    pub fn with_defaults(defaults: ItemDefaults) -> Self {
        Self {
            registry: MediaRegistry::with_defaults(defaults),
            clock: PlaybackClock::new(),
        }
    }

    /// Registers an upload batch and reports the outcome to `notifier`.
    ///
    /// Exactly one notice is emitted per call.
    pub fn upload<I, N>(&mut self, files: I, mut notifier: N) -> Result<usize>
    where
        I: IntoIterator<Item = UploadedFile>,
        N: Notifier,
    {
        match self.registry.add(files) {
            Ok(added) => {
                info!(added, total = self.registry.len(), "upload accepted");
                notifier.notify(Notice::Success(UPLOAD_SUCCEEDED.to_string()));
                Ok(added)
            }
            Err(err) => {
                warn!("upload rejected: {}", err);
                notifier.notify(Notice::Failure(UPLOAD_FAILED.to_string()));
                Err(err)
            }
        }
    }

    /// Applies an edit or gesture result; unknown ids are ignored
    pub fn update(&mut self, id: MediaId, patch: &MediaPatch) -> bool {
        self.registry.update(id, patch)
    }

    /// Starts the clock; see [`PlaybackClock::play`]
    pub fn play(&mut self) -> Option<u64> {
        self.clock.play()
    }

    /// Stops the clock, keeping its value
    pub fn pause(&mut self) -> bool {
        self.clock.pause()
    }

    /// Play/pause button behaviour
    pub fn toggle(&mut self) -> ClockState {
        self.clock.toggle()
    }

    /// Evaluates one timer firing; the stopping bound is read from the current registry
    pub fn tick(&mut self) -> TickOutcome {
        let max_end = self.registry.max_end_time();
        self.clock.tick(max_end)
    }

    /// Evaluates a timer firing scheduled by the run with the given epoch
    pub fn tick_for(&mut self, epoch: u64) -> TickOutcome {
        let max_end = self.registry.max_end_time();
        self.clock.tick_for(epoch, max_end)
    }

    /// Items shown at the current clock value. Recomputed on every call.
    pub fn visible(&self) -> Vec<&MediaItem> {
        self.registry.visible_at(self.clock.value())
    }

    /// Owned view of the current frame for renderers
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            value: self.clock.value(),
            state: self.clock.state(),
            visible: self.visible().into_iter().cloned().collect(),
        }
    }

    /// Playback controls are only offered once there is media to play
    pub fn controls_available(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Returns the media registry
    pub fn registry(&self) -> &MediaRegistry {
        &self.registry
    }

    /// Returns the playback clock
    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }
}

/// What the canvas shows at one clock value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub value: u64,
    pub state: ClockState,
    pub visible: Vec<MediaItem>,
}

impl Snapshot {
    /// Returns true if the clock was running when the snapshot was taken
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    /// Encodes the snapshot as a single JSON line
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
