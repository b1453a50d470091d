//! Stage Core Library
//!
//! This library provides the media registry, the one-second playback clock and
//! the visibility model used to show and hide media items placed on a canvas.

pub mod clock;
pub mod media;
pub mod notice;
pub mod registry;
pub mod session;
pub mod timeline;
pub mod upload;

pub use clock::{ClockState, PlaybackClock, TickOutcome};
pub use media::{Geometry, MediaId, MediaItem, MediaKind, MediaPatch, MediaSource};
pub use notice::{Notice, Notifier};
pub use registry::MediaRegistry;
pub use session::{Session, Snapshot};
pub use timeline::VisibilityWindow;
pub use upload::UploadedFile;

/// Result type for stage-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for stage-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No file selected or invalid file")]
    NoValidFiles,

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Values given to newly uploaded items
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemDefaults {
    /// Initial position and size on the canvas
    pub geometry: Geometry,
    /// Initial visibility window
    pub window: VisibilityWindow,
}

impl Default for ItemDefaults {
    fn default() -> Self {
        Self {
            geometry: Geometry::new(50.0, 50.0, 200.0, 150.0),
            window: VisibilityWindow::new(0.0, 5.0),
        }
    }
}
