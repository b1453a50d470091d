//! Media item data structures

use crate::timeline::VisibilityWindow;
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a media item, assigned when the item is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MediaId(Uuid);

impl MediaId {
    /// Generates a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MediaId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Kind of an uploaded media file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Maps a MIME type to a media kind; anything that is not a video is treated as an image
    pub fn from_mime(mime: &str) -> Self {
        if mime.trim().to_ascii_lowercase().starts_with("video") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => f.write_str("image"),
            MediaKind::Video => f.write_str("video"),
        }
    }
}

/// Opaque handle to a playable resource (URL or path). Never decoded here.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MediaSource(String);

impl MediaSource {
    /// Wraps a handle created by the host
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Returns the handle as given by the host
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pixel-space position and size on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    /// Creates a new geometry
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A single uploaded image or video placed on the canvas
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaItem {
    /// Unique identifier for this item
    pub id: MediaId,
    /// Image or video
    pub kind: MediaKind,
    /// Handle to the decoded resource
    pub source: MediaSource,
    /// Position and size on the canvas
    pub geometry: Geometry,
    /// Seconds during which the item is shown
    pub window: VisibilityWindow,
}

impl MediaItem {
    /// Creates a new item with a freshly generated id
    pub fn new(
        kind: MediaKind,
        source: MediaSource,
        geometry: Geometry,
        window: VisibilityWindow,
    ) -> Self {
        Self {
            id: MediaId::new(),
            kind,
            source,
            geometry,
            window,
        }
    }

    /// Checks if this item is shown at the given clock value
    pub fn is_visible(&self, value: u64) -> bool {
        self.window.contains(value)
    }

    /// Merges the present fields of a patch into this item
    pub fn apply(&mut self, patch: &MediaPatch) {
        if let Some(x) = patch.x {
            self.geometry.x = x;
        }
        if let Some(y) = patch.y {
            self.geometry.y = y;
        }
        if let Some(width) = patch.width {
            self.geometry.width = width;
        }
        if let Some(height) = patch.height {
            self.geometry.height = height;
        }
        if let Some(start_time) = patch.start_time {
            self.window.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            self.window.end_time = end_time;
        }
    }
}

/// Partial update of an item's editable fields; `None` leaves a field untouched
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
}

impl MediaPatch {
    /// Patch reported when a drag gesture ends
    pub fn moved(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch reported when a resize gesture ends; resizing from a corner also moves the origin
    pub fn resized(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Sets the width
    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets the height
    pub fn height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Sets the window start in seconds
    pub fn start_time(mut self, start_time: f64) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Sets the window end in seconds
    pub fn end_time(mut self, end_time: f64) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Replaces the whole visibility window
    pub fn window(self, window: VisibilityWindow) -> Self {
        self.start_time(window.start_time).end_time(window.end_time)
    }

    /// Replaces the whole geometry
    pub fn geometry(geometry: Geometry) -> Self {
        Self::resized(geometry.x, geometry.y, geometry.width, geometry.height)
    }

    /// Returns true if the patch touches no field
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
