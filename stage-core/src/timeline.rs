//! Visibility window of a media item on the playback timeline

/// Half-open interval `[start_time, end_time)` in clock seconds during which an item is shown.
///
/// `start_time >= end_time` is accepted and simply yields a window that never matches.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibilityWindow {
    /// First second (inclusive) the item is shown
    pub start_time: f64,
    /// First second (exclusive) the item is hidden again
    pub end_time: f64,
}

impl VisibilityWindow {
    /// Creates a new visibility window
    pub fn new(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Checks if the window is active at the given clock value
    pub fn contains(&self, value: u64) -> bool {
        let value = value as f64;
        value >= self.start_time && value < self.end_time
    }

    /// Returns the length of the window in seconds, zero for inverted windows
    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }

    /// Returns true if no clock value can ever fall inside the window
    pub fn is_inert(&self) -> bool {
        !(self.start_time < self.end_time)
    }
}
