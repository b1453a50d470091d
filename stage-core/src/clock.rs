//! One-second playback clock

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ClockState {
    #[default]
    Stopped,
    Running,
}

/// Result of evaluating one timer firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The clock moved forward to the contained value
    Advanced(u64),
    /// The clock reached the stopping bound and stopped at the contained value
    Finished(u64),
    /// The clock was not running, nothing changed
    Idle,
    /// The firing belongs to an earlier run and was ignored
    Stale,
}

/// Discrete seconds counter with a play/pause state machine.
///
/// `value` never decreases and there is no reset; it carries over pause/resume cycles.
/// Every transition into `Running` starts a new run, identified by its epoch.
#[derive(Debug, Clone, Default)]
pub struct PlaybackClock {
    value: u64,
    state: ClockState,
    epoch: u64,
}

impl PlaybackClock {
    /// Creates a stopped clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the clock and returns the epoch of the new run, or `None` if already running
    pub fn play(&mut self) -> Option<u64> {
        if self.is_running() {
            return None;
        }
        self.state = ClockState::Running;
        self.epoch += 1;
        debug!(value = self.value, epoch = self.epoch, "clock started");
        Some(self.epoch)
    }

    /// Stops the clock; returns whether it was running
    pub fn pause(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = ClockState::Stopped;
        debug!(value = self.value, epoch = self.epoch, "clock paused");
        true
    }

    /// Pauses a running clock or starts a stopped one; returns the new state
    pub fn toggle(&mut self) -> ClockState {
        if !self.pause() {
            self.play();
        }
        self.state
    }

    /// Evaluates one timer firing against the current stopping bound
    pub fn tick(&mut self, max_end: f64) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }
        // NaN bounds never stop the clock on their own, so treat them as zero
        let max_end = if max_end.is_nan() { 0.0 } else { max_end };
        if self.value as f64 >= max_end {
            self.state = ClockState::Stopped;
            debug!(value = self.value, max_end, "clock reached end");
            return TickOutcome::Finished(self.value);
        }
        self.value += 1;
        TickOutcome::Advanced(self.value)
    }

    /// Like [`tick`](Self::tick), but ignores firings scheduled by an earlier run
    pub fn tick_for(&mut self, epoch: u64, max_end: f64) -> TickOutcome {
        if epoch != self.epoch {
            return TickOutcome::Stale;
        }
        self.tick(max_end)
    }

    /// Returns the elapsed seconds
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Returns whether the clock is stopped or running
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Returns the epoch of the latest run, zero before the first play
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns true while the clock is running
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    /// Timer label shown next to the play button
    pub fn display(&self) -> String {
        format!("{}s", self.value)
    }
}
