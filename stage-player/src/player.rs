//! Real-time playback driver

use crate::{Error, PlayerConfig, Result};
use parking_lot::Mutex;
use stage_core::{ClockState, Notifier, Session, Snapshot, TickOutcome, UploadedFile};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Emitted by the ticking task after each effective firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The clock advanced to `value`
    Ticked { value: u64 },
    /// The clock reached the end of the last window and stopped at `value`
    Finished { value: u64 },
}

/// Periodic task ticking one run of the clock
struct Ticker {
    epoch: u64,
    handle: JoinHandle<()>,
}

/// Plays a shared session back in real time.
///
/// Clock transitions and timer firings are serialized by the session lock: `pause` stops the
/// clock and cancels the task while holding it, and every firing re-checks the run epoch under
/// it, so no tick can land after a stop.
pub struct Player {
    session: Arc<Mutex<Session>>,
    config: PlayerConfig,
    task: Option<Ticker>,
    tx_events: UnboundedSender<PlaybackEvent>,
}

impl Player {
    /// Creates a player for `session` and returns the receiving end of its event stream
    pub fn new(session: Session, config: PlayerConfig) -> (Self, UnboundedReceiver<PlaybackEvent>) {
        let (tx_events, rx_events) = unbounded_channel();
        let player = Self {
            session: Arc::new(Mutex::new(session)),
            config,
            task: None,
            tx_events,
        };
        (player, rx_events)
    }

    /// Starts playback. If the clock is already running, only makes sure the current run has
    /// a ticker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn play(&mut self) -> Result<()> {
        let handle = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        let mut session = self.session.lock();
        let epoch = match session.play() {
            Some(epoch) => epoch,
            None => {
                // Already running: keep a live ticker of this run, otherwise adopt the run
                let epoch = session.clock().epoch();
                let alive = self
                    .task
                    .as_ref()
                    .is_some_and(|task| task.epoch == epoch && !task.handle.is_finished());
                if alive {
                    return Ok(());
                }
                epoch
            }
        };
        if let Some(task) = self.task.take() {
            task.handle.abort();
        }

        let period = self.config.tick_interval;
        let first = Instant::now() + period;
        let shared = Arc::clone(&self.session);
        let tx_events = self.tx_events.clone();
        let handle = handle.spawn(async move {
            let mut ticker = interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let outcome = shared.lock().tick_for(epoch);
                match outcome {
                    TickOutcome::Advanced(value) => {
                        debug!(value, epoch, "tick");
                        let _ = tx_events.send(PlaybackEvent::Ticked { value });
                    }
                    TickOutcome::Finished(value) => {
                        info!(value, epoch, "playback finished");
                        let _ = tx_events.send(PlaybackEvent::Finished { value });
                        break;
                    }
                    TickOutcome::Idle | TickOutcome::Stale => {
                        debug!(epoch, "ticker outlived its run");
                        break;
                    }
                }
            }
        });
        self.task = Some(Ticker { epoch, handle });
        info!(value = session.clock().value(), epoch, "playback started");
        Ok(())
    }

    /// Stops playback; the clock keeps its value. Returns whether it was running.
    pub fn pause(&mut self) -> bool {
        let mut session = self.session.lock();
        let paused = session.pause();
        if let Some(task) = self.task.take() {
            task.handle.abort();
        }
        if paused {
            info!(value = session.clock().value(), "playback paused");
        }
        paused
    }

    /// Pauses when playing, plays when paused; returns the resulting clock state
    pub fn toggle(&mut self) -> Result<ClockState> {
        if !self.pause() {
            self.play()?;
        }
        Ok(self.state())
    }

    /// Registers an upload batch on the shared session
    pub fn upload<I, N>(&self, files: I, notifier: N) -> Result<usize>
    where
        I: IntoIterator<Item = UploadedFile>,
        N: Notifier,
    {
        Ok(self.session.lock().upload(files, notifier)?)
    }

    /// Runs `f` with exclusive access to the session, e.g. to upload or edit media while playing.
    ///
    /// Clock transitions made here are not scheduled; call [`play`](Self::play) afterwards to
    /// attach a ticker to a run started through the session.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.session.lock())
    }

    /// Returns the current clock value in seconds
    pub fn value(&self) -> u64 {
        self.session.lock().clock().value()
    }

    /// Returns the current clock state
    pub fn state(&self) -> ClockState {
        self.session.lock().clock().state()
    }

    /// Returns true while the clock is running
    pub fn is_running(&self) -> bool {
        self.state() == ClockState::Running
    }

    /// Returns what the canvas shows right now
    pub fn snapshot(&self) -> Snapshot {
        self.session.lock().snapshot()
    }

    /// Returns the player configuration
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.handle.abort();
        }
    }
}
