//! Recording session state: whether samples are being persisted, how long the
//! current recording has run, and the sampling cadence.
//!
//! Pure state with no I/O. [`crate::recorder::Recorder`] owns one and pairs it
//! with the database handle.

use std::time::Duration;

use util::config::{MAX_INTERVAL_SECONDS, MIN_INTERVAL_SECONDS};

/// Sampling interval in whole seconds, always within `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cadence(u64);

impl Cadence {
    pub const MIN: Cadence = Cadence(MIN_INTERVAL_SECONDS);
    pub const MAX: Cadence = Cadence(MAX_INTERVAL_SECONDS);

    /// The only constructor; out-of-range values snap to the nearest bound.
    pub fn clamped(seconds: u64) -> Self {
        Cadence(seconds.clamp(MIN_INTERVAL_SECONDS, MAX_INTERVAL_SECONDS))
    }

    pub fn seconds(self) -> u64 {
        self.0
    }

    pub fn period(self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl Default for Cadence {
    fn default() -> Self {
        Cadence::MIN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Recording,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    elapsed: Duration,
    cadence: Cadence,
}

impl Session {
    pub fn new(cadence: Cadence) -> Self {
        Self {
            cadence,
            ..Default::default()
        }
    }

    /// Enters `Recording` with elapsed time reset to zero.
    ///
    /// Calling this while already recording restarts the session. Returns
    /// `true` in that case so the caller can report it.
    pub fn start(&mut self) -> bool {
        let restarted = self.is_active();
        self.state = SessionState::Recording;
        self.elapsed = Duration::ZERO;
        restarted
    }

    /// Returns to `Idle`. Elapsed time is frozen at its last value.
    /// Returns `false` when there was nothing to stop.
    pub fn stop(&mut self) -> bool {
        let was_recording = self.is_active();
        self.state = SessionState::Idle;
        was_recording
    }

    /// Adds one second while recording; `None` (and no change) when idle.
    pub fn tick_elapsed(&mut self) -> Option<Duration> {
        if !self.is_active() {
            return None;
        }
        self.elapsed += Duration::from_secs(1);
        Some(self.elapsed)
    }

    pub fn set_cadence(&mut self, cadence: Cadence) {
        self.cadence = cadence;
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Recording
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }
}
