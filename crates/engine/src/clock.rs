//! Time sources for the frame scheduler.
//!
//! The session never reads wall-clock time directly; it asks a [`Clock`] for a
//! monotonic millisecond reading so tests can drive frames with synthetic time.

use std::time::Instant;

/// Monotonic millisecond time source
pub trait Clock {
    fn now_ms(&mut self) -> u64;
}

/// Real time, measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&mut self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for tests and replays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    now: u64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self { now: start_ms }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now = self.now.saturating_add(ms);
    }

    /// Jump to an absolute reading. Going backwards is allowed; the session
    /// treats it as a zero-length frame.
    pub fn set(&mut self, now_ms: u64) {
        self.now = now_ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&mut self) -> u64 {
        self.now
    }
}
