//! Monotonic millisecond clock, injectable so tests can drive time by hand.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::OnceLock;
use std::time::Instant;

/// Source of millisecond timestamps relative to process start.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

static PROCESS_START: OnceLock<Instant> = OnceLock::new();

/// The instant the process clock origin was first observed.
pub fn process_start() -> Instant {
    *PROCESS_START.get_or_init(Instant::now)
}

/// Wall clock counting milliseconds since process start.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl MonotonicClock {
    pub fn new() -> Self {
        // Pin the origin at first construction.
        process_start();
        MonotonicClock
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        process_start().elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for deterministic tests. Cloned handles share time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<u64>>);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ms: u64) {
        self.0.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}
