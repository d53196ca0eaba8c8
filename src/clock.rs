//! Millisecond tick sources.
//!
//! One clock drives a whole run: the driver reads it once per pass and
//! hands the reading to the engine through a `Tick`.

use std::cell::Cell;
use std::time::Instant;

pub trait Clock {
    /// Milliseconds since the clock started; never decreases.
    fn now(&self) -> u64;
}

/// Wall clock anchored at construction.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// Virtual clock moved by hand; used to replay timing deterministically.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        ManualClock {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.get()
    }
}
