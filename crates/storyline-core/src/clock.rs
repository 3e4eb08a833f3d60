// File: crates/storyline-core/src/clock.rs
// Summary: Time source for reveal scheduling and entrance animations.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time since an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock measured from construction.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self { Self::new() }
}

impl SystemClock {
    pub fn new() -> Self { Self { origin: Instant::now() } }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration { self.origin.elapsed() }
}

/// Hand-driven clock. Clones share the same time, so a test can keep one and give one away.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self { Self::default() }

    pub fn advance(&self, by: Duration) { self.now.set(self.now.get() + by); }

    pub fn advance_ms(&self, ms: u64) { self.advance(Duration::from_millis(ms)); }

    pub fn set(&self, t: Duration) { self.now.set(t); }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration { self.now.get() }
}
