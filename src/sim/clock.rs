/// Session time source.
///
/// The scheduler and the frightened timer both read `Clock::now()`, which
/// is the time elapsed since the session began. `on_tick` is called once at
/// the top of every simulation step so tick-driven clocks can advance.

#[cfg(test)]
use std::cell::Cell;
#[cfg(test)]
use std::rc::Rc;
use std::time::{Duration, Instant};

pub trait Clock {
    /// Elapsed session time.
    fn now(&self) -> Duration;

    /// Called once per simulation tick, before anything reads the time.
    fn on_tick(&mut self) {}

    /// Rewind to zero for a fresh session.
    fn restart(&mut self);
}

// ── Wall clock ──

/// Real elapsed time from a monotonic `Instant`.
#[derive(Debug)]
pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        WallClock { origin: Instant::now() }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn restart(&mut self) {
        self.origin = Instant::now();
    }
}

// ── Tick clock ──

/// Time = ticks × tick length. Fully deterministic for a given input stream.
#[derive(Debug)]
pub struct TickClock {
    tick_len: Duration,
    ticks: u32,
}

impl TickClock {
    pub fn new(tick_len: Duration) -> Self {
        TickClock { tick_len, ticks: 0 }
    }
}

impl Clock for TickClock {
    fn now(&self) -> Duration {
        self.tick_len * self.ticks
    }

    fn on_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    fn restart(&mut self) {
        self.ticks = 0;
    }
}

// ── Manual clock ──

/// Externally driven clock. Clones share one reading, so a test can keep a
/// handle while the session owns another.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct ManualClock(Rc<Cell<Duration>>);

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }

    pub fn set(&self, at: Duration) {
        self.0.set(at);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.0.get()
    }

    fn restart(&mut self) {
        self.0.set(Duration::ZERO);
    }
}
