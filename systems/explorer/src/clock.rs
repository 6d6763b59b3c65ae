use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

/// Source of frame durations fed into the world.
pub trait Clock {
    /// Time elapsed since the previous call.
    fn delta(&mut self) -> Duration;
}

/// Clock backed by the monotonic system timer.
///
/// The first call reports zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock {
    last: Option<Instant>,
}

impl SystemClock {
    /// Creates a clock that starts measuring on its first call.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }
}

impl Clock for SystemClock {
    fn delta(&mut self) -> Duration {
        let now = Instant::now();
        let delta = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last = Some(now);
        delta
    }
}

/// Clock advanced by hand.
///
/// Clones share the same pending duration, so a test keeps one handle and
/// gives the other to the explorer.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    pending: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Creates a clock with no pending time.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds time that the next [`Clock::delta`] call reports.
    pub fn advance(&self, by: Duration) {
        self.pending.set(self.pending.get().saturating_add(by));
    }
}

impl Clock for ManualClock {
    fn delta(&mut self) -> Duration {
        self.pending.replace(Duration::ZERO)
    }
}
