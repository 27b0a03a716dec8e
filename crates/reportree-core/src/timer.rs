//! Clocks used to stamp report nodes.
//!
//! Every node owns a [`Timer`]. Adding a child asks the parent's timer to
//! [`derive`](Timer::derive) a new one, so each node measures its own
//! duration from the instant it was created while all timestamps stay on the
//! root's logical clock.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeDelta, Utc};

/// Source of timestamps and elapsed durations.
pub trait Timer: fmt::Debug {
    /// Current instant.
    fn now(&mut self) -> DateTime<Utc>;

    /// Time elapsed since this timer's origin.
    fn finalize(&mut self) -> Duration;

    /// A new timer whose origin is "now", together with that instant.
    fn derive(&mut self) -> (Box<dyn Timer>, DateTime<Utc>);
}

impl<T: Timer + ?Sized> Timer for Box<T> {
    fn now(&mut self) -> DateTime<Utc> {
        (**self).now()
    }

    fn finalize(&mut self) -> Duration {
        (**self).finalize()
    }

    fn derive(&mut self) -> (Box<dyn Timer>, DateTime<Utc>) {
        (**self).derive()
    }
}

/// Wall-clock timer.
///
/// Timestamps come from the system clock, durations from a monotonic
/// [`Instant`] captured at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimer {
    started: Instant,
}

impl SystemTimer {
    /// Create a timer whose durations count from now.
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for SystemTimer {
    fn now(&mut self) -> DateTime<Utc> {
        Utc::now()
    }

    fn finalize(&mut self) -> Duration {
        self.started.elapsed()
    }

    fn derive(&mut self) -> (Box<dyn Timer>, DateTime<Utc>) {
        let now = Utc::now();
        (Box::new(Self::new()), now)
    }
}

/// Deterministic timer for tests.
///
/// A timer and every timer derived from it share one logical clock: each
/// call to [`now`](Timer::now), [`finalize`](Timer::finalize) or
/// [`derive`](Timer::derive) on any of them advances the shared tick
/// counter by one. The reported instant is `origin + ticks * quantum`, and
/// a duration counts the ticks taken since the timer was derived. Output
/// depends on the call order only, never on real time.
///
/// Clones share the clock too.
#[derive(Debug, Clone)]
pub struct SteppingTimer {
    origin: DateTime<Utc>,
    quantum: Duration,
    clock: Rc<Cell<u64>>,
    start: u64,
}

impl SteppingTimer {
    /// Default step between two readings.
    pub const DEFAULT_QUANTUM: Duration = Duration::from_nanos(100);

    /// Create a timer starting at `origin` that steps by 100ns.
    pub fn new(origin: DateTime<Utc>) -> Self {
        Self::with_quantum(origin, Self::DEFAULT_QUANTUM)
    }

    /// Create a timer starting at `origin` with a custom step.
    pub fn with_quantum(origin: DateTime<Utc>, quantum: Duration) -> Self {
        Self {
            origin,
            quantum,
            clock: Rc::new(Cell::new(0)),
            start: 0,
        }
    }

    /// Instant the shared clock counts from.
    pub fn origin(&self) -> DateTime<Utc> {
        self.origin
    }

    /// Step added by every reading.
    pub fn quantum(&self) -> Duration {
        self.quantum
    }

    /// Readings taken so far on the shared clock.
    pub fn ticks(&self) -> u64 {
        self.clock.get()
    }

    /// Shared tick at which this timer was derived, 0 for the first timer.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Advance the shared clock by one reading.
    ///
    /// # Panics
    ///
    /// Panics once the shared clock has taken `u64::MAX` readings.
    fn tick(&mut self) -> u64 {
        let ticks = match self.clock.get().checked_add(1) {
            Some(ticks) => ticks,
            None => panic!("stepping clock exhausted"),
        };
        self.clock.set(ticks);
        ticks
    }

    fn span(&self, ticks: u64) -> Duration {
        let nanos = self.quantum.as_nanos().saturating_mul(u128::from(ticks));
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    fn at(&self, ticks: u64) -> DateTime<Utc> {
        TimeDelta::from_std(self.span(ticks))
            .ok()
            .and_then(|delta| self.origin.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl Timer for SteppingTimer {
    fn now(&mut self) -> DateTime<Utc> {
        let ticks = self.tick();
        self.at(ticks)
    }

    fn finalize(&mut self) -> Duration {
        let ticks = self.tick();
        self.span(ticks - self.start)
    }

    fn derive(&mut self) -> (Box<dyn Timer>, DateTime<Utc>) {
        let ticks = self.tick();
        let child = Self {
            origin: self.origin,
            quantum: self.quantum,
            clock: Rc::clone(&self.clock),
            start: ticks,
        };
        (Box::new(child), self.at(ticks))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn origin() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_stepping_now_advances_by_quantum() {
        let mut timer = SteppingTimer::new(origin());
        assert_eq!(timer.now() - origin(), TimeDelta::nanoseconds(100));
        assert_eq!(timer.now() - origin(), TimeDelta::nanoseconds(200));
        assert_eq!(timer.now() - origin(), TimeDelta::nanoseconds(300));
        assert_eq!(timer.ticks(), 3);
    }

    #[test]
    fn test_stepping_finalize_shares_the_counter() {
        let mut timer = SteppingTimer::new(origin());
        timer.now();
        assert_eq!(timer.finalize(), Duration::from_nanos(200));
        assert_eq!(timer.now() - origin(), TimeDelta::nanoseconds(300));
    }

    #[test]
    fn test_stepping_derived_timers_share_the_clock() {
        let mut timer = SteppingTimer::new(origin());
        let (mut child, at) = timer.derive();
        assert_eq!(at - origin(), TimeDelta::nanoseconds(100));
        assert_eq!(child.now() - origin(), TimeDelta::nanoseconds(200));
        assert_eq!(timer.now() - origin(), TimeDelta::nanoseconds(300));

        let (mut grandchild, at) = child.derive();
        assert_eq!(at - origin(), TimeDelta::nanoseconds(400));
        assert_eq!(timer.ticks(), 4);

        // durations count shared ticks since each timer was derived
        assert_eq!(grandchild.finalize(), Duration::from_nanos(100));
        assert_eq!(child.finalize(), Duration::from_nanos(500));
        assert_eq!(timer.finalize(), Duration::from_nanos(700));
    }

    #[test]
    fn test_stepping_clones_share_the_clock() {
        let mut timer = SteppingTimer::new(origin());
        let mut copy = timer.clone();
        timer.now();
        assert_eq!(copy.now() - origin(), TimeDelta::nanoseconds(200));
        assert_eq!(timer.ticks(), 2);
    }

    #[test]
    fn test_stepping_large_tick_counts_keep_increasing() {
        let mut timer = SteppingTimer::new(origin());
        timer.clock.set(u64::from(u32::MAX));
        let first = timer.now();
        let second = timer.now();
        assert!(second > first);
        assert_eq!(second - first, TimeDelta::nanoseconds(100));
    }

    #[test]
    #[should_panic(expected = "stepping clock exhausted")]
    fn test_stepping_exhausted_clock_panics() {
        let mut timer = SteppingTimer::new(origin());
        timer.clock.set(u64::MAX);
        timer.now();
    }

    #[test]
    fn test_custom_quantum() {
        let mut timer = SteppingTimer::with_quantum(origin(), Duration::from_millis(5));
        assert_eq!(timer.now() - origin(), TimeDelta::milliseconds(5));
        assert_eq!(timer.finalize(), Duration::from_millis(10));
    }

    #[test]
    fn test_system_timer_is_monotonic() {
        let mut timer = SystemTimer::new();
        let (_, first) = timer.derive();
        let second = timer.now();
        assert!(second >= first);
        let elapsed = timer.finalize();
        assert!(elapsed <= timer.finalize());
    }
}
