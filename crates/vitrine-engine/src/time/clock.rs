use std::cell::Cell;
use std::time::Instant;

/// Monotonic host time in milliseconds since the clock's origin.
///
/// Mirrors the browser's high-resolution timestamp: fractional milliseconds,
/// comparable only against timestamps from the same clock.
#[derive(Debug, Copy, Clone, Default, PartialEq, PartialOrd)]
pub struct Timestamp(f64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0.0);

    #[inline]
    pub const fn from_millis(ms: f64) -> Self {
        Self(ms)
    }

    #[inline]
    pub fn as_millis(self) -> f64 {
        self.0
    }

    /// Signed seconds elapsed since `earlier` (negative if `earlier` is later).
    #[inline]
    pub fn seconds_since(self, earlier: Timestamp) -> f64 {
        (self.0 - earlier.0) / 1000.0
    }

    #[inline]
    pub fn add_millis(self, ms: f64) -> Self {
        Self(self.0 + ms)
    }
}

/// Source of host timestamps.
pub trait HostClock {
    fn now(&self) -> Timestamp;
}

/// Real monotonic clock anchored at construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.origin.elapsed().as_secs_f64() * 1000.0)
    }
}

/// Deterministic clock that only moves when told to.
///
/// Used by the headless runtime and by tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(ms: f64) -> Self {
        Self { now: Cell::new(ms) }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl HostClock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.now.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_moves_only_when_advanced() {
        let clock = ManualClock::starting_at(100.0);
        assert_eq!(clock.now(), Timestamp::from_millis(100.0));
        clock.advance(16.5);
        assert_eq!(clock.now().as_millis(), 116.5);
    }

    #[test]
    fn seconds_since_is_signed() {
        let a = Timestamp::from_millis(1000.0);
        let b = Timestamp::from_millis(3500.0);
        assert_eq!(b.seconds_since(a), 2.5);
        assert_eq!(a.seconds_since(b), -2.5);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
