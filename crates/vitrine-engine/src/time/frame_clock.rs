use super::Timestamp;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time elapsed since the previous tick (or reset), in seconds, clamped.
    pub dt: f64,

    /// Host timestamp of this tick.
    pub now: Timestamp,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots from host timestamps.
///
/// Intended usage is one clock per animation loop, so loops that pause or
/// start at different times never share delta state.
///
/// Delta time is clamped: a timestamp earlier than the baseline yields `dt_min`,
/// and a long gap (tab suspended, debugger, stall) yields at most `dt_max`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Timestamp,
    frame_index: u64,
    dt_min: f64,
    dt_max: f64,
}

impl FrameClock {
    /// Creates a clock with default clamps `[0, 0.25]` seconds.
    pub fn new(now: Timestamp) -> Self {
        Self::with_clamps(now, 0.0, 0.25)
    }

    /// Creates a clock with custom delta clamps, in seconds.
    pub fn with_clamps(now: Timestamp, dt_min: f64, dt_max: f64) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Moves the baseline to `now` so the next tick does not integrate the gap.
    pub fn reset(&mut self, now: Timestamp) {
        self.last = now;
    }

    /// Baseline the next tick measures from.
    pub fn last(&self) -> Timestamp {
        self.last
    }

    /// Advances the clock to `now` and returns the clamped delta.
    pub fn tick(&mut self, now: Timestamp) -> FrameTime {
        let raw = now.seconds_since(self.last);
        let dt = if raw.is_nan() {
            self.dt_min
        } else {
            raw.clamp(self.dt_min, self.dt_max)
        };

        self.last = now;

        let ft = FrameTime {
            dt,
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(Timestamp::ZERO)
    }
}
