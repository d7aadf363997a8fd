use std::collections::BTreeMap;

use crate::time::Timestamp;

/// Identifies the component that owns scheduled work or listeners.
///
/// The runtime hands the owner back with every callback so the application can
/// route it without closures.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct OwnerId(u32);

/// Pending per-frame callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FrameHandle(u64);

/// Pending one-shot timer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy)]
struct Timer {
    owner: OwnerId,
    due: Timestamp,
}

/// Frame and timer bookkeeping for one runtime.
///
/// Handles are allocated from a single monotonic counter, so map order is
/// request order. Frame requests made while a frame is being delivered are
/// served on the next frame.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_owner: u32,
    next_handle: u64,
    frames: BTreeMap<FrameHandle, OwnerId>,
    timers: BTreeMap<TimerHandle, Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_owner(&mut self) -> OwnerId {
        self.next_owner += 1;
        OwnerId(self.next_owner)
    }

    fn bump(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    pub fn request_frame(&mut self, owner: OwnerId) -> FrameHandle {
        let handle = FrameHandle(self.bump());
        self.frames.insert(handle, owner);
        handle
    }

    /// Returns `false` if the request already ran or was cancelled.
    pub fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        self.frames.remove(&handle).is_some()
    }

    pub fn is_frame_pending(&self, handle: FrameHandle) -> bool {
        self.frames.contains_key(&handle)
    }

    pub fn set_timeout(&mut self, owner: OwnerId, delay_ms: f64, now: Timestamp) -> TimerHandle {
        let handle = TimerHandle(self.bump());
        let due = now.add_millis(delay_ms.max(0.0));
        self.timers.insert(handle, Timer { owner, due });
        handle
    }

    pub fn clear_timeout(&mut self, handle: TimerHandle) -> bool {
        self.timers.remove(&handle).is_some()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Pending frames and timers belonging to `owner`.
    pub fn pending_for(&self, owner: OwnerId) -> usize {
        self.frames.values().filter(|o| **o == owner).count()
            + self.timers.values().filter(|t| t.owner == owner).count()
    }

    /// Earliest timer deadline, if any timer is armed.
    pub fn next_due(&self) -> Option<Timestamp> {
        self.timers
            .values()
            .map(|t| t.due)
            .min_by(|a, b| a.as_millis().total_cmp(&b.as_millis()))
    }

    /// Frame requests pending at the start of a frame.
    pub(crate) fn frame_snapshot(&self) -> Vec<FrameHandle> {
        self.frames.keys().copied().collect()
    }

    /// Claims a frame request for delivery; `None` if it was cancelled meanwhile.
    pub(crate) fn take_frame(&mut self, handle: FrameHandle) -> Option<OwnerId> {
        self.frames.remove(&handle)
    }

    /// Removes and returns the earliest timer due at `now` (ties by handle).
    pub(crate) fn pop_due_timer(&mut self, now: Timestamp) -> Option<(TimerHandle, OwnerId)> {
        let (handle, timer) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due <= now)
            .min_by(|(ha, a), (hb, b)| {
                a.due.as_millis().total_cmp(&b.due.as_millis()).then(ha.cmp(hb))
            })
            .map(|(h, t)| (*h, *t))?;
        self.timers.remove(&handle);
        Some((handle, timer.owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: f64) -> Timestamp { Timestamp::from_millis(v) }

    #[test]
    fn cancelled_frame_is_not_delivered() {
        let mut s = Scheduler::new();
        let owner = s.new_owner();
        let a = s.request_frame(owner);
        let b = s.request_frame(owner);
        assert_eq!(s.frame_snapshot(), vec![a, b]);
        assert!(s.cancel_frame(a));
        assert!(!s.cancel_frame(a));
        assert_eq!(s.take_frame(a), None);
        assert_eq!(s.take_frame(b), Some(owner));
        assert_eq!(s.pending_frames(), 0);
    }

    #[test]
    fn timers_fire_in_due_order() {
        let mut s = Scheduler::new();
        let owner = s.new_owner();
        let late = s.set_timeout(owner, 500.0, ms(0.0));
        let early = s.set_timeout(owner, 100.0, ms(0.0));
        assert_eq!(s.next_due(), Some(ms(100.0)));

        assert_eq!(s.pop_due_timer(ms(50.0)), None);
        assert_eq!(s.pop_due_timer(ms(600.0)), Some((early, owner)));
        assert_eq!(s.pop_due_timer(ms(600.0)), Some((late, owner)));
        assert_eq!(s.pop_due_timer(ms(600.0)), None);
    }

    #[test]
    fn pending_for_counts_only_that_owner() {
        let mut s = Scheduler::new();
        let a = s.new_owner();
        let b = s.new_owner();
        s.request_frame(a);
        s.set_timeout(a, 10.0, ms(0.0));
        s.request_frame(b);
        assert_eq!(s.pending_for(a), 2);
        assert_eq!(s.pending_for(b), 1);
    }
}
