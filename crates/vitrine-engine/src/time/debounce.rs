use crate::runtime::{OwnerId, Scheduler, TimerHandle};

use super::Timestamp;

/// Collapses a burst of signals into a single timer callback.
///
/// Every `signal` cancels the armed timer and arms a new one `quiet_ms` later,
/// so only the last signal of a burst survives. Intermediate signals are
/// discarded, never queued.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet_ms: f64,
    pending: Option<TimerHandle>,
}

impl Debouncer {
    pub fn new(quiet_ms: f64) -> Self {
        Self { quiet_ms, pending: None }
    }

    pub fn quiet_ms(&self) -> f64 {
        self.quiet_ms
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Restarts the quiet window at `now`.
    pub fn signal(&mut self, scheduler: &mut Scheduler, owner: OwnerId, now: Timestamp) {
        if let Some(handle) = self.pending.take() {
            scheduler.clear_timeout(handle);
        }
        self.pending = Some(scheduler.set_timeout(owner, self.quiet_ms, now));
    }

    /// Returns `true` if `fired` is the armed timer, consuming it.
    ///
    /// Stale handles (already superseded or cancelled) return `false`.
    pub fn accept(&mut self, fired: TimerHandle) -> bool {
        if self.pending == Some(fired) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self, scheduler: &mut Scheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.clear_timeout(handle);
        }
    }
}
