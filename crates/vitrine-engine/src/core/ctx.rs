use crate::dom::Surface;
use crate::input::InputState;
use crate::runtime::{EventKind, EventTarget, FrameHandle, ListenerId, Listeners, OwnerId, Scheduler, TimerHandle};
use crate::time::Timestamp;

/// Everything a component may touch during a callback.
pub struct HostCtx<'a> {
    pub surface: &'a mut dyn Surface,
    pub scheduler: &'a mut Scheduler,
    pub listeners: &'a mut Listeners,
    pub input: &'a InputState,
    /// Host time at the start of the current pump.
    pub now: Timestamp,
}

impl HostCtx<'_> {
    pub fn new_owner(&mut self) -> OwnerId {
        self.scheduler.new_owner()
    }

    pub fn listen(&mut self, target: EventTarget, kind: EventKind, owner: OwnerId) -> ListenerId {
        self.listeners.add(target, kind, owner)
    }

    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn request_frame(&mut self, owner: OwnerId) -> FrameHandle {
        self.scheduler.request_frame(owner)
    }

    pub fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        self.scheduler.cancel_frame(handle)
    }

    pub fn set_timeout(&mut self, owner: OwnerId, delay_ms: f64) -> TimerHandle {
        self.scheduler.set_timeout(owner, delay_ms, self.now)
    }

    pub fn clear_timeout(&mut self, handle: TimerHandle) -> bool {
        self.scheduler.clear_timeout(handle)
    }
}
