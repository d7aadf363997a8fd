use crate::runtime::{DomEvent, FrameHandle, ListenerId, OwnerId, TimerHandle};
use crate::time::FrameTime;

use super::ctx::HostCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// A listener invocation.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub listener: ListenerId,
    pub owner: OwnerId,
    pub event: DomEvent,
}

/// A timer that came due.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TimerFired {
    pub handle: TimerHandle,
    pub owner: OwnerId,
}

/// A frame request being served.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameFired {
    pub handle: FrameHandle,
    pub owner: OwnerId,
    pub time: FrameTime,
}

/// Application contract implemented by higher layers.
///
/// The runtime only delivers work that is still registered at the moment of
/// delivery: a listener removed, or a frame/timer cancelled, by an earlier
/// callback in the same pump is skipped.
pub trait App {
    /// Called once per matching listener, in dispatch order.
    fn on_event(&mut self, ctx: &mut HostCtx<'_>, dispatch: &Dispatch) -> AppControl {
        let _ = (ctx, dispatch);
        AppControl::Continue
    }

    /// Called for each timer that came due.
    fn on_timer(&mut self, ctx: &mut HostCtx<'_>, timer: TimerFired) -> AppControl {
        let _ = (ctx, timer);
        AppControl::Continue
    }

    /// Called once per frame request.
    fn on_frame(&mut self, ctx: &mut HostCtx<'_>, frame: FrameFired) -> AppControl;
}
