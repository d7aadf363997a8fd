mod app;
mod ctx;

pub use app::{App, AppControl, Dispatch, FrameFired, TimerFired};
pub use ctx::HostCtx;
