//! Time subsystem.
//!
//! Host-driven timing utilities, decoupled from any particular event loop:
//! - `Timestamp` is the host's monotonic time in milliseconds
//! - `HostClock` abstracts where timestamps come from (`SystemClock`, `ManualClock`)
//! - `FrameClock` turns successive timestamps into clamped frame deltas
//! - `Debouncer` collapses bursts of signals into one timer callback

mod clock;
mod debounce;
mod frame_clock;

pub use clock::{HostClock, ManualClock, SystemClock, Timestamp};
pub use debounce::Debouncer;
pub use frame_clock::{FrameClock, FrameTime};
