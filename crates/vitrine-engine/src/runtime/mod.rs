//! Headless host runtime.
//!
//! Owns the document, frame/timer scheduling and listener routing, and pumps
//! host input into DOM-level dispatches for an [`App`](crate::core::App).

mod host_loop;
mod listeners;
mod scheduler;

pub use host_loop::{HostEvent, Runtime, RuntimeConfig};
pub use listeners::{DomEvent, EventKind, EventTarget, ListenerId, Listeners};
pub use scheduler::{FrameHandle, OwnerId, Scheduler, TimerHandle};
