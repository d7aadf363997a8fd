//! Vitrine engine crate.
//!
//! Host-side pieces used by the component layer: geometry, time, input, the
//! surface abstraction with its headless document, and the frame/timer/event
//! runtime that drives components.

pub mod coords;
pub mod core;
pub mod dom;
pub mod input;
pub mod logging;
pub mod runtime;
pub mod time;
