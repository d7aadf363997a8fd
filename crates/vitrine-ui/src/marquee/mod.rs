//! Continuously scrolling ticker.

mod config;
mod engine;
pub mod motion;

pub use config::{Direction, TickerConfig};
pub use engine::{MarqueeEngine, CLONE_ATTR, RESIZE_DEBOUNCE_MS};
