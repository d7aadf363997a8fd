//! Coordinate and geometry types shared by the surface, the runtime and components.
//!
//! Canonical space:
//! - CSS pixels, `f64` to match host layout values and high-resolution timestamps
//! - Origin top-left
//! - +X right, +Y down

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
