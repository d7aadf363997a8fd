//! Input subsystem.
//!
//! Public API is host-agnostic. Host adapters translate their native events
//! (browser events, window-system events, test scripts) into `InputEvent`s; the
//! runtime turns those into DOM-level dispatches.

mod state;
mod types;

pub use state::InputState;
pub use types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
    TextEvent,
    TouchEvent,
    TouchPhase,
};
