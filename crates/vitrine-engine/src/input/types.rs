use std::fmt;

use crate::coords::Viewport;

/// Keyboard key identifier.
///
/// Only the keys components react to are named; printable characters arrive
/// as `Character`, everything else as `Unknown` with a stable host code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    Home,
    End,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    Character(char),

    /// Host-dependent key not represented here.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Modifier keys state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Pointer move event in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f64,
    pub y: f64,
}

/// Pointer button event.
///
/// Coordinates are carried so hit-testing does not depend on a separate
/// "current pointer position" having been reported first.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: MouseButtonState,
    pub x: f64,
    pub y: f64,
    pub modifiers: Modifiers,
}

/// Committed text (not IME composition).
#[derive(Debug, Clone, PartialEq)]
pub struct TextEvent {
    pub text: String,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// A single touch point transition.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TouchEvent {
    /// Host identifier, stable for the lifetime of the touch.
    pub id: u64,
    pub phase: TouchPhase,
    pub x: f64,
    pub y: f64,
}

/// Host-agnostic input events fed to the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        /// True when the event is a key-repeat.
        repeat: bool,
    },

    PointerMoved(PointerMoveEvent),
    PointerButton(PointerButtonEvent),

    /// Pointer left the host surface.
    PointerLeft,

    Touch(TouchEvent),

    Text(TextEvent),

    /// Host window focus change.
    Focused(bool),

    /// Page visibility change (tab hidden / shown).
    VisibilityChanged { hidden: bool },

    /// Host viewport resized.
    Resized(Viewport),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Character(c) => write!(f, "{c}"),
            other => write!(f, "{:?}", other),
        }
    }
}
