use std::collections::{HashMap, HashSet};

use crate::coords::{Vec2, Viewport};
use crate::dom::NodeId;

use super::types::{
    InputEvent,
    Key,
    KeyState,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
    TouchEvent,
    TouchPhase,
};
use super::Modifiers;

/// Current input state for one host surface.
///
/// Holds "is down" information, pointer and touch positions, page visibility
/// and the DOM node that currently has keyboard focus.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the host window is focused.
    pub focused: bool,

    /// Pointer position in CSS pixels.
    pub pointer_pos: Option<Vec2>,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,

    /// Active touch points by host id.
    pub touches: HashMap<u64, Vec2>,

    /// Whether the page is hidden (background tab, minimized).
    pub page_hidden: bool,

    /// Last viewport reported by the host.
    pub viewport: Viewport,

    /// Node holding keyboard focus; maintained by the runtime.
    pub focus_node: Option<NodeId>,
}

impl InputState {
    /// Applies a host-agnostic input event to the current state.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Focus loss mid-press would otherwise leave keys stuck down.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some(Vec2::new(*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = *modifiers;
                match state {
                    KeyState::Pressed => {
                        self.keys_down.insert(*key);
                    }
                    KeyState::Released => {
                        self.keys_down.remove(key);
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, modifiers }) => {
                self.pointer_pos = Some(Vec2::new(*x, *y));
                self.modifiers = *modifiers;
                match state {
                    MouseButtonState::Pressed => {
                        self.buttons_down.insert(*button);
                    }
                    MouseButtonState::Released => {
                        self.buttons_down.remove(button);
                    }
                }
            }

            InputEvent::Touch(TouchEvent { id, phase, x, y }) => match phase {
                TouchPhase::Started | TouchPhase::Moved => {
                    self.touches.insert(*id, Vec2::new(*x, *y));
                }
                TouchPhase::Ended | TouchPhase::Cancelled => {
                    self.touches.remove(id);
                }
            },

            InputEvent::VisibilityChanged { hidden } => {
                self.page_hidden = *hidden;
            }

            InputEvent::Resized(viewport) => {
                self.viewport = *viewport;
            }

            InputEvent::Text(_) => {
                // Committed text is delivered to the focused field, not stored.
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_loss_releases_held_input() {
        let mut state = InputState::default();
        state.apply_event(&InputEvent::Key {
            key: Key::ArrowLeft,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        });
        assert!(state.key_down(Key::ArrowLeft));

        state.apply_event(&InputEvent::Focused(false));
        assert!(!state.key_down(Key::ArrowLeft));
    }

    #[test]
    fn touches_are_tracked_until_end() {
        let mut state = InputState::default();
        let touch = |phase| InputEvent::Touch(TouchEvent { id: 7, phase, x: 10.0, y: 4.0 });

        state.apply_event(&touch(TouchPhase::Started));
        assert_eq!(state.touches.get(&7), Some(&Vec2::new(10.0, 4.0)));
        state.apply_event(&touch(TouchPhase::Ended));
        assert!(state.touches.is_empty());
    }

    #[test]
    fn visibility_and_viewport_are_recorded() {
        let mut state = InputState::default();
        state.apply_event(&InputEvent::VisibilityChanged { hidden: true });
        state.apply_event(&InputEvent::Resized(Viewport::new(800.0, 600.0)));
        assert!(state.page_hidden);
        assert_eq!(state.viewport.width, 800.0);
    }
}
