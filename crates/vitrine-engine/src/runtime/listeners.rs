use std::collections::BTreeMap;

use crate::coords::Vec2;
use crate::dom::NodeId;
use crate::input::{Key, Modifiers};

use super::OwnerId;

/// DOM-level event kinds the runtime dispatches.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventKind {
    PointerEnter,
    PointerLeave,
    PointerDown,
    PointerMove,
    PointerUp,
    Click,
    TouchStart,
    TouchMove,
    TouchEnd,
    KeyDown,
    KeyUp,
    Focus,
    Blur,
    Input,
    Change,
    Submit,
    VisibilityChange,
    Resize,
}

impl EventKind {
    /// Whether the event propagates from its target through the ancestors to
    /// document-level listeners.
    pub fn bubbles(self) -> bool {
        !matches!(
            self,
            EventKind::PointerEnter
                | EventKind::PointerLeave
                | EventKind::Focus
                | EventKind::Blur
                | EventKind::VisibilityChange
                | EventKind::Resize
        )
    }
}

/// Where a listener is attached / where an event is aimed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventTarget {
    Node(NodeId),
    Document,
    Window,
}

/// A dispatched DOM-level event.
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    pub kind: EventKind,
    pub target: EventTarget,
    /// Pointer/touch position in CSS pixels.
    pub pos: Option<Vec2>,
    pub key: Option<Key>,
    pub modifiers: Modifiers,
}

impl DomEvent {
    pub fn new(kind: EventKind, target: EventTarget) -> Self {
        Self { kind, target, pos: None, key: None, modifiers: Modifiers::default() }
    }

    pub fn at(mut self, pos: Vec2) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn with_key(mut self, key: Key, modifiers: Modifiers) -> Self {
        self.key = Some(key);
        self.modifiers = modifiers;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Target node, if the event is aimed at one.
    pub fn target_node(&self) -> Option<NodeId> {
        match self.target {
            EventTarget::Node(n) => Some(n),
            _ => None,
        }
    }
}

/// Registered listener handle; detach with [`Listeners::remove`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy)]
struct Entry {
    target: EventTarget,
    kind: EventKind,
    owner: OwnerId,
}

/// Listener registry.
///
/// Registration returns a handle that is the only way to detach, so a
/// component can always remove exactly what it attached.
#[derive(Debug, Default)]
pub struct Listeners {
    next: u64,
    entries: BTreeMap<ListenerId, Entry>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, target: EventTarget, kind: EventKind, owner: OwnerId) -> ListenerId {
        self.next += 1;
        let id = ListenerId(self.next);
        self.entries.insert(id, Entry { target, kind, owner });
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_for(&self, owner: OwnerId) -> usize {
        self.entries.values().filter(|e| e.owner == owner).count()
    }

    /// Listeners to invoke for `event`, in dispatch order.
    ///
    /// `path` is the target node followed by its ancestors (empty for document
    /// and window targets). Order: listeners on each node of the path (only the
    /// target for non-bubbling kinds), then document listeners, then window
    /// listeners; registration order within each target.
    pub fn route(&self, event: &DomEvent, path: &[NodeId]) -> Vec<(ListenerId, OwnerId)> {
        let kind = event.kind;
        let mut out = Vec::new();
        let mut collect = |target: EventTarget, out: &mut Vec<(ListenerId, OwnerId)>| {
            out.extend(
                self.entries
                    .iter()
                    .filter(|(_, e)| e.kind == kind && e.target == target)
                    .map(|(id, e)| (*id, e.owner)),
            );
        };

        match event.target {
            EventTarget::Node(_) => {
                for (depth, node) in path.iter().enumerate() {
                    if depth > 0 && !kind.bubbles() {
                        break;
                    }
                    collect(EventTarget::Node(*node), &mut out);
                }
                if kind.bubbles() {
                    collect(EventTarget::Document, &mut out);
                }
            }
            EventTarget::Document => collect(EventTarget::Document, &mut out),
            EventTarget::Window => collect(EventTarget::Window, &mut out),
        }
        out
    }
}
