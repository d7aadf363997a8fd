use vitrine_engine::core::{Dispatch, HostCtx};
use vitrine_engine::dom::{NodeId, Surface};
use vitrine_engine::input::Key;
use vitrine_engine::runtime::{EventKind, EventTarget, ListenerId, OwnerId};

use crate::component::Component;
use crate::error::ConfigError;
use crate::target::Target;

/// Horizontal travel, in pixels, above which a drag counts as a swipe.
pub const SWIPE_THRESHOLD_PX: f64 = 50.0;

#[derive(Debug, Copy, Clone, PartialEq)]
enum Trigger {
    ControlClick(usize),
    ControlKey(usize),
    DragStart,
    DragMove,
    DragEnd,
    ArrowKeys,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Drag {
    start_x: f64,
    current_x: f64,
}

/// Content slider with generated dot controls, swipe and keyboard navigation.
///
/// Expects `.slider-track`, one or more `.slider-item` and a
/// `.slider-controls` container inside its root element.
#[derive(Debug)]
pub struct Slider {
    owner: OwnerId,
    container: NodeId,
    track: NodeId,
    items: Vec<NodeId>,
    controls: Vec<NodeId>,
    current: usize,
    drag: Option<Drag>,
    listeners: Vec<(ListenerId, Trigger)>,
    alive: bool,
}

impl Slider {
    pub fn create(ctx: &mut HostCtx<'_>, container: impl Into<Target>) -> Result<Self, ConfigError> {
        let container = container.into().resolve(ctx.surface)?;
        let surface = &mut *ctx.surface;

        let track = surface
            .query(Some(container), ".slider-track")
            .ok_or(ConfigError::MissingElement { what: ".slider-track" })?;
        let items = surface.query_all(Some(container), ".slider-item");
        if items.is_empty() {
            return Err(ConfigError::MissingElement { what: ".slider-item" });
        }
        let controls_root = surface
            .query(Some(container), ".slider-controls")
            .ok_or(ConfigError::MissingElement { what: ".slider-controls" })?;

        surface.clear_children(controls_root);
        let controls: Vec<NodeId> = (0..items.len())
            .map(|i| {
                let control = surface.create_element("div");
                surface.add_class(control, "slider-control");
                surface.set_attribute(control, "data-slide", &i.to_string());
                surface.set_attribute(control, "role", "button");
                surface.set_attribute(control, "tabindex", "0");
                surface.set_attribute(control, "aria-label", &format!("Go to slide {}", i + 1));
                surface.append_child(controls_root, control);
                control
            })
            .collect();

        let owner = ctx.new_owner();
        let mut slider = Self {
            owner,
            container,
            track,
            items,
            controls,
            current: 0,
            drag: None,
            listeners: Vec::new(),
            alive: true,
        };
        slider.attach_listeners(ctx);
        slider.show_slide(ctx.surface, 0);

        log::debug!(
            "slider {:?} on node #{}: {} slides",
            owner,
            container.index(),
            slider.items.len()
        );
        Ok(slider)
    }

    fn attach_listeners(&mut self, ctx: &mut HostCtx<'_>) {
        let track = EventTarget::Node(self.track);
        let mut wanted = Vec::new();
        for (i, control) in self.controls.iter().enumerate() {
            wanted.push((EventTarget::Node(*control), EventKind::Click, Trigger::ControlClick(i)));
            wanted.push((EventTarget::Node(*control), EventKind::KeyDown, Trigger::ControlKey(i)));
        }
        wanted.extend([
            (track, EventKind::PointerDown, Trigger::DragStart),
            (EventTarget::Document, EventKind::PointerMove, Trigger::DragMove),
            (EventTarget::Document, EventKind::PointerUp, Trigger::DragEnd),
            (track, EventKind::TouchStart, Trigger::DragStart),
            (track, EventKind::TouchMove, Trigger::DragMove),
            (track, EventKind::TouchEnd, Trigger::DragEnd),
            (EventTarget::Document, EventKind::KeyDown, Trigger::ArrowKeys),
        ]);
        for (target, kind, trigger) in wanted {
            let id = ctx.listen(target, kind, self.owner);
            self.listeners.push((id, trigger));
        }
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn controls(&self) -> &[NodeId] {
        &self.controls
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Activates slide `index`. Out-of-range indices are ignored (no wrap).
    pub fn show_slide(&mut self, surface: &mut dyn Surface, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        for node in self.items.iter().chain(&self.controls) {
            surface.remove_class(*node, "active");
        }
        surface.add_class(self.items[index], "active");
        if let Some(control) = self.controls.get(index) {
            surface.add_class(*control, "active");
        }
        self.current = index;
        true
    }

    pub fn next(&mut self, surface: &mut dyn Surface) -> bool {
        self.show_slide(surface, self.current + 1)
    }

    pub fn previous(&mut self, surface: &mut dyn Surface) -> bool {
        match self.current.checked_sub(1) {
            Some(i) => self.show_slide(surface, i),
            None => false,
        }
    }

    fn end_drag(&mut self, surface: &mut dyn Surface) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        surface.set_style(self.track, "cursor", Some("grab"));

        let diff = drag.start_x - drag.current_x;
        if diff.abs() > SWIPE_THRESHOLD_PX {
            if diff > 0.0 {
                self.next(surface);
            } else {
                self.previous(surface);
            }
        }
    }

    pub fn destroy(&mut self, ctx: &mut HostCtx<'_>) {
        if !self.alive {
            return;
        }
        for (id, _) in self.listeners.drain(..) {
            ctx.unlisten(id);
        }
        self.drag = None;
        self.alive = false;
    }
}

impl Component for Slider {
    fn owner(&self) -> OwnerId {
        self.owner
    }

    fn handle_event(&mut self, ctx: &mut HostCtx<'_>, dispatch: &Dispatch) {
        if !self.alive {
            return;
        }
        let Some(trigger) = self
            .listeners
            .iter()
            .find(|(id, _)| *id == dispatch.listener)
            .map(|(_, t)| *t)
        else {
            return;
        };
        let event = &dispatch.event;

        match trigger {
            Trigger::ControlClick(i) => {
                self.show_slide(ctx.surface, i);
            }
            Trigger::ControlKey(i) => {
                if matches!(event.key, Some(Key::Enter | Key::Space)) {
                    self.show_slide(ctx.surface, i);
                }
            }
            Trigger::DragStart => {
                if let Some(pos) = event.pos {
                    // Start and current agree until the first move, so a plain
                    // press is never a swipe.
                    self.drag = Some(Drag { start_x: pos.x, current_x: pos.x });
                    ctx.surface.set_style(self.track, "cursor", Some("grabbing"));
                }
            }
            Trigger::DragMove => {
                if let (Some(drag), Some(pos)) = (self.drag.as_mut(), event.pos) {
                    drag.current_x = pos.x;
                }
            }
            Trigger::DragEnd => self.end_drag(ctx.surface),
            Trigger::ArrowKeys => {
                let inside = event
                    .target_node()
                    .is_some_and(|n| ctx.surface.is_inclusive_descendant(n, self.container));
                if !inside {
                    return;
                }
                match event.key {
                    Some(Key::ArrowLeft) => {
                        self.previous(ctx.surface);
                    }
                    Some(Key::ArrowRight) => {
                        self.next(ctx.surface);
                    }
                    _ => {}
                }
            }
        }
    }

    fn destroy(&mut self, ctx: &mut HostCtx<'_>) {
        Slider::destroy(self, ctx);
    }
}
