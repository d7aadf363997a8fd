use std::collections::{HashMap, VecDeque};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{ensure, Result};

use crate::coords::{Vec2, Viewport};
use crate::core::{App, AppControl, Dispatch, FrameFired, HostCtx, TimerFired};
use crate::dom::{Document, NodeId, Surface};
use crate::input::{InputEvent, InputState, Key, KeyState, MouseButton, MouseButtonState, TouchPhase};
use crate::time::{FrameClock, HostClock, ManualClock, SystemClock, Timestamp};

use super::{DomEvent, EventKind, EventTarget, Listeners, Scheduler};

const FOCUSABLE: &str = "input, textarea, select, button, a[href], [tabindex]";

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Frame period of the built-in loops, in milliseconds.
    pub frame_interval_ms: f64,

    /// Viewport applied to the document at startup; `None` keeps the document's.
    pub viewport: Option<Viewport>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 1000.0 / 60.0,
            viewport: None,
        }
    }
}

impl RuntimeConfig {
    pub fn frame_interval_ms(mut self, ms: f64) -> Self {
        self.frame_interval_ms = ms;
        self
    }

    pub fn viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }
}

/// Something the host reports to the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Raw input, translated into DOM-level events on the next pump.
    Input(InputEvent),

    /// Pre-built DOM event, dispatched as-is.
    Dom(DomEvent),
}

impl From<InputEvent> for HostEvent {
    fn from(ev: InputEvent) -> Self {
        HostEvent::Input(ev)
    }
}

impl From<DomEvent> for HostEvent {
    fn from(ev: DomEvent) -> Self {
        HostEvent::Dom(ev)
    }
}

/// Headless host: one document, its input state, scheduling and listeners.
///
/// Each [`pump`](Runtime::pump) runs in three phases: queued host events,
/// then due timers, then one frame for every frame request pending when the
/// frame started.
pub struct Runtime<C: HostClock> {
    config: RuntimeConfig,
    clock: C,
    document: Document,
    input: InputState,
    frame_clock: FrameClock,
    scheduler: Scheduler,
    listeners: Listeners,
    queue: VecDeque<HostEvent>,

    hovered: Vec<NodeId>,
    pressed: Option<NodeId>,
    touch_targets: HashMap<u64, NodeId>,
}

impl<C: HostClock> Runtime<C> {
    pub fn new(mut document: Document, clock: C, config: RuntimeConfig) -> Result<Self> {
        ensure!(
            config.frame_interval_ms.is_finite() && config.frame_interval_ms > 0.0,
            "frame interval must be a positive number of milliseconds, got {}",
            config.frame_interval_ms
        );
        if let Some(viewport) = config.viewport {
            ensure!(
                viewport.is_valid(),
                "viewport must be positive and finite, got {}x{}",
                viewport.width,
                viewport.height
            );
            document.set_viewport(viewport);
        }

        let now = clock.now();
        let input = InputState {
            focused: true,
            viewport: document.viewport(),
            ..InputState::default()
        };

        log::debug!(
            "runtime up: viewport {}x{}, frame interval {:.3}ms",
            input.viewport.width,
            input.viewport.height,
            config.frame_interval_ms
        );

        Ok(Self {
            config,
            clock,
            document,
            input,
            frame_clock: FrameClock::new(now),
            scheduler: Scheduler::new(),
            listeners: Listeners::new(),
            queue: VecDeque::new(),
            hovered: Vec::new(),
            pressed: None,
            touch_targets: HashMap::new(),
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    /// Queues a host event for the next pump.
    pub fn push_event(&mut self, ev: impl Into<HostEvent>) {
        self.queue.push_back(ev.into());
    }

    /// Runs `f` with a context outside of any callback (setup, scripted calls).
    pub fn with_ctx<R>(&mut self, f: impl FnOnce(&mut HostCtx<'_>) -> R) -> R {
        let now = self.clock.now();
        let mut ctx = self.ctx(now);
        f(&mut ctx)
    }

    fn ctx(&mut self, now: Timestamp) -> HostCtx<'_> {
        HostCtx {
            surface: &mut self.document,
            scheduler: &mut self.scheduler,
            listeners: &mut self.listeners,
            input: &self.input,
            now,
        }
    }

    /// Processes queued events, due timers and one frame at the current time.
    pub fn pump<A: App>(&mut self, app: &mut A) -> AppControl {
        let now = self.clock.now();
        let mut control = AppControl::Continue;

        while let Some(host_event) = self.queue.pop_front() {
            let events = match host_event {
                HostEvent::Input(ev) => self.translate(&ev),
                HostEvent::Dom(ev) => vec![ev],
            };
            for event in events {
                if self.dispatch(app, event, now) == AppControl::Exit {
                    control = AppControl::Exit;
                }
            }
        }

        while let Some((handle, owner)) = self.scheduler.pop_due_timer(now) {
            let mut ctx = self.ctx(now);
            if app.on_timer(&mut ctx, TimerFired { handle, owner }) == AppControl::Exit {
                control = AppControl::Exit;
            }
        }

        let time = self.frame_clock.tick(now);
        for handle in self.scheduler.frame_snapshot() {
            // Cancelled by an earlier callback in this frame.
            let Some(owner) = self.scheduler.take_frame(handle) else {
                continue;
            };
            let mut ctx = self.ctx(now);
            if app.on_frame(&mut ctx, FrameFired { handle, owner, time }) == AppControl::Exit {
                control = AppControl::Exit;
            }
        }

        control
    }

    fn dispatch<A: App>(&mut self, app: &mut A, event: DomEvent, now: Timestamp) -> AppControl {
        let path = match event.target {
            EventTarget::Node(node) => {
                if !self.document.contains(node) {
                    log::trace!("dropping {:?} aimed at removed node {:?}", event.kind, node);
                    return AppControl::Continue;
                }
                self.document.ancestry(node)
            }
            EventTarget::Document | EventTarget::Window => Vec::new(),
        };

        let mut control = AppControl::Continue;
        for (listener, owner) in self.listeners.route(&event, &path) {
            // Detached by an earlier listener of the same event.
            if !self.listeners.contains(listener) {
                continue;
            }
            let dispatch = Dispatch { listener, owner, event: event.clone() };
            let mut ctx = self.ctx(now);
            if app.on_event(&mut ctx, &dispatch) == AppControl::Exit {
                control = AppControl::Exit;
            }
        }
        control
    }

    // ── Input translation ─────────────────────────────────────────────────────

    fn translate(&mut self, ev: &InputEvent) -> Vec<DomEvent> {
        self.input.apply_event(ev);

        let mut out = Vec::new();
        match ev {
            InputEvent::PointerMoved(m) => {
                let pos = Vec2::new(m.x, m.y);
                let target = self.update_hover(pos, &mut out);
                out.push(DomEvent::new(EventKind::PointerMove, node_or_document(target)).at(pos));
            }

            InputEvent::PointerLeft => {
                for node in std::mem::take(&mut self.hovered) {
                    out.push(DomEvent::new(EventKind::PointerLeave, EventTarget::Node(node)));
                }
            }

            InputEvent::PointerButton(b) => {
                let pos = Vec2::new(b.x, b.y);
                let target = self.update_hover(pos, &mut out);
                let at = node_or_document(target);
                match b.state {
                    MouseButtonState::Pressed => {
                        if b.button == MouseButton::Left {
                            self.move_focus(target, &mut out);
                            self.pressed = target;
                        }
                        out.push(
                            DomEvent::new(EventKind::PointerDown, at)
                                .at(pos)
                                .with_modifiers(b.modifiers),
                        );
                    }
                    MouseButtonState::Released => {
                        out.push(
                            DomEvent::new(EventKind::PointerUp, at)
                                .at(pos)
                                .with_modifiers(b.modifiers),
                        );
                        if b.button == MouseButton::Left {
                            let pressed = self.pressed.take();
                            if let Some(node) = target.filter(|t| pressed == Some(*t)) {
                                self.activate(node, pos, &mut out);
                            }
                        }
                    }
                }
            }

            InputEvent::Touch(t) => {
                let pos = Vec2::new(t.x, t.y);
                match t.phase {
                    TouchPhase::Started => {
                        let target = self.document.hit_test(pos);
                        if let Some(node) = target {
                            self.touch_targets.insert(t.id, node);
                        }
                        out.push(DomEvent::new(EventKind::TouchStart, node_or_document(target)).at(pos));
                    }
                    TouchPhase::Moved => {
                        let target = self.touch_targets.get(&t.id).copied();
                        out.push(DomEvent::new(EventKind::TouchMove, node_or_document(target)).at(pos));
                    }
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        let target = self.touch_targets.remove(&t.id);
                        out.push(DomEvent::new(EventKind::TouchEnd, node_or_document(target)).at(pos));
                    }
                }
            }

            InputEvent::Key { key, state, modifiers, .. } => {
                let focus = self.live_focus();
                let kind = match state {
                    KeyState::Pressed => EventKind::KeyDown,
                    KeyState::Released => EventKind::KeyUp,
                };
                out.push(DomEvent::new(kind, node_or_document(focus)).with_key(*key, *modifiers));

                if *state == KeyState::Pressed {
                    if let Some(field) = focus.filter(|n| self.is_text_field(*n)) {
                        self.edit_key(field, *key, &mut out);
                    }
                }
            }

            InputEvent::Text(t) => {
                if let Some(field) = self.live_focus().filter(|n| self.is_text_field(*n)) {
                    let mut value = self.document.value(field).unwrap_or_default().to_string();
                    value.push_str(&t.text);
                    self.document.set_value(field, &value);
                    out.push(DomEvent::new(EventKind::Input, EventTarget::Node(field)));
                }
            }

            InputEvent::VisibilityChanged { hidden } => {
                self.document.set_hidden(*hidden);
                out.push(DomEvent::new(EventKind::VisibilityChange, EventTarget::Document));
            }

            InputEvent::Resized(viewport) => {
                self.document.set_viewport(*viewport);
                out.push(DomEvent::new(EventKind::Resize, EventTarget::Window));
            }

            InputEvent::ModifiersChanged(_) | InputEvent::Focused(_) => {}
        }
        out
    }

    /// Re-targets hover state at `pos`, emitting leave (innermost first) and
    /// enter (outermost first) transitions. Returns the hit node.
    fn update_hover(&mut self, pos: Vec2, out: &mut Vec<DomEvent>) -> Option<NodeId> {
        let target = self.document.hit_test(pos);
        let chain = target.map(|n| self.document.ancestry(n)).unwrap_or_default();

        for node in self.hovered.iter().filter(|n| !chain.contains(n)) {
            if self.document.contains(*node) {
                out.push(DomEvent::new(EventKind::PointerLeave, EventTarget::Node(*node)));
            }
        }
        for node in chain.iter().rev().filter(|n| !self.hovered.contains(n)) {
            out.push(DomEvent::new(EventKind::PointerEnter, EventTarget::Node(*node)));
        }

        self.hovered = chain;
        target
    }

    fn live_focus(&self) -> Option<NodeId> {
        self.input.focus_node.filter(|n| self.document.contains(*n))
    }

    fn move_focus(&mut self, target: Option<NodeId>, out: &mut Vec<DomEvent>) {
        let next = target.and_then(|n| self.document.closest(n, FOCUSABLE));
        let prev = self.live_focus();
        if next == prev {
            return;
        }
        if let Some(node) = prev {
            out.push(DomEvent::new(EventKind::Blur, EventTarget::Node(node)));
        }
        self.input.focus_node = next;
        if let Some(node) = next {
            out.push(DomEvent::new(EventKind::Focus, EventTarget::Node(node)));
        }
    }

    /// Click plus the default action of the clicked control.
    ///
    /// Checkbox state flips before listeners run, as in a browser.
    fn activate(&mut self, node: NodeId, pos: Vec2, out: &mut Vec<DomEvent>) {
        out.push(DomEvent::new(EventKind::Click, EventTarget::Node(node)).at(pos));

        let Some(control) = self.document.closest(node, "button, input") else {
            return;
        };
        let kind = self.document.attribute(control, "type").map(str::to_ascii_lowercase);
        let is_button = self.document.tag(control) == Some("button");

        if !is_button && kind.as_deref() == Some("checkbox") {
            let checked = !self.document.checked(control);
            self.document.set_checked(control, checked);
            out.push(DomEvent::new(EventKind::Input, EventTarget::Node(control)));
            out.push(DomEvent::new(EventKind::Change, EventTarget::Node(control)));
            return;
        }

        let submits = match kind.as_deref() {
            Some("submit") => true,
            None => is_button,
            _ => false,
        };
        if submits {
            self.submit_enclosing_form(control, out);
        }
    }

    fn edit_key(&mut self, field: NodeId, key: Key, out: &mut Vec<DomEvent>) {
        match key {
            Key::Backspace => {
                let mut value = self.document.value(field).unwrap_or_default().to_string();
                if value.pop().is_some() {
                    self.document.set_value(field, &value);
                    out.push(DomEvent::new(EventKind::Input, EventTarget::Node(field)));
                }
            }
            // Implicit submission from single-line fields.
            Key::Enter if self.document.tag(field) == Some("input") => {
                self.submit_enclosing_form(field, out);
            }
            _ => {}
        }
    }

    fn submit_enclosing_form(&self, node: NodeId, out: &mut Vec<DomEvent>) {
        if let Some(form) = self.document.closest(node, "form") {
            out.push(DomEvent::new(EventKind::Submit, EventTarget::Node(form)));
        }
    }

    fn is_text_field(&self, node: NodeId) -> bool {
        match self.document.tag(node) {
            Some("textarea") => true,
            Some("input") => matches!(
                self.document
                    .attribute(node, "type")
                    .map(str::to_ascii_lowercase)
                    .as_deref(),
                None | Some("text" | "tel" | "email" | "password" | "search" | "url" | "number")
            ),
            _ => false,
        }
    }
}

fn node_or_document(node: Option<NodeId>) -> EventTarget {
    node.map_or(EventTarget::Document, EventTarget::Node)
}

// ── Drivers ───────────────────────────────────────────────────────────────────

impl Runtime<ManualClock> {
    /// Moves the manual clock forward by `ms`, pumping once per frame interval
    /// (the last step may be shorter).
    pub fn advance<A: App>(&mut self, ms: f64, app: &mut A) -> AppControl {
        let end = self.clock.now().as_millis() + ms.max(0.0);
        loop {
            let now = self.clock.now().as_millis();
            if now >= end {
                return AppControl::Continue;
            }
            self.clock.set((now + self.config.frame_interval_ms).min(end));
            if self.pump(app) == AppControl::Exit {
                return AppControl::Exit;
            }
        }
    }

    /// Pumps `frames` frames, one frame interval apart.
    pub fn run_frames<A: App>(&mut self, frames: usize, app: &mut A) -> AppControl {
        for _ in 0..frames {
            self.clock.advance(self.config.frame_interval_ms);
            if self.pump(app) == AppControl::Exit {
                return AppControl::Exit;
            }
        }
        AppControl::Continue
    }
}

impl Runtime<SystemClock> {
    /// Drives the app in real time.
    ///
    /// Returns when the app asks to exit, or once nothing is queued or
    /// scheduled (no further callback could ever run).
    pub fn run<A: App>(&mut self, app: &mut A) -> Result<()> {
        let interval = Duration::from_secs_f64(self.config.frame_interval_ms / 1000.0);
        loop {
            let started = Instant::now();
            if self.pump(app) == AppControl::Exit {
                log::info!("app requested exit");
                return Ok(());
            }
            if self.queue.is_empty()
                && self.scheduler.pending_frames() == 0
                && self.scheduler.pending_timers() == 0
            {
                log::info!("runtime idle, stopping");
                return Ok(());
            }
            if let Some(rest) = interval.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::input::{Modifiers, PointerButtonEvent, PointerMoveEvent, TextEvent, TouchEvent};
    use crate::runtime::{ListenerId, OwnerId};

    /// Records every callback; optionally detaches a listener or re-requests frames.
    #[derive(Default)]
    struct Recorder {
        events: Vec<(EventKind, EventTarget, OwnerId)>,
        timers: Vec<OwnerId>,
        frames: Vec<(OwnerId, f64)>,
        detach_on_first: Option<ListenerId>,
        rerequest: bool,
    }

    impl App for Recorder {
        fn on_event(&mut self, ctx: &mut HostCtx<'_>, d: &Dispatch) -> AppControl {
            self.events.push((d.event.kind, d.event.target, d.owner));
            if let Some(id) = self.detach_on_first.take() {
                ctx.unlisten(id);
            }
            AppControl::Continue
        }

        fn on_timer(&mut self, _ctx: &mut HostCtx<'_>, t: TimerFired) -> AppControl {
            self.timers.push(t.owner);
            AppControl::Continue
        }

        fn on_frame(&mut self, ctx: &mut HostCtx<'_>, f: FrameFired) -> AppControl {
            self.frames.push((f.owner, f.time.dt));
            if self.rerequest {
                ctx.request_frame(f.owner);
            }
            AppControl::Continue
        }
    }

    /// root > form > [field (text input), button, checkbox]
    struct Fixture {
        rt: Runtime<ManualClock>,
        form: NodeId,
        field: NodeId,
        button: NodeId,
        checkbox: NodeId,
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new("body", Viewport::new(800.0, 600.0));
        let root = doc.root();
        let form = doc.append_element(root, "form");
        doc.set_bounds(form, Rect::new(0.0, 0.0, 400.0, 300.0));
        let field = doc.append_element(form, "input");
        doc.set_attribute(field, "type", "text");
        doc.set_bounds(field, Rect::new(10.0, 10.0, 200.0, 20.0));
        let button = doc.append_element(form, "button");
        doc.set_bounds(button, Rect::new(10.0, 50.0, 80.0, 20.0));
        let checkbox = doc.append_element(form, "input");
        doc.set_attribute(checkbox, "type", "checkbox");
        doc.set_bounds(checkbox, Rect::new(10.0, 90.0, 20.0, 20.0));

        let rt = Runtime::new(doc, ManualClock::new(), RuntimeConfig::default()).unwrap();
        Fixture { rt, form, field, button, checkbox }
    }

    fn click(rt: &mut Runtime<ManualClock>, x: f64, y: f64) {
        for state in [MouseButtonState::Pressed, MouseButtonState::Released] {
            rt.push_event(InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state,
                x,
                y,
                modifiers: Modifiers::default(),
            }));
        }
    }

    fn kinds(app: &Recorder) -> Vec<EventKind> {
        app.events.iter().map(|(k, _, _)| *k).collect()
    }

    // ── Construction ──────────────────────────────────────────────────────────

    #[test]
    fn rejects_bad_config() {
        let doc = Document::new("body", Viewport::new(800.0, 600.0));
        assert!(Runtime::new(doc, ManualClock::new(), RuntimeConfig::default().frame_interval_ms(0.0)).is_err());

        let doc = Document::new("body", Viewport::new(800.0, 600.0));
        let cfg = RuntimeConfig::default().viewport(Viewport::new(0.0, 10.0));
        assert!(Runtime::new(doc, ManualClock::new(), cfg).is_err());
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    #[test]
    fn click_bubbles_from_target_to_document() {
        let mut f = fixture();
        let (a, b) = f.rt.with_ctx(|ctx| {
            let a = ctx.new_owner();
            let b = ctx.new_owner();
            ctx.listen(EventTarget::Node(f.form), EventKind::Click, a);
            ctx.listen(EventTarget::Document, EventKind::Click, b);
            (a, b)
        });
        let mut app = Recorder::default();
        click(&mut f.rt, 15.0, 15.0);
        f.rt.pump(&mut app);

        let clicks: Vec<_> = app.events.iter().filter(|(k, _, _)| *k == EventKind::Click).collect();
        assert_eq!(clicks.len(), 2);
        assert_eq!(clicks[0].2, a);
        assert_eq!(clicks[1].2, b);
        assert_eq!(clicks[0].1, EventTarget::Node(f.field));
    }

    #[test]
    fn listener_detached_mid_dispatch_is_skipped() {
        let mut f = fixture();
        let second = f.rt.with_ctx(|ctx| {
            let owner = ctx.new_owner();
            ctx.listen(EventTarget::Window, EventKind::Resize, owner);
            ctx.listen(EventTarget::Window, EventKind::Resize, owner)
        });
        let mut app = Recorder { detach_on_first: Some(second), ..Recorder::default() };
        f.rt.push_event(InputEvent::Resized(Viewport::new(500.0, 500.0)));
        f.rt.pump(&mut app);

        assert_eq!(app.events.len(), 1);
        assert_eq!(f.rt.document().viewport(), Viewport::new(500.0, 500.0));
    }

    #[test]
    fn hover_emits_enter_and_leave_per_node() {
        let mut f = fixture();
        let owner = f.rt.with_ctx(|ctx| {
            let owner = ctx.new_owner();
            ctx.listen(EventTarget::Node(f.form), EventKind::PointerEnter, owner);
            ctx.listen(EventTarget::Node(f.form), EventKind::PointerLeave, owner);
            ctx.listen(EventTarget::Node(f.field), EventKind::PointerEnter, owner);
            owner
        });
        let mut app = Recorder::default();

        f.rt.push_event(InputEvent::PointerMoved(PointerMoveEvent { x: 15.0, y: 15.0 }));
        f.rt.pump(&mut app);
        // Outermost first; the field's enter does not bubble to the form.
        assert_eq!(
            app.events,
            vec![
                (EventKind::PointerEnter, EventTarget::Node(f.form), owner),
                (EventKind::PointerEnter, EventTarget::Node(f.field), owner),
            ]
        );

        app.events.clear();
        f.rt.push_event(InputEvent::PointerMoved(PointerMoveEvent { x: 300.0, y: 200.0 }));
        f.rt.pump(&mut app);
        assert!(app.events.is_empty());

        f.rt.push_event(InputEvent::PointerLeft);
        f.rt.pump(&mut app);
        assert_eq!(kinds(&app), vec![EventKind::PointerLeave]);
    }

    // ── Default actions ───────────────────────────────────────────────────────

    #[test]
    fn checkbox_toggles_then_fires_input_and_change() {
        let mut f = fixture();
        f.rt.with_ctx(|ctx| {
            let owner = ctx.new_owner();
            for kind in [EventKind::Click, EventKind::Input, EventKind::Change] {
                ctx.listen(EventTarget::Node(f.checkbox), kind, owner);
            }
        });
        let mut app = Recorder::default();
        click(&mut f.rt, 15.0, 95.0);
        f.rt.pump(&mut app);

        assert!(f.rt.document().checked(f.checkbox));
        assert_eq!(kinds(&app), vec![EventKind::Click, EventKind::Input, EventKind::Change]);
    }

    #[test]
    fn button_click_submits_form() {
        let mut f = fixture();
        let owner = f.rt.with_ctx(|ctx| {
            let owner = ctx.new_owner();
            ctx.listen(EventTarget::Node(f.form), EventKind::Submit, owner);
            owner
        });
        assert_eq!(f.rt.document().hit_test(Vec2::new(20.0, 55.0)), Some(f.button));

        let mut app = Recorder::default();
        click(&mut f.rt, 20.0, 55.0);
        f.rt.pump(&mut app);
        assert_eq!(app.events, vec![(EventKind::Submit, EventTarget::Node(f.form), owner)]);
    }

    #[test]
    fn typing_edits_focused_field() {
        let mut f = fixture();
        f.rt.with_ctx(|ctx| {
            let owner = ctx.new_owner();
            for kind in [EventKind::Focus, EventKind::Blur, EventKind::Input] {
                ctx.listen(EventTarget::Node(f.field), kind, owner);
            }
        });
        let mut app = Recorder::default();
        click(&mut f.rt, 15.0, 15.0);
        f.rt.push_event(InputEvent::Text(TextEvent { text: "ab".into() }));
        f.rt.push_event(InputEvent::Key {
            key: Key::Backspace,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        });
        click(&mut f.rt, 300.0, 200.0);
        f.rt.pump(&mut app);

        assert_eq!(f.rt.document().value(f.field), Some("a"));
        assert_eq!(
            kinds(&app),
            vec![EventKind::Focus, EventKind::Input, EventKind::Input, EventKind::Blur]
        );
        assert_eq!(f.rt.input().focus_node, None);
    }

    #[test]
    fn touch_moves_stay_with_start_node() {
        let mut f = fixture();
        let owner = f.rt.with_ctx(|ctx| {
            let owner = ctx.new_owner();
            ctx.listen(EventTarget::Node(f.field), EventKind::TouchMove, owner);
            ctx.listen(EventTarget::Node(f.field), EventKind::TouchEnd, owner);
            owner
        });
        let mut app = Recorder::default();
        let touch = |phase, x| InputEvent::Touch(TouchEvent { id: 7, phase, x, y: 15.0 });
        f.rt.push_event(touch(TouchPhase::Started, 15.0));
        f.rt.push_event(touch(TouchPhase::Moved, 700.0));
        f.rt.push_event(touch(TouchPhase::Ended, 700.0));
        f.rt.pump(&mut app);

        assert_eq!(
            app.events,
            vec![
                (EventKind::TouchMove, EventTarget::Node(f.field), owner),
                (EventKind::TouchEnd, EventTarget::Node(f.field), owner),
            ]
        );
    }

    // ── Timers and frames ─────────────────────────────────────────────────────

    #[test]
    fn frame_requested_during_frame_runs_next_pump() {
        let mut f = fixture();
        let owner = f.rt.with_ctx(|ctx| {
            let owner = ctx.new_owner();
            ctx.request_frame(owner);
            owner
        });
        let mut app = Recorder { rerequest: true, ..Recorder::default() };
        f.rt.run_frames(3, &mut app);
        assert_eq!(app.frames.len(), 3);
        assert!(app.frames.iter().all(|(o, _)| *o == owner));
        assert_eq!(f.rt.scheduler().pending_frames(), 1);
    }

    #[test]
    fn timers_fire_before_frames_once_due() {
        let mut f = fixture();
        f.rt.with_ctx(|ctx| {
            let owner = ctx.new_owner();
            ctx.set_timeout(owner, 250.0);
        });
        let mut app = Recorder::default();
        f.rt.advance(200.0, &mut app);
        assert!(app.timers.is_empty());
        f.rt.advance(100.0, &mut app);
        assert_eq!(app.timers.len(), 1);
        assert_eq!(f.rt.scheduler().pending_timers(), 0);
    }

    #[test]
    fn advance_lands_exactly_on_target_time() {
        let mut f = fixture();
        let mut app = Recorder::default();
        f.rt.advance(1000.0, &mut app);
        assert_eq!(f.rt.now().as_millis(), 1000.0);
    }

    // ── Real-time driver ──────────────────────────────────────────────────────

    /// Keeps one frame chain alive for `left` more frames, then exits.
    struct Countdown {
        left: usize,
        frames: usize,
    }

    impl App for Countdown {
        fn on_frame(&mut self, ctx: &mut HostCtx<'_>, f: FrameFired) -> AppControl {
            self.frames += 1;
            if self.left == 0 {
                return AppControl::Exit;
            }
            self.left -= 1;
            ctx.request_frame(f.owner);
            AppControl::Continue
        }
    }

    fn realtime() -> Runtime<SystemClock> {
        let doc = Document::new("body", Viewport::new(800.0, 600.0));
        Runtime::new(doc, SystemClock::new(), RuntimeConfig::default().frame_interval_ms(1.0)).unwrap()
    }

    #[test]
    fn run_returns_when_app_exits() {
        let mut rt = realtime();
        rt.with_ctx(|ctx| {
            let owner = ctx.new_owner();
            ctx.request_frame(owner);
        });

        let mut app = Countdown { left: 3, frames: 0 };
        rt.run(&mut app).unwrap();
        assert_eq!(app.frames, 4);
        assert_eq!(rt.scheduler().pending_frames(), 0);
    }

    #[test]
    fn run_returns_once_idle() {
        let mut rt = realtime();
        let owner = rt.with_ctx(|ctx| {
            let owner = ctx.new_owner();
            ctx.set_timeout(owner, 5.0);
            owner
        });

        let mut app = Recorder::default();
        rt.run(&mut app).unwrap();
        assert_eq!(app.timers, vec![owner]);
        assert!(rt.now().as_millis() >= 5.0);
        assert_eq!(rt.scheduler().pending_timers(), 0);
    }
}
