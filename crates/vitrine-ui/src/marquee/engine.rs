use vitrine_engine::core::{Dispatch, FrameFired, HostCtx, TimerFired};
use vitrine_engine::dom::{NodeId, Surface};
use vitrine_engine::runtime::{EventKind, EventTarget, FrameHandle, ListenerId, OwnerId};
use vitrine_engine::time::{Debouncer, FrameClock, Timestamp};

use crate::component::Component;
use crate::error::{ConfigError, GeometryError};
use crate::target::Target;

use super::config::validate_speed;
use super::motion::{self, MAX_FRAME_DELTA};
use super::{Direction, TickerConfig};

/// Marker attribute carried by every clone.
pub const CLONE_ATTR: &str = "data-marquee-clone";

const CLONE_SELECTOR: &str = "[data-marquee-clone]";

/// Quiet window for viewport resize bursts, in milliseconds.
pub const RESIZE_DEBOUNCE_MS: f64 = 250.0;

/// One continuously scrolling ticker.
///
/// The track's children at construction are the originals; enough tagged
/// copies are appended after them to cover the viewport, and the track is
/// translated left or right once per frame, jumping back by exactly one
/// content width when it has travelled that far.
#[derive(Debug)]
pub struct MarqueeEngine {
    owner: OwnerId,
    track: NodeId,
    config: TickerConfig,
    originals: Vec<NodeId>,

    clone_count: usize,
    content_width: Option<f64>,
    position: f64,

    running: bool,
    paused: bool,
    geometry_pending: bool,
    alive: bool,

    frame: Option<FrameHandle>,
    clock: FrameClock,
    resize: Debouncer,
    listeners: Vec<ListenerId>,
}

impl MarqueeEngine {
    /// Builds the ticker on `target` and starts it if `auto_start` is set.
    ///
    /// A zero-width measurement is not fatal: geometry is retried on the next
    /// frame or resize.
    pub fn create(
        ctx: &mut HostCtx<'_>,
        target: impl Into<Target>,
        config: TickerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let track = target.into().resolve(ctx.surface)?;

        let originals: Vec<NodeId> = ctx
            .surface
            .children(track)
            .into_iter()
            .filter(|n| ctx.surface.attribute(*n, CLONE_ATTR).is_none())
            .collect();

        ctx.surface.set_style(track, "display", Some("flex"));
        ctx.surface.set_style(track, "flex-wrap", Some("nowrap"));

        let owner = ctx.new_owner();
        let mut engine = Self {
            owner,
            track,
            config,
            originals,
            clone_count: 0,
            content_width: None,
            position: 0.0,
            running: false,
            paused: false,
            geometry_pending: true,
            alive: true,
            frame: None,
            clock: FrameClock::with_clamps(ctx.now, 0.0, MAX_FRAME_DELTA),
            resize: Debouncer::new(RESIZE_DEBOUNCE_MS),
            listeners: Vec::new(),
        };

        engine.attach_listeners(ctx);

        if let Err(e) = engine.recompute_geometry(ctx.surface) {
            log::warn!("marquee {:?}: {e}; retrying on next frame or resize", owner);
        }

        log::debug!(
            "marquee {:?} on node #{}: {} originals, {} clones, {} px/s {}",
            owner,
            track.index(),
            engine.originals.len(),
            engine.clone_count,
            engine.config.speed_px_per_second,
            engine.config.direction
        );

        if engine.config.auto_start {
            engine.start(ctx);
        }
        Ok(engine)
    }

    fn attach_listeners(&mut self, ctx: &mut HostCtx<'_>) {
        let node = EventTarget::Node(self.track);
        let mut wanted = vec![
            (EventTarget::Document, EventKind::VisibilityChange),
            (EventTarget::Window, EventKind::Resize),
        ];
        if self.config.pause_on_hover {
            wanted.extend([
                (node, EventKind::PointerEnter),
                (node, EventKind::PointerLeave),
                (node, EventKind::TouchStart),
                (node, EventKind::TouchEnd),
            ]);
        }
        for (target, kind) in wanted {
            self.listeners.push(ctx.listen(target, kind, self.owner));
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn track(&self) -> NodeId {
        self.track
    }

    pub fn config(&self) -> &TickerConfig {
        &self.config
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Width of one copy of the originals, gaps included.
    pub fn content_width(&self) -> Option<f64> {
        self.content_width
    }

    pub fn clone_count(&self) -> usize {
        self.clone_count
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_destroyed(&self) -> bool {
        !self.alive
    }

    pub fn is_geometry_pending(&self) -> bool {
        self.geometry_pending
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    /// Rebuilds the clone set from the originals' current widths.
    ///
    /// Resets the position to the direction's start value. On error nothing
    /// is cloned and no transform is written.
    pub fn recompute_geometry(&mut self, surface: &mut dyn Surface) -> Result<(), GeometryError> {
        if !self.alive {
            return Ok(());
        }

        self.remove_clones(surface);

        let gap = self.config.gap_px;
        let items_width: f64 = self
            .originals
            .iter()
            .filter(|n| surface.contains(**n))
            .map(|n| surface.bounds(*n).width() + gap)
            .sum();

        if !(items_width.is_finite() && items_width > 0.0) {
            self.geometry_pending = true;
            self.content_width = None;
            return Err(GeometryError { items_width });
        }

        let viewport_width = surface.viewport().width;
        let count = motion::clone_count(viewport_width, items_width);
        if motion::exceeds_clone_cap(viewport_width, items_width) {
            log::warn!(
                "marquee {:?}: {items_width}px of content cannot fill {viewport_width}px with {count} clone sets",
                self.owner
            );
        }
        for _ in 0..count {
            for original in &self.originals {
                let Some(copy) = surface.clone_node(*original) else {
                    continue;
                };
                surface.set_attribute(copy, CLONE_ATTR, "true");
                surface.set_attribute(copy, "aria-hidden", "true");
                surface.append_child(self.track, copy);
            }
        }

        self.clone_count = count;
        self.content_width = Some(items_width);
        self.geometry_pending = false;
        self.position = motion::start_position(self.config.direction, items_width);
        self.write_transform(surface);

        log::debug!(
            "marquee {:?}: content width {items_width}px, {count} clone sets",
            self.owner
        );
        Ok(())
    }

    fn remove_clones(&mut self, surface: &mut dyn Surface) {
        for clone in surface.query_all(Some(self.track), CLONE_SELECTOR) {
            surface.remove(clone);
        }
        self.clone_count = 0;
    }

    fn write_transform(&self, surface: &mut dyn Surface) {
        if !self.position.is_finite() {
            log::warn!("marquee {:?}: refusing non-finite position {}", self.owner, self.position);
            return;
        }
        surface.set_style(self.track, "transform", Some(motion::transform(self.position).as_str()));
    }

    // ── Frame loop ────────────────────────────────────────────────────────

    /// Advances one frame at `now` and keeps the frame chain alive.
    ///
    /// Stopped: no-op. Paused: only reschedules.
    pub fn tick(&mut self, ctx: &mut HostCtx<'_>, now: Timestamp) {
        if !self.alive || !self.running {
            return;
        }

        if self.geometry_pending {
            match self.recompute_geometry(ctx.surface) {
                Ok(()) => self.clock.reset(now),
                Err(e) => log::trace!("marquee {:?}: still deferred: {e}", self.owner),
            }
        }

        if !self.paused {
            let dt = self.clock.tick(now).dt;
            if let Some(width) = self.content_width {
                self.position = motion::step(
                    self.position,
                    self.config.direction,
                    self.config.speed_px_per_second,
                    dt,
                    width,
                );
                self.write_transform(ctx.surface);
            }
        }

        self.ensure_frame(ctx);
    }

    fn ensure_frame(&mut self, ctx: &mut HostCtx<'_>) {
        if self.frame.is_none() {
            self.frame = Some(ctx.request_frame(self.owner));
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Starts the frame chain. Idempotent while running.
    pub fn start(&mut self, ctx: &mut HostCtx<'_>) {
        if !self.alive {
            log::warn!("marquee {:?}: start after destroy ignored", self.owner);
            return;
        }
        if self.running {
            return;
        }
        self.running = true;
        self.paused = false;
        self.clock.reset(ctx.now);
        self.ensure_frame(ctx);
    }

    /// Cancels the frame chain; the position is frozen. Idempotent.
    pub fn stop(&mut self, ctx: &mut HostCtx<'_>) {
        if let Some(handle) = self.frame.take() {
            ctx.cancel_frame(handle);
        }
        self.running = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Clears the pause; elapsed paused time is not integrated.
    pub fn resume(&mut self, now: Timestamp) {
        self.paused = false;
        self.clock.reset(now);
    }

    pub fn set_speed(&mut self, px_per_second: f64) -> Result<(), ConfigError> {
        validate_speed(px_per_second)?;
        self.config.speed_px_per_second = px_per_second;
        Ok(())
    }

    /// Changes direction without a visual jump.
    pub fn set_direction(&mut self, direction: Direction) {
        if direction == self.config.direction {
            return;
        }
        self.config.direction = direction;
        if let Some(width) = self.content_width {
            self.position = motion::normalize_for(self.position, direction, width);
        }
    }

    /// Restores the track and releases everything the engine registered.
    pub fn destroy(&mut self, ctx: &mut HostCtx<'_>) {
        if !self.alive {
            log::warn!("marquee {:?}: already destroyed", self.owner);
            return;
        }
        self.stop(ctx);
        self.resize.cancel(ctx.scheduler);
        for id in self.listeners.drain(..) {
            ctx.unlisten(id);
        }
        self.remove_clones(ctx.surface);
        ctx.surface.set_style(self.track, "transform", None);
        self.content_width = None;
        self.alive = false;
        log::debug!("marquee {:?} destroyed", self.owner);
    }
}

impl Component for MarqueeEngine {
    fn owner(&self) -> OwnerId {
        self.owner
    }

    fn handle_event(&mut self, ctx: &mut HostCtx<'_>, dispatch: &Dispatch) {
        if !self.alive || !self.listeners.contains(&dispatch.listener) {
            return;
        }
        match dispatch.event.kind {
            EventKind::PointerEnter | EventKind::TouchStart => self.pause(),
            EventKind::PointerLeave | EventKind::TouchEnd => self.resume(ctx.now),
            EventKind::VisibilityChange => {
                if ctx.surface.is_hidden() {
                    self.pause();
                } else {
                    self.resume(ctx.now);
                }
            }
            EventKind::Resize => self.resize.signal(ctx.scheduler, self.owner, ctx.now),
            _ => {}
        }
    }

    fn handle_timer(&mut self, ctx: &mut HostCtx<'_>, timer: TimerFired) {
        if !self.alive || !self.resize.accept(timer.handle) {
            return;
        }
        match self.recompute_geometry(ctx.surface) {
            Ok(()) => self.clock.reset(ctx.now),
            Err(e) => log::warn!("marquee {:?}: {e}; retrying on next frame or resize", self.owner),
        }
    }

    fn handle_frame(&mut self, ctx: &mut HostCtx<'_>, frame: FrameFired) {
        if self.frame != Some(frame.handle) {
            return;
        }
        self.frame = None;
        self.tick(ctx, frame.time.now);
    }

    fn destroy(&mut self, ctx: &mut HostCtx<'_>) {
        MarqueeEngine::destroy(self, ctx);
    }
}
