//! Shared fixtures for component tests.

use vitrine_engine::core::{App, AppControl, Dispatch, FrameFired, HostCtx, TimerFired};
use vitrine_engine::coords::{Rect, Viewport};
use vitrine_engine::dom::{Document, NodeId, Surface};
use vitrine_engine::runtime::{Runtime, RuntimeConfig};
use vitrine_engine::time::ManualClock;

use crate::component::Component;

/// Frame period with an exact binary representation (62.5 ms).
pub const FRAME_MS: f64 = 62.5;

/// Hosts a single component as the runtime's app.
pub struct Solo<C>(pub C);

impl<C: Component> App for Solo<C> {
    fn on_event(&mut self, ctx: &mut HostCtx<'_>, dispatch: &Dispatch) -> AppControl {
        self.0.handle_event(ctx, dispatch);
        AppControl::Continue
    }

    fn on_timer(&mut self, ctx: &mut HostCtx<'_>, timer: TimerFired) -> AppControl {
        self.0.handle_timer(ctx, timer);
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut HostCtx<'_>, frame: FrameFired) -> AppControl {
        self.0.handle_frame(ctx, frame);
        AppControl::Continue
    }
}

pub fn runtime(doc: Document) -> Runtime<ManualClock> {
    Runtime::new(doc, ManualClock::new(), RuntimeConfig::default().frame_interval_ms(FRAME_MS)).unwrap()
}

pub fn blank_document() -> Document {
    Document::new("body", Viewport::new(1000.0, 600.0))
}

/// `body > div#marquee-track > div.logo*` with the given item widths laid out
/// left to right, 50 px tall.
pub fn ticker_document(widths: &[f64]) -> (Document, NodeId, Vec<NodeId>) {
    let mut doc = blank_document();
    let root = doc.root();
    let track = doc.append_element(root, "div");
    doc.set_attribute(track, "id", "marquee-track");
    doc.set_bounds(track, Rect::new(0.0, 0.0, 1000.0, 50.0));

    let mut x = 0.0;
    let items = widths
        .iter()
        .map(|w| {
            let item = doc.append_element(track, "div");
            doc.add_class(item, "logo");
            doc.set_bounds(item, Rect::new(x, 0.0, *w, 50.0));
            x += w;
            item
        })
        .collect();
    (doc, track, items)
}
