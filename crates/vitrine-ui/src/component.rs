use vitrine_engine::core::{Dispatch, FrameFired, HostCtx, TimerFired};
use vitrine_engine::runtime::OwnerId;

/// A mounted behavior driven by the runtime.
///
/// Every listener, timer and frame request a component registers is tagged
/// with its [`OwnerId`]; the page routes callbacks back by that id. Leaf
/// components only override the hooks they use.
pub trait Component {
    fn owner(&self) -> OwnerId;

    fn handle_event(&mut self, _ctx: &mut HostCtx<'_>, _dispatch: &Dispatch) {}

    fn handle_timer(&mut self, _ctx: &mut HostCtx<'_>, _timer: TimerFired) {}

    fn handle_frame(&mut self, _ctx: &mut HostCtx<'_>, _frame: FrameFired) {}

    /// Detaches everything the component registered. Safe to call twice.
    fn destroy(&mut self, ctx: &mut HostCtx<'_>);
}
