use anyhow::{Context, Result};

use vitrine_engine::coords::Viewport;
use vitrine_engine::core::{Dispatch, FrameFired, TimerFired};
use vitrine_engine::input::{
    InputEvent, Key, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent, TextEvent,
};
use vitrine_engine::logging::{init_logging, LoggingConfig};
use vitrine_engine::runtime::{DomEvent, EventKind, EventTarget};
use vitrine_ui::prelude::*;

/// Logs every submission and refuses the first `fail_first` of them.
struct LoggingTransport {
    fail_first: usize,
    calls: usize,
}

impl FormTransport for LoggingTransport {
    fn submit(&mut self, url: &str, data: &FormData) -> Result<(), SubmitError> {
        self.calls += 1;
        log::info!("POST {url} ({} fields)", data.len());
        for (name, value) in data.entries() {
            log::info!("    {name} = {value:?}");
        }
        if self.calls <= self.fail_first {
            return Err(SubmitError::Status(503));
        }
        Ok(())
    }
}

type Rt = Runtime<ManualClock>;

/// Frames played by `--realtime` (two seconds at 60 Hz).
const REALTIME_FRAMES: usize = 120;

/// Forwards to the page and exits after a fixed number of frames.
struct Timed {
    page: Page,
    frames_left: usize,
}

impl App for Timed {
    fn on_event(&mut self, ctx: &mut HostCtx<'_>, dispatch: &Dispatch) -> AppControl {
        self.page.on_event(ctx, dispatch)
    }

    fn on_timer(&mut self, ctx: &mut HostCtx<'_>, timer: TimerFired) -> AppControl {
        self.page.on_timer(ctx, timer)
    }

    fn on_frame(&mut self, ctx: &mut HostCtx<'_>, frame: FrameFired) -> AppControl {
        let control = self.page.on_frame(ctx, frame);
        if self.frames_left == 0 {
            return AppControl::Exit;
        }
        self.frames_left -= 1;
        control
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default().filter("info,vitrine_ui=debug").timestamps(false));

    println!();
    println!("  ┌──────────────────────────────────────┐");
    println!("  │   VITRINE STUDIO · headless session   │");
    println!("  └──────────────────────────────────────┘");
    println!();

    let doc = load_document(include_str!("../ui/home.vml")).context("loading ui/home.vml")?;
    let mut rt = Runtime::new(doc, ManualClock::new(), RuntimeConfig::default())?;

    let mut transports = |url: &str| -> Box<dyn FormTransport> {
        log::info!("form transport for {url}");
        Box::new(LoggingTransport { fail_first: 1, calls: 0 })
    };
    let mut page = rt
        .with_ctx(|ctx| Page::mount(ctx, &PageConfig::default(), &mut transports))
        .context("mounting page")?;

    // ── Marquees ──────────────────────────────────────────────────────────
    rt.advance(1000.0, &mut page);
    report(&page, "after 1 s");

    rt.push_event(InputEvent::PointerMoved(PointerMoveEvent { x: 1200.0, y: 80.0 }));
    rt.advance(500.0, &mut page);
    report(&page, "hovering client logos");
    rt.push_event(InputEvent::PointerLeft);
    rt.advance(500.0, &mut page);
    report(&page, "pointer gone");

    rt.push_event(InputEvent::VisibilityChanged { hidden: true });
    rt.advance(3000.0, &mut page);
    report(&page, "tab hidden for 3 s");
    rt.push_event(InputEvent::VisibilityChanged { hidden: false });
    rt.advance(500.0, &mut page);
    report(&page, "tab visible again");

    for width in [1100.0, 900.0, 640.0] {
        rt.push_event(InputEvent::Resized(Viewport::new(width, 720.0)));
        rt.advance(100.0, &mut page);
    }
    rt.advance(300.0, &mut page);
    for key in page.registry().keys() {
        if let Some(engine) = page.registry().get(key) {
            log::info!("marquee `{key}`: {} clone sets at 640 px", engine.clone_count());
        }
    }

    page.registry_mut()
        .set_speed("client", 80.0)
        .context("speeding up client logos")?;
    rt.advance(1000.0, &mut page);
    report(&page, "client at 80 px/s");

    // ── Slider ────────────────────────────────────────────────────────────
    press(&mut rt, MouseButtonState::Pressed, 800.0, 400.0);
    rt.push_event(InputEvent::PointerMoved(PointerMoveEvent { x: 650.0, y: 400.0 }));
    press(&mut rt, MouseButtonState::Released, 650.0, 400.0);
    rt.pump(&mut page);
    log::info!("slider after swipe left: slide {}", current_slide(&page));

    if let Some(control) = page.sliders().first().and_then(|s| s.controls().first().copied()) {
        rt.push_event(
            DomEvent::new(EventKind::KeyDown, EventTarget::Node(control))
                .with_key(Key::ArrowRight, Modifiers::default()),
        );
        rt.pump(&mut page);
    }
    log::info!("slider after ArrowRight: slide {}", current_slide(&page));

    // ── Contact form ──────────────────────────────────────────────────────
    fill(&mut rt, &mut page, "input[name=name]", "Анна Иванова");
    fill(&mut rt, &mut page, "input[name=company]", "Aurora");
    fill(&mut rt, &mut page, "input[name=email]", "anna@aurora.example");
    fill(&mut rt, &mut page, "input[name=phone]", "9123456789");
    fill(&mut rt, &mut page, "textarea[name=message]", "Хотим обсудить витрину для нового бренда");
    click(&mut rt, &mut page, "input[name=agreement]");

    for attempt in 1..=2 {
        click(&mut rt, &mut page, "button[type=submit]");
        let outcome = page.form("footerForm").and_then(|f| f.last_outcome().cloned());
        log::info!("submit attempt {attempt}: {outcome:?}");
    }
    log::info!("host alerts: {:?}", rt.document().alerts());

    let modals = rt.document().query_all(None, ".form-success-modal").len();
    rt.advance(5000.0, &mut page);
    let left = rt.document().query_all(None, ".form-success-modal").len();
    log::info!("success modals: {modals} shown, {left} left after 5 s");

    rt.with_ctx(|ctx| page.destroy(ctx));
    log::info!(
        "session done at {:.0} ms: {} listeners, {} frames, {} timers left",
        rt.now().as_millis(),
        rt.listeners().len(),
        rt.scheduler().pending_frames(),
        rt.scheduler().pending_timers()
    );

    if std::env::args().any(|arg| arg == "--realtime") {
        run_realtime(&mut transports)?;
    }
    Ok(())
}

/// Replays the page on the wall clock for [`REALTIME_FRAMES`] frames.
fn run_realtime(transports: &mut dyn FnMut(&str) -> Box<dyn FormTransport>) -> Result<()> {
    let doc = load_document(include_str!("../ui/home.vml")).context("loading ui/home.vml")?;
    let mut rt = Runtime::new(doc, SystemClock::new(), RuntimeConfig::default())?;
    let page = rt
        .with_ctx(|ctx| Page::mount(ctx, &PageConfig::default(), transports))
        .context("mounting page")?;

    let mut app = Timed { page, frames_left: REALTIME_FRAMES };
    rt.run(&mut app)?;
    report(&app.page, "real time");
    rt.with_ctx(|ctx| app.page.destroy(ctx));
    Ok(())
}

fn report(page: &Page, label: &str) {
    for key in page.registry().keys() {
        if let Some(engine) = page.registry().get(key) {
            log::info!(
                "[{label}] `{key}`: x = {:.2} px, paused = {}",
                engine.position(),
                engine.is_paused()
            );
        }
    }
}

fn current_slide(page: &Page) -> usize {
    page.sliders().first().map_or(0, Slider::current)
}

fn press(rt: &mut Rt, state: MouseButtonState, x: f64, y: f64) {
    rt.push_event(InputEvent::PointerButton(PointerButtonEvent {
        button: MouseButton::Left,
        state,
        x,
        y,
        modifiers: Modifiers::default(),
    }));
}

/// Clicks the middle of the first element matching `selector`.
fn click(rt: &mut Rt, page: &mut Page, selector: &str) {
    let Some(node) = rt.document().query(None, selector) else {
        log::warn!("nothing matches {selector}");
        return;
    };
    let b = rt.document().bounds(node);
    let (x, y) = (b.origin.x + b.size.x / 2.0, b.origin.y + b.size.y / 2.0);
    press(rt, MouseButtonState::Pressed, x, y);
    press(rt, MouseButtonState::Released, x, y);
    rt.pump(page);
}

fn fill(rt: &mut Rt, page: &mut Page, selector: &str, text: &str) {
    click(rt, page, selector);
    rt.push_event(InputEvent::Text(TextEvent { text: text.to_string() }));
    rt.pump(page);
}
