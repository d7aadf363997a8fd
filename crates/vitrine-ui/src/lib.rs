//! Vitrine UI: showcase-page behaviors on top of `vitrine-engine`.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use vitrine_ui::prelude::*;
//!
//! let doc = load_document(include_str!("../ui/home.vml"))?;
//! let mut rt = Runtime::new(doc, ManualClock::new(), RuntimeConfig::default())?;
//!
//! let mut page = rt.with_ctx(|ctx| {
//!     Page::mount(ctx, &PageConfig::default(), &mut |_url: &str| {
//!         Box::new(MyTransport::default()) as Box<dyn FormTransport>
//!     })
//! })?;
//!
//! rt.run_frames(60, &mut page);
//! page.registry_mut().set_speed("client", 80.0)?;
//! ```
//!
//! # Writing a component
//!
//! Implement [`Component`](component::Component): register listeners,
//! timers and frames under your own `OwnerId` and react in the hooks. The
//! [`Page`](page::Page) routes callbacks back by owner.

pub mod component;
pub mod error;
pub mod form;
pub mod loader;
pub mod marquee;
pub mod page;
pub mod registry;
pub mod slider;
pub mod target;

#[cfg(test)]
mod testing;

pub mod prelude {
    pub use crate::component::Component;
    pub use crate::error::{ConfigError, GeometryError};
    pub use crate::form::{
        FieldRule, FormData, FormOptions, FormTransport, FormValidator, MessageCatalog, RuleSet,
        SubmitError, SubmitOutcome,
    };
    pub use crate::loader::{load_document, LoadError};
    pub use crate::marquee::{Direction, MarqueeEngine, TickerConfig};
    pub use crate::page::{FormMount, MarqueeMount, Page, PageConfig};
    pub use crate::registry::MarqueeRegistry;
    pub use crate::slider::Slider;
    pub use crate::target::Target;

    pub use vitrine_engine::core::{App, AppControl, HostCtx};
    pub use vitrine_engine::dom::{Document, NodeId, Surface};
    pub use vitrine_engine::runtime::{Runtime, RuntimeConfig};
    pub use vitrine_engine::time::{ManualClock, SystemClock};
}
