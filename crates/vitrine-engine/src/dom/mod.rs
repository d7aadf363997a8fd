//! Rendering-surface abstraction.
//!
//! Components never touch a concrete tree: they go through the object-safe
//! [`Surface`] trait, which a browser binding or the headless [`Document`]
//! implements. Nodes are addressed by copyable [`NodeId`] handles.

mod document;
mod selector;
mod surface;

pub use document::Document;
pub use selector::{Selector, SelectorError};
pub use surface::Surface;

/// Handle to a node on a [`Surface`].
///
/// Handles are never reused within one document, so a stale handle simply
/// stops resolving after its node is removed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> u32 {
        self.0
    }
}
