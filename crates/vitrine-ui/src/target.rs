use vitrine_engine::dom::{NodeId, Surface};

use crate::error::ConfigError;

/// How a component names its root element.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// First element matching a selector.
    Selector(String),
    Node(NodeId),
}

impl Target {
    pub fn resolve(&self, surface: &dyn Surface) -> Result<NodeId, ConfigError> {
        let found = match self {
            Target::Selector(sel) => surface.query(None, sel),
            Target::Node(node) => Some(*node).filter(|n| surface.contains(*n)),
        };
        found.ok_or_else(|| ConfigError::TargetNotFound { target: self.to_string() })
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Selector(sel) => f.write_str(sel),
            Target::Node(node) => write!(f, "node #{}", node.index()),
        }
    }
}

impl From<&str> for Target {
    fn from(sel: &str) -> Self {
        Target::Selector(sel.to_string())
    }
}

impl From<String> for Target {
    fn from(sel: String) -> Self {
        Target::Selector(sel)
    }
}

impl From<NodeId> for Target {
    fn from(node: NodeId) -> Self {
        Target::Node(node)
    }
}
