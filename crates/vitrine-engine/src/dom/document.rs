use crate::coords::{Rect, Vec2, Viewport};

use super::selector::{ElementLike, Selector};
use super::{NodeId, Surface};

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    attrs: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    text: String,
    value: String,
    checked: bool,
    bounds: Rect,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            styles: Vec::new(),
            text: String::new(),
            value: String::new(),
            checked: false,
            bounds: Rect::default(),
            parent: None,
            children: Vec::new(),
        }
    }
}

impl ElementLike for NodeData {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

/// Headless in-memory document.
///
/// An arena of element nodes with explicit layout boxes. There is no layout
/// engine: bounds are whatever the builder (usually the markup loader) set,
/// and clones inherit the bounds of their source. That is enough for width
/// measurement and pointer hit-testing.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Option<NodeData>>,
    root: NodeId,
    viewport: Viewport,
    hidden: bool,
    scroll_history: Vec<NodeId>,
    alerts: Vec<String>,
}

impl Document {
    /// Creates a document with a single root element.
    pub fn new(root_tag: &str, viewport: Viewport) -> Self {
        let mut root = NodeData::new(root_tag);
        root.bounds = Rect::new(0.0, 0.0, viewport.width, viewport.height);
        Self {
            nodes: vec![Some(root)],
            root: NodeId(0),
            viewport,
            hidden: false,
            scroll_history: Vec::new(),
            alerts: Vec::new(),
        }
    }

    /// Updates the viewport; the root element is resized to match.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let root = self.root;
        if let Some(n) = self.node_mut(root) {
            n.bounds = Rect::new(0.0, 0.0, viewport.width, viewport.height);
        }
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn set_bounds(&mut self, node: NodeId, bounds: Rect) {
        if let Some(n) = self.node_mut(node) {
            n.bounds = bounds;
        }
    }

    /// Creates an element and appends it to `parent` in one step.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.create_element(tag);
        self.append_child(parent, id);
        id
    }

    /// Topmost node (last in document order) whose non-empty bounds contain `pos`.
    ///
    /// Detached nodes are never hit.
    pub fn hit_test(&self, pos: Vec2) -> Option<NodeId> {
        let mut hit = None;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            if !node.bounds.is_empty() && node.bounds.contains(pos) {
                hit = Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        hit
    }

    /// `node` followed by its ancestors up to the root.
    pub fn ancestry(&self, node: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut cur = self.node(node).map(|_| node);
        while let Some(id) = cur {
            chain.push(id);
            cur = self.node(id).and_then(|n| n.parent);
        }
        chain
    }

    /// Nodes passed to `scroll_into_view`, oldest first.
    pub fn scroll_history(&self) -> &[NodeId] {
        &self.scroll_history
    }

    /// Messages passed to `alert`, oldest first.
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Number of live nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    fn insert(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(data));
        id
    }

    fn detach(&mut self, node: NodeId) {
        let parent = self.node(node).and_then(|n| n.parent);
        if let Some(p) = parent {
            if let Some(pn) = self.node_mut(p) {
                pn.children.retain(|c| *c != node);
            }
        }
        if let Some(n) = self.node_mut(node) {
            n.parent = None;
        }
    }

    fn drop_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(data) = self.nodes.get_mut(id.0 as usize).and_then(Option::take) {
                stack.extend(data.children);
            }
        }
    }

    fn parse_selector(selector: &str) -> Option<Selector> {
        match Selector::parse(selector) {
            Ok(s) => Some(s),
            Err(e) => {
                log::warn!("{e}");
                None
            }
        }
    }
}

impl Surface for Document {
    fn root(&self) -> NodeId {
        self.root
    }

    fn contains(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    fn query_all(&self, scope: Option<NodeId>, selector: &str) -> Vec<NodeId> {
        let Some(sel) = Self::parse_selector(selector) else {
            return Vec::new();
        };

        let mut stack = match scope {
            Some(s) => match self.node(s) {
                Some(n) => n.children.iter().rev().copied().collect(),
                None => return Vec::new(),
            },
            None => vec![self.root],
        };

        let mut out = Vec::new();
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            if sel.matches(node) {
                out.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        match (self.node(node), Self::parse_selector(selector)) {
            (Some(n), Some(sel)) => sel.matches(n),
            _ => false,
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.tag.as_str())
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.insert(NodeData::new(tag))
    }

    fn clone_node(&mut self, node: NodeId) -> Option<NodeId> {
        let mut source = self.node(node)?.clone();
        let children = std::mem::take(&mut source.children);
        source.parent = None;
        let copy = self.insert(source);
        for child in children {
            if let Some(child_copy) = self.clone_node(child) {
                self.append_child(copy, child_copy);
            }
        }
        Some(copy)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) {
            return;
        }
        if self.is_inclusive_descendant(parent, child) {
            log::warn!("refusing to append {:?} inside its own subtree", child);
            return;
        }
        self.detach(child);
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
    }

    fn remove(&mut self, node: NodeId) {
        if node == self.root {
            return;
        }
        self.detach(node);
        self.drop_subtree(node);
    }

    fn clear_children(&mut self, node: NodeId) {
        for child in self.children(node) {
            self.remove(child);
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node).and_then(|n| n.attribute(name))
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(n) = self.node_mut(node) else { return };
        match n.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => n.attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(n) = self.node_mut(node) {
            n.attrs.retain(|(k, _)| k != name);
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) || !self.contains(node) {
            return;
        }
        let joined = match self.attribute(node, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attribute(node, "class", &joined);
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        let Some(existing) = self.attribute(node, "class") else { return };
        let kept: Vec<&str> = existing.split_whitespace().filter(|c| *c != class).collect();
        let joined = kept.join(" ");
        self.set_attribute(node, "class", &joined);
    }

    fn style(&self, node: NodeId, prop: &str) -> Option<&str> {
        self.node(node)
            .and_then(|n| n.styles.iter().find(|(k, _)| k == prop))
            .map(|(_, v)| v.as_str())
    }

    fn set_style(&mut self, node: NodeId, prop: &str, value: Option<&str>) {
        let Some(n) = self.node_mut(node) else { return };
        match value {
            Some(v) => match n.styles.iter_mut().find(|(k, _)| k == prop) {
                Some((_, slot)) => *slot = v.to_string(),
                None => n.styles.push((prop.to_string(), v.to_string())),
            },
            None => n.styles.retain(|(k, _)| k != prop),
        }
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.text.as_str())
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(n) = self.node_mut(node) {
            n.text = text.to_string();
        }
    }

    fn value(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.value.as_str())
    }

    fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(n) = self.node_mut(node) {
            n.value = value.to_string();
        }
    }

    fn checked(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.checked)
    }

    fn set_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(n) = self.node_mut(node) {
            n.checked = checked;
        }
    }

    fn bounds(&self, node: NodeId) -> Rect {
        self.node(node).map(|n| n.bounds).unwrap_or_default()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn scroll_into_view(&mut self, node: NodeId) {
        if self.contains(node) {
            self.scroll_history.push(node);
        }
    }

    fn alert(&mut self, message: &str) {
        log::info!("alert: {message}");
        self.alerts.push(message.to_string());
    }
}
