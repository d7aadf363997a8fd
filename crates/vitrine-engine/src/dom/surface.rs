use crate::coords::{Rect, Viewport};

use super::NodeId;

/// Object-safe view of the host's rendering surface.
///
/// The method set follows the handful of DOM operations the components need:
/// selector queries, tree mutation, attributes/classes/styles, form state and
/// geometry. Mutations addressed to nodes that no longer exist are ignored.
///
/// Selector strings use the grammar of [`super::Selector`]; an invalid
/// selector matches nothing and is reported through `log::warn!`.
pub trait Surface {
    fn root(&self) -> NodeId;

    /// Whether `node` still exists (attached or detached).
    fn contains(&self, node: NodeId) -> bool;

    /// First match in document order. With a scope, only the scope's
    /// descendants are searched (the scope itself is excluded).
    fn query(&self, scope: Option<NodeId>, selector: &str) -> Option<NodeId> {
        self.query_all(scope, selector).into_iter().next()
    }

    /// All matches in document order, scoped as for [`Surface::query`].
    fn query_all(&self, scope: Option<NodeId>, selector: &str) -> Vec<NodeId>;

    /// Whether `node` itself matches `selector`.
    fn matches(&self, node: NodeId, selector: &str) -> bool;

    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn children(&self, node: NodeId) -> Vec<NodeId>;
    fn tag(&self, node: NodeId) -> Option<&str>;

    /// Creates a detached element.
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Deep-copies `node` (attributes, styles, text, form state, bounds and
    /// descendants). The copy is detached.
    fn clone_node(&mut self, node: NodeId) -> Option<NodeId>;

    /// Appends `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Detaches and drops `node` and its subtree.
    fn remove(&mut self, node: NodeId);

    fn clear_children(&mut self, node: NodeId);

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);
    fn remove_attribute(&mut self, node: NodeId, name: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|c| c.split_whitespace().any(|have| have == class))
    }
    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);

    /// Inline style property.
    fn style(&self, node: NodeId, prop: &str) -> Option<&str>;
    /// Sets (`Some`) or clears (`None`) an inline style property.
    fn set_style(&mut self, node: NodeId, prop: &str, value: Option<&str>);

    fn text(&self, node: NodeId) -> Option<&str>;
    fn set_text(&mut self, node: NodeId, text: &str);

    /// Current value of a form control.
    fn value(&self, node: NodeId) -> Option<&str>;
    fn set_value(&mut self, node: NodeId, value: &str);
    fn checked(&self, node: NodeId) -> bool;
    fn set_checked(&mut self, node: NodeId, checked: bool);

    /// Rendered layout box of `node`; empty for unknown or unlaid-out nodes.
    fn bounds(&self, node: NodeId) -> Rect;
    fn viewport(&self) -> Viewport;
    fn is_hidden(&self) -> bool;

    fn scroll_into_view(&mut self, node: NodeId);

    /// Blocking user-facing notice.
    fn alert(&mut self, message: &str);

    /// Whether `node` is `ancestor` or lies inside it.
    fn is_inclusive_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    /// Nearest inclusive ancestor matching `selector`.
    fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId> {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if self.matches(n, selector) {
                return Some(n);
            }
            cur = self.parent(n);
        }
        None
    }
}
