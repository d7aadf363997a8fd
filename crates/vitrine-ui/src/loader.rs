//! Builds a headless [`Document`] from `.vml` markup.
//!
//! Layout keys (`x`, `y`, `width`, `height`) set the node's box, `value` and
//! `checked` set form state, and every other key becomes an attribute. The
//! root's `width` / `height` are the viewport.

use std::fmt;

use vitrine_engine::coords::{Rect, Viewport};
use vitrine_engine::dom::{Document, NodeId, Surface};
use vitrine_markup::{parse_str, Node, ParseError, Tree, Value};

/// Viewport used when the root element gives no size.
pub const DEFAULT_VIEWPORT: Viewport = Viewport::new(1280.0, 720.0);

#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    Parse(ParseError),
    /// A layout or state key had a value of the wrong kind.
    InvalidProp { line: usize, key: String, message: &'static str },
    InvalidViewport { width: f64, height: f64 },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Parse(e) => e.fmt(f),
            LoadError::InvalidProp { line, key, message } => {
                write!(f, "line {line}: `{key}` {message}")
            }
            LoadError::InvalidViewport { width, height } => {
                write!(f, "root size {width}x{height} is not a usable viewport")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for LoadError {
    fn from(e: ParseError) -> Self {
        LoadError::Parse(e)
    }
}

pub fn load_document(src: &str) -> Result<Document, LoadError> {
    let tree = parse_str(src)?;
    build_document(&tree)
}

pub fn build_document(tree: &Tree) -> Result<Document, LoadError> {
    let root = &tree.root;
    let width = number(root, "width")?.unwrap_or(DEFAULT_VIEWPORT.width);
    let height = number(root, "height")?.unwrap_or(DEFAULT_VIEWPORT.height);
    let viewport = Viewport::new(width, height);
    if !viewport.is_valid() {
        return Err(LoadError::InvalidViewport { width, height });
    }

    let mut doc = Document::new(&root.tag, viewport);
    let root_id = doc.root();
    apply_props(&mut doc, root_id, root, true)?;
    for child in &root.children {
        build_node(&mut doc, root_id, child)?;
    }

    log::debug!(
        "loaded document: {} nodes, viewport {}x{}",
        doc.node_count(),
        viewport.width,
        viewport.height
    );
    Ok(doc)
}

fn build_node(doc: &mut Document, parent: NodeId, node: &Node) -> Result<(), LoadError> {
    let id = doc.append_element(parent, &node.tag);
    apply_props(doc, id, node, false)?;
    for child in &node.children {
        build_node(doc, id, child)?;
    }
    Ok(())
}

fn apply_props(doc: &mut Document, id: NodeId, node: &Node, is_root: bool) -> Result<(), LoadError> {
    if let Some(text) = &node.text {
        doc.set_text(id, text);
    }

    let mut bounds = Rect::default();
    for prop in &node.props {
        let key = prop.key.as_str();
        match key {
            "x" | "y" | "width" | "height" => {
                let v = prop.value.as_number().ok_or_else(|| invalid(node, key, "must be a number"))?;
                match key {
                    "x" => bounds.origin.x = v,
                    "y" => bounds.origin.y = v,
                    "width" => bounds.size.x = v,
                    _ => bounds.size.y = v,
                }
            }
            "value" => doc.set_value(id, &prop.value.to_attr_string()),
            "checked" => {
                let on = prop.value.as_bool().ok_or_else(|| invalid(node, key, "must be true or false"))?;
                doc.set_checked(id, on);
            }
            _ => doc.set_attribute(id, key, &prop.value.to_attr_string()),
        }
    }
    // The root box always tracks the viewport.
    if !is_root {
        doc.set_bounds(id, bounds);
    }
    Ok(())
}

fn number(node: &Node, key: &'static str) -> Result<Option<f64>, LoadError> {
    match node.prop(key) {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(Some(*n)),
        Some(_) => Err(invalid(node, key, "must be a number")),
    }
}

fn invalid(node: &Node, key: &str, message: &'static str) -> LoadError {
    LoadError::InvalidProp { line: node.line, key: key.to_string(), message }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        body {
            width: 800  height: 400
            lang: ru
            div {
                id: "marquee-track"
                x: 0  y: 10  width: 800  height: 50
                div "Logo" { class: "logo partner"  width: 120  height: 50 }
            }
            form {
                id: footerForm
                input { name: email  type: email  value: "a@b.co" }
                input { name: agreement  type: checkbox  checked: true }
            }
        }
    "#;

    #[test]
    fn builds_tree_bounds_and_state() {
        let doc = load_document(PAGE).unwrap();
        assert_eq!(doc.viewport(), Viewport::new(800.0, 400.0));
        assert_eq!(doc.bounds(doc.root()), Rect::new(0.0, 0.0, 800.0, 400.0));
        assert_eq!(doc.attribute(doc.root(), "lang"), Some("ru"));

        let track = doc.query(None, "#marquee-track").unwrap();
        assert_eq!(doc.bounds(track), Rect::new(0.0, 10.0, 800.0, 50.0));

        let logo = doc.query(None, ".partner").unwrap();
        assert!(doc.has_class(logo, "logo"));
        assert_eq!(doc.text(logo), Some("Logo"));
        assert_eq!(doc.bounds(logo).width(), 120.0);
        assert_eq!(doc.parent(logo), Some(track));

        let email = doc.query(None, "input[name=email]").unwrap();
        assert_eq!(doc.value(email), Some("a@b.co"));
        assert_eq!(doc.attribute(email, "value"), None);
        let agreement = doc.query(None, "input[type=checkbox]").unwrap();
        assert!(doc.checked(agreement));

        assert!(doc.query(None, "form#footerForm").is_some());
    }

    #[test]
    fn root_size_defaults() {
        let doc = load_document("body { div }").unwrap();
        assert_eq!(doc.viewport(), DEFAULT_VIEWPORT);
    }

    #[test]
    fn errors_carry_lines() {
        let err = load_document("body {\n  div { width: wide }\n}").unwrap_err();
        assert_eq!(
            err,
            LoadError::InvalidProp { line: 2, key: "width".into(), message: "must be a number" }
        );

        let err = load_document("body {\n  input { checked: 1 }\n}").unwrap_err();
        assert!(matches!(err, LoadError::InvalidProp { line: 2, .. }));

        assert!(matches!(
            load_document("body { width: 0 }").unwrap_err(),
            LoadError::InvalidViewport { .. }
        ));

        let err = load_document("body {").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
        assert!(err.to_string().starts_with("vml parse error at 1:"));
    }
}
