//! Lexer, parser, and AST for the **Vitrine page markup** (`.vml`).
//!
//! Markup describes a document tree for the headless host: element tags,
//! optional inline text, and `key: value` properties.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `Tree`, `Node`, `Prop`, `Value` |
//! | [`error`] | `ParseError` |
//! | [`lexer`] | `Lexer`, `Token` |
//! | [`parser`] | `parse_str` entry point |
//!
//! ```rust
//! use vitrine_markup::parse_str;
//!
//! let src = r#"
//!     body {
//!         width: 1280  height: 720
//!         div { id: "marquee-track"  class: "client-marquee-track" }
//!         button "Send" { type: submit }
//!     }
//! "#;
//!
//! let tree = parse_str(src).unwrap();
//! assert_eq!(tree.root.tag, "body");
//! assert_eq!(tree.root.children[1].text.as_deref(), Some("Send"));
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{Node, Prop, Tree, Value};
pub use error::ParseError;
pub use parser::parse_str;

#[cfg(test)]
mod parse_tests {
    use super::*;

    fn ok(src: &str) -> Tree { parse_str(src).unwrap() }
    fn err(src: &str) -> ParseError { parse_str(src).unwrap_err() }

    #[test] fn empty_element() { ok("div { }"); }
    #[test] fn bare_element() { assert!(ok("div").root.children.is_empty()); }
    #[test] fn props_and_children_mix() {
        let t = ok(r#"form { id: "footerForm"  input { name: email  type: email }  data-validate: "" }"#);
        assert_eq!(t.root.props.len(), 2);
        assert_eq!(t.root.children[0].prop("name"), Some(&Value::Ident("email".into())));
    }
    #[test] fn comments() {
        ok("// top\n/* head */ div {\n  // inside\n  x: 0 /* tail */\n}");
    }
    #[test] fn numbers() {
        let t = ok("div { x: -10  width: 0.75 }");
        assert_eq!(t.root.prop("x").and_then(Value::as_number), Some(-10.0));
        assert_eq!(t.root.prop("width").and_then(Value::as_number), Some(0.75));
    }
    #[test] fn inline_text_and_escapes() {
        let t = ok(r#"p "say \"hi\"""#);
        assert_eq!(t.root.text.as_deref(), Some("say \"hi\""));
    }
    #[test] fn node_lines() {
        let t = ok("body {\n  div\n  span\n}");
        assert_eq!(t.root.children[1].line, 3);
    }
    #[test] fn err_unclosed_string() { err(r#"p "oops { }"#); }
    #[test] fn err_double_colon() { err("div { x: : 8 }"); }
    #[test] fn err_unclosed_block() {
        let e = err("body {\n  div {\n");
        assert_eq!(e.message, "unclosed '{' block");
        assert_eq!(e.line, 3);
    }
    #[test] fn err_two_roots() { err("div { } div { }"); }
    #[test] fn err_stray_char() {
        let e = err("div { x: 1 ; }");
        assert_eq!((e.line, e.col), (1, 12));
    }
}
