//! Syntax tree produced by the parser.

/// A parsed `.vml` document: exactly one root element.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub root: Node,
}

/// One element: `tag ["text"] [{ props and children }]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: String,
    /// Inline text content, e.g. `button "Send"`.
    pub text: Option<String>,
    pub props: Vec<Prop>,
    pub children: Vec<Node>,
    /// 1-based line of the tag name.
    pub line: usize,
}

impl Node {
    /// First property named `key`.
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.iter().find(|p| p.key == key).map(|p| &p.value)
    }
}

/// `key: value`
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Number(f64),
    Ident(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// `true` / `false` identifiers.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Ident(s) if s == "true" => Some(true),
            Value::Ident(s) if s == "false" => Some(false),
            _ => None,
        }
    }

    /// Attribute text for any value; numbers print without a trailing `.0`.
    pub fn to_attr_string(&self) -> String {
        match self {
            Value::Str(s) | Value::Ident(s) => s.clone(),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Value::Number(n) => n.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_strings() {
        assert_eq!(Value::Number(3.0).to_attr_string(), "3");
        assert_eq!(Value::Number(-2.5).to_attr_string(), "-2.5");
        assert_eq!(Value::Ident("on".into()).to_attr_string(), "on");
        assert_eq!(Value::Ident("true".into()).as_bool(), Some(true));
        assert_eq!(Value::Str("true".into()).as_bool(), None);
    }
}
