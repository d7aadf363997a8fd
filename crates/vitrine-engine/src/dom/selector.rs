use std::fmt;

/// Error produced when a selector string cannot be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid selector {:?}: {}", self.selector, self.message)
    }
}

impl std::error::Error for SelectorError {}

/// Element view the matcher needs; implemented by document nodes.
pub(crate) trait ElementLike {
    fn tag_name(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&str>;
}

/// A comma-separated list of compound selectors.
///
/// Supported per compound: an optional tag name (or `*`), then any number of
/// `#id`, `.class`, `[attr]` and `[attr=value]` / `[attr="value"]` parts.
/// Combinators (descendant, child, sibling) are not supported; scope queries
/// to a subtree instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Selector {
    pub fn parse(src: &str) -> Result<Selector, SelectorError> {
        let err = |message: &str| SelectorError {
            selector: src.to_string(),
            message: message.to_string(),
        };

        let mut alternatives = Vec::new();
        for part in src.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(err("empty selector"));
            }
            alternatives.push(parse_compound(part).map_err(|m| err(&m))?);
        }
        Ok(Selector { alternatives })
    }

    pub(crate) fn matches(&self, el: &dyn ElementLike) -> bool {
        self.alternatives.iter().any(|c| c.matches(el))
    }
}

impl Compound {
    fn matches(&self, el: &dyn ElementLike) -> bool {
        if let Some(tag) = &self.tag {
            if !tag.eq_ignore_ascii_case(el.tag_name()) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.attribute("id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let class_attr = el.attribute("class").unwrap_or("");
            if !self
                .classes
                .iter()
                .all(|c| class_attr.split_whitespace().any(|have| have == c))
            {
                return false;
            }
        }
        self.attrs.iter().all(|(name, want)| match (el.attribute(name), want) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(have), Some(want)) => have == want,
        })
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn take_name(chars: &[char], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < chars.len() && is_name_char(chars[*pos]) {
        *pos += 1;
    }
    chars[start..*pos].iter().collect()
}

fn parse_compound(src: &str) -> Result<Compound, String> {
    let chars: Vec<char> = src.chars().collect();
    let mut pos = 0;
    let mut compound = Compound::default();

    if chars.first() == Some(&'*') {
        pos += 1;
    } else {
        let tag = take_name(&chars, &mut pos);
        if !tag.is_empty() {
            compound.tag = Some(tag);
        }
    }

    while pos < chars.len() {
        match chars[pos] {
            '#' => {
                pos += 1;
                let id = take_name(&chars, &mut pos);
                if id.is_empty() {
                    return Err("expected an id after '#'".into());
                }
                compound.id = Some(id);
            }
            '.' => {
                pos += 1;
                let class = take_name(&chars, &mut pos);
                if class.is_empty() {
                    return Err("expected a class name after '.'".into());
                }
                compound.classes.push(class);
            }
            '[' => {
                pos += 1;
                let name = take_name(&chars, &mut pos);
                if name.is_empty() {
                    return Err("expected an attribute name after '['".into());
                }
                let value = if chars.get(pos) == Some(&'=') {
                    pos += 1;
                    Some(take_attr_value(&chars, &mut pos)?)
                } else {
                    None
                };
                if chars.get(pos) != Some(&']') {
                    return Err("unclosed '['".into());
                }
                pos += 1;
                compound.attrs.push((name, value));
            }
            c if c.is_whitespace() => {
                return Err("combinators are not supported".into());
            }
            c => return Err(format!("unexpected character {:?}", c)),
        }
    }

    Ok(compound)
}

fn take_attr_value(chars: &[char], pos: &mut usize) -> Result<String, String> {
    match chars.get(*pos) {
        Some(&quote) if quote == '"' || quote == '\'' => {
            *pos += 1;
            let start = *pos;
            while *pos < chars.len() && chars[*pos] != quote {
                *pos += 1;
            }
            if *pos >= chars.len() {
                return Err("unterminated attribute value".into());
            }
            let value = chars[start..*pos].iter().collect();
            *pos += 1;
            Ok(value)
        }
        _ => Ok(take_name(chars, pos)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct El {
        tag: &'static str,
        attrs: Vec<(&'static str, &'static str)>,
    }

    impl ElementLike for El {
        fn tag_name(&self) -> &str {
            self.tag
        }
        fn attribute(&self, name: &str) -> Option<&str> {
            self.attrs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
        }
    }

    fn el(tag: &'static str, attrs: &[(&'static str, &'static str)]) -> El {
        El { tag, attrs: attrs.to_vec() }
    }

    fn sel(s: &str) -> Selector { Selector::parse(s).unwrap() }

    #[test]
    fn id_class_and_tag() {
        let track = el("div", &[("id", "marquee-track"), ("class", "track client-marquee-track")]);
        assert!(sel("#marquee-track").matches(&track));
        assert!(sel(".client-marquee-track").matches(&track));
        assert!(sel("div.track.client-marquee-track").matches(&track));
        assert!(!sel("span#marquee-track").matches(&track));
        assert!(!sel(".slider-track").matches(&track));
    }

    #[test]
    fn attribute_presence_and_value() {
        let input = el("input", &[("type", "checkbox"), ("name", "agreement")]);
        assert!(sel("[name]").matches(&input));
        assert!(sel("input[type=\"checkbox\"]").matches(&input));
        assert!(sel("input[type=checkbox]").matches(&input));
        assert!(!sel("input[type='text']").matches(&input));
        assert!(!sel("[data-marquee-clone]").matches(&input));
    }

    #[test]
    fn comma_list_matches_any() {
        let top = el("div", &[("class", "marquee-track-top")]);
        assert!(sel(".marquee-track-top, .client-marquee-track, #marquee-track").matches(&top));
    }

    #[test]
    fn rejects_unsupported_syntax() {
        assert!(Selector::parse("div span").is_err());
        assert!(Selector::parse("#").is_err());
        assert!(Selector::parse("[name").is_err());
        assert!(Selector::parse("a,,b").is_err());
    }
}
