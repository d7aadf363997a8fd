use std::fmt;

/// Invalid construction input or mutating call. The object is left unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Selector / id / node handle did not resolve to an element.
    TargetNotFound { target: String },
    /// A required descendant is missing from the component's root.
    MissingElement { what: &'static str },
    InvalidSpeed(f64),
    InvalidGap(f64),
    InvalidDirection(String),
    /// A field pattern failed to compile.
    InvalidPattern { field: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::TargetNotFound { target } => write!(f, "element not found: {target}"),
            ConfigError::MissingElement { what } => write!(f, "required element missing: {what}"),
            ConfigError::InvalidSpeed(v) => write!(f, "speed must be a positive number of px/s, got {v}"),
            ConfigError::InvalidGap(v) => write!(f, "gap must be a non-negative number of px, got {v}"),
            ConfigError::InvalidDirection(s) => write!(f, "direction must be `left` or `right`, got {s:?}"),
            ConfigError::InvalidPattern { field, message } => {
                write!(f, "invalid pattern for field `{field}`: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Content measured to a zero or non-finite width; the caller retries later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryError {
    pub items_width: f64,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "content has no measurable width (measured {})", self.items_width)
    }
}

impl std::error::Error for GeometryError {}
