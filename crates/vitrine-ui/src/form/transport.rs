use std::fmt;

/// Submitted name/value pairs in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// First value under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// The endpoint answered with a non-success status.
    Status(u16),
    /// The request never completed.
    Transport(String),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Status(code) => write!(f, "server answered {code}"),
            SubmitError::Transport(msg) => write!(f, "transport failure: {msg}"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// Delivers a validated form. Completes before returning.
pub trait FormTransport {
    fn submit(&mut self, url: &str, data: &FormData) -> Result<(), SubmitError>;
}

impl<F> FormTransport for F
where
    F: FnMut(&str, &FormData) -> Result<(), SubmitError>,
{
    fn submit(&mut self, url: &str, data: &FormData) -> Result<(), SubmitError> {
        self(url, data)
    }
}
