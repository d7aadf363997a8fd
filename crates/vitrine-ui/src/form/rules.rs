use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;

use crate::error::ConfigError;

/// Which check a field failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Violation {
    Required,
    MinLength,
    MaxLength,
    Pattern,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Violation::Required => "required",
            Violation::MinLength => "min-length",
            Violation::MaxLength => "max-length",
            Violation::Pattern => "pattern",
        })
    }
}

/// Current value of a form control as seen by the validator.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Checkbox(bool),
}

/// Constraints on one named field.
#[derive(Debug, Clone, Default)]
pub struct FieldRule {
    pub required: bool,
    /// In characters.
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
}

impl FieldRule {
    pub fn optional() -> Self {
        Self::default()
    }

    pub fn required() -> Self {
        Self { required: true, ..Self::default() }
    }

    pub fn min_length(mut self, chars: usize) -> Self {
        self.min_length = Some(chars);
        self
    }

    pub fn max_length(mut self, chars: usize) -> Self {
        self.max_length = Some(chars);
        self
    }

    /// Anchors are not added; write `^...$` for a full match.
    pub fn pattern(mut self, field: &str, src: &str) -> Result<Self, ConfigError> {
        let re = Regex::new(src).map_err(|e| ConfigError::InvalidPattern {
            field: field.to_string(),
            message: e.to_string(),
        })?;
        self.pattern = Some(re);
        Ok(self)
    }

    /// Checks in order: required, blank optional passes, min, max, pattern.
    pub fn check(&self, value: FieldValue<'_>) -> Result<(), Violation> {
        let text = match value {
            FieldValue::Checkbox(checked) => {
                return if self.required && !checked { Err(Violation::Required) } else { Ok(()) };
            }
            FieldValue::Text(text) => text,
        };

        if text.trim().is_empty() {
            return if self.required { Err(Violation::Required) } else { Ok(()) };
        }

        let len = text.chars().count();
        if self.min_length.is_some_and(|min| len < min) {
            return Err(Violation::MinLength);
        }
        if self.max_length.is_some_and(|max| len > max) {
            return Err(Violation::MaxLength);
        }
        if self.pattern.as_ref().is_some_and(|re| !re.is_match(text)) {
            return Err(Violation::Pattern);
        }
        Ok(())
    }
}

/// Field rules keyed by the control's `name`.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: BTreeMap<String, FieldRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contact-form rules: name, company, email, phone, message, agreement.
    pub fn defaults() -> Result<Self, ConfigError> {
        let mut set = Self::new();
        set.insert(
            "name",
            FieldRule::required()
                .min_length(2)
                .max_length(50)
                .pattern("name", r"^[а-яёА-ЯЁa-zA-Z\s-]+$")?,
        );
        set.insert("company", FieldRule::required().max_length(100));
        set.insert(
            "email",
            FieldRule::required().pattern("email", r"^[^\s@]+@[^\s@]+\.[^\s@]+$")?,
        );
        set.insert(
            "phone",
            FieldRule::required().pattern("phone", r"^\+7\s?\([0-9]{3}\)\s?[0-9]{3}-[0-9]{2}-[0-9]{2}$")?,
        );
        set.insert("message", FieldRule::required().min_length(10).max_length(1000));
        set.insert("agreement", FieldRule::required());
        Ok(set)
    }

    pub fn insert(&mut self, field: impl Into<String>, rule: FieldRule) -> Option<FieldRule> {
        self.rules.insert(field.into(), rule)
    }

    pub fn get(&self, field: &str) -> Option<&FieldRule> {
        self.rules.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.rules.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// `Ok(())` for fields without a rule.
    pub fn check(&self, field: &str, value: FieldValue<'_>) -> Result<(), Violation> {
        match self.rules.get(field) {
            Some(rule) => rule.check(value),
            None => Ok(()),
        }
    }
}
