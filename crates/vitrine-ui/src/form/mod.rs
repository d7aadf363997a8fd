//! Contact-form validation and submission.
//!
//! [`FormValidator`] watches a form's named controls, marks them `error` or
//! `success` as the user types, masks the phone field and, on submit, sends
//! the named values through a [`FormTransport`].

pub mod mask;
mod messages;
mod rules;
mod transport;
mod validator;

#[cfg(test)]
mod tests;

pub use messages::MessageCatalog;
pub use rules::{FieldRule, FieldValue, RuleSet, Violation};
pub use transport::{FormData, FormTransport, SubmitError};
pub use validator::{FormOptions, FormValidator, SubmitOutcome};
