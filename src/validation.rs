//! Field-keyed validation errors reported back to API clients.

use std::{collections::BTreeMap, fmt::Display};

use serde::Serialize;

/// The message for a required field that is absent from the request body.
pub const REQUIRED: &str = "This field is required.";
/// The message for a field that was explicitly set to `null`.
pub const NOT_NULL: &str = "This field may not be null.";
/// The message for a text field that was given a non-string JSON value.
pub const NOT_A_STRING: &str = "Not a valid string.";

/// Validation messages grouped by the name of the offending field.
///
/// Serializes as a JSON object mapping each field name to a list of messages,
/// e.g. `{"amount": ["A valid number is required."]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Record `message` against `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Create an error set holding a single message.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    /// Whether no messages have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The messages recorded against `field`, empty if there are none.
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
            .collect();

        write!(f, "{}", fields.join("; "))
    }
}
