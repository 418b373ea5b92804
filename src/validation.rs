//! Payload validation shared by every request and response type.
//!
//! Each payload implements [`Validate`]; [`parse`] runs the full pipeline on
//! untyped JSON: presence/type (deserialization), then format, then length,
//! with serde defaults filling optional fields. Rule helpers stop at the first
//! failure per field so a missing value is not also reported as too short.

use regex::Regex;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::fmt;

pub const EMAIL_MESSAGE: &str = "Enter a valid email address";
pub const REQUIRED_MESSAGE: &str = "This field is required";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Per-field validation messages, in the order they were found.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First message recorded for `field`, if any.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    /// # Errors
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Maps a deserialization failure onto the offending field when serde names it.
    #[must_use]
    pub fn from_decode(err: &serde_json::Error) -> Self {
        let mut errors = Self::new();
        let message = err.to_string();

        match message
            .strip_prefix("missing field `")
            .and_then(|rest| rest.split('`').next())
        {
            Some(field) => errors.add(field, REQUIRED_MESSAGE),
            None => errors.add("body", message),
        }

        errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(formatter, "{joined}")
    }
}

impl std::error::Error for ValidationErrors {}

/// Struct-level constraint check, run after the value has been built.
pub trait Validate {
    /// # Errors
    /// Returns every field that violates a format or length constraint.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Decodes untyped JSON into `T` and validates it.
/// # Errors
/// Returns field messages for missing/mistyped fields or failed constraints.
pub fn parse<T>(raw: Value) -> Result<T, ValidationErrors>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_json::from_value(raw).map_err(|err| ValidationErrors::from_decode(&err))?;
    value.validate()?;
    Ok(value)
}

/// Basic email shape check.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

/// Records `message` when `value` is empty. Returns whether the value is present.
pub fn require(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) -> bool {
    if value.is_empty() {
        errors.add(field, message);
        false
    } else {
        true
    }
}

/// Records the email message when `value` is not an address. Returns whether it passed.
pub fn email(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    if valid_email(value) {
        true
    } else {
        errors.add(field, EMAIL_MESSAGE);
        false
    }
}

/// Password character-count bounds; `max` is optional.
pub fn password_length(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    min: usize,
    max: Option<usize>,
) -> bool {
    let count = value.chars().count();
    if count < min {
        errors.add(field, format!("Password must be at least {min} characters"));
        return false;
    }
    if let Some(max) = max {
        if count > max {
            errors.add(field, format!("Password must be at most {max} characters"));
            return false;
        }
    }
    true
}
