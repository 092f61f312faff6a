//! Form definitions backing the admin panel routes.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::domain::types::TypeConstraintError;

pub mod auth;
pub mod lead;
pub mod user;

/// Key under which form-level (not field-specific) errors are stored.
pub const FORM_ERROR_KEY: &str = "form";

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid field value: {0}")]
    Constraint(#[from] TypeConstraintError),

    #[error("invalid fields: {0:?}")]
    Fields(FieldErrors),
}

/// Whether a resource form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    #[default]
    Create,
    Edit,
}

/// Per-field error messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first message of every invalid field.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                errs.first().map(|err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    (field.to_string(), message)
                })
            })
            .collect();
        Self(fields)
    }

    /// Error carrying a single form-level message.
    pub fn form(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(FORM_ERROR_KEY, message);
        errors
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Restricts the errors to one field, used by on-change validation.
    pub fn only(mut self, field: &str) -> Self {
        self.0.retain(|name, _| name == field);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Server-message keyword and the form field it designates. Checked in
/// order; the first keyword found in the lowercased message wins.
pub type FieldHints = &'static [(&'static str, &'static str)];

/// Finds the form field a server error message refers to.
pub fn field_from_message(message: &str, hints: FieldHints) -> Option<&'static str> {
    let lower = message.to_lowercase();
    hints
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, field)| *field)
}

/// Marks the duplicated field named by a 409 message, or every field in
/// `duplicate_fields` when the message names none.
pub fn conflict_errors(
    message: &str,
    hints: FieldHints,
    duplicate_fields: &[&'static str],
) -> FieldErrors {
    let message = if message.trim().is_empty() {
        "Already in use"
    } else {
        message
    };

    let mut errors = FieldErrors::new();
    match field_from_message(message, hints) {
        Some(field) => errors.insert(field, message),
        None => {
            for field in duplicate_fields {
                errors.insert(*field, message);
            }
        }
    }
    errors
}

pub(crate) fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Required check shared by plain text fields.
pub(crate) fn require(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(field_error("required", message))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HINTS: FieldHints = &[("phone", "phone_number"), ("email", "email")];

    #[test]
    fn message_mentioning_a_field_is_mapped() {
        assert_eq!(
            field_from_message("Email is already registered", HINTS),
            Some("email")
        );
        assert_eq!(field_from_message("Internal error", HINTS), None);
    }

    #[test]
    fn conflict_without_field_marks_all_duplicates() {
        let errors = conflict_errors("User already exists", HINTS, &["email", "phone_number"]);
        assert_eq!(errors.get("email"), Some("User already exists"));
        assert_eq!(errors.get("phone_number"), Some("User already exists"));
    }

    #[test]
    fn conflict_naming_phone_marks_only_phone() {
        let errors = conflict_errors("Phone number taken", HINTS, &["email", "phone_number"]);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("phone_number"));
    }

    #[test]
    fn only_keeps_requested_field() {
        let mut errors = FieldErrors::new();
        errors.insert("email", "Email is required");
        errors.insert("industry", "Industry is required");
        let errors = errors.only("industry");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("industry"), Some("Industry is required"));
    }
}
