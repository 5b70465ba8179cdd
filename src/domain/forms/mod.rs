//! Form submissions and their validators.
//!
//! A submission arrives as an untyped [`FormData`] mapping. Each validator turns it into a
//! typed, normalized record or a [`FieldErrors`] set listing every problem found, so the
//! caller can re-display all of them at once. Validators never touch the database.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use utoipa::ToSchema;

pub mod credentials;
pub mod customer;
pub mod invoice;

pub use credentials::{parse_credentials, Credentials};
pub use customer::{parse_customer, CustomerInput};
pub use invoice::{parse_invoice, InvoiceInput, InvoiceStatus};

/// Result of running a validator over a submission.
pub type Validated<T> = Result<T, FieldErrors>;

/// Raw form submission (field name -> submitted string).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FormData(HashMap<String, String>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly useful in tests.
    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.0.insert(field.to_string(), value.to_string());
        self
    }

    /// Returns the submitted value, `None` if the field was not submitted at all.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Returns the trimmed value, treating blank submissions as absent.
    pub fn non_blank(&self, field: &str) -> Option<&str> {
        self.get(field).map(str::trim).filter(|v| !v.is_empty())
    }
}

/// Field-scoped validation messages, keyed by the submitted field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field` (empty if the field is valid).
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Finishes a validation pass: `value` is only produced when no field failed.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Validated<T> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

/// What a rejected form submission hands back to the caller for re-display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct FormState {
    /// Per-field messages (omitted when the failure is not field-specific).
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    #[schema(value_type = Object)]
    pub errors: FieldErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormState {
    pub fn invalid(errors: FieldErrors, message: &str) -> Self {
        Self {
            errors,
            message: Some(message.to_string()),
        }
    }

    pub fn message(message: &str) -> Self {
        Self {
            errors: FieldErrors::default(),
            message: Some(message.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_read_as_absent() {
        let form = FormData::new().with("email", "   ").with("name", " Ada ");
        assert_eq!(form.non_blank("email"), None);
        assert_eq!(form.non_blank("name"), Some("Ada"));
        assert_eq!(form.non_blank("missing"), None);
    }

    #[test]
    fn form_state_omits_empty_errors() {
        let state = FormState::message("Database Error: Failed to Create Invoice.");
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "message": "Database Error: Failed to Create Invoice." })
        );
    }

    #[test]
    fn field_errors_serialize_as_lists() {
        let mut errors = FieldErrors::default();
        errors.push("amount", "first");
        errors.push("amount", "second");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "amount": ["first", "second"] }));
    }
}
