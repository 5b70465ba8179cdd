//! Customer form rules.

use super::{FieldErrors, FormData, Validated};
use std::sync::OnceLock;

pub const NAME_REQUIRED: &str = "Please enter a customer name.";
pub const NAME_CHARSET: &str =
    "Name may only contain letters, spaces, apostrophes, hyphens and periods.";
pub const URL_INVALID: &str = "Please enter a valid URL.";

/// Letters first, then letters, combining marks, spaces, `.`, `'` or `-`.
const NAME_PATTERN: &str = r"^\p{L}[\p{L}\p{M} .'\-]*$";

/// http(s) scheme, a dotted host with a 2+ letter suffix somewhere after it, no whitespace.
const URL_PATTERN: &str = r"(?i)^(https?)://(?=.*\.[a-z]{2,})[^\s$.?#].[^\s]*$";

fn name_pattern() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(NAME_PATTERN).expect("customer name pattern compiles"))
}

fn url_pattern() -> &'static fancy_regex::Regex {
    static RE: OnceLock<fancy_regex::Regex> = OnceLock::new();
    RE.get_or_init(|| fancy_regex::Regex::new(URL_PATTERN).expect("customer url pattern compiles"))
}

/// Validated customer fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInput {
    pub name: String,
    /// Accepted as-is, no format check.
    pub email: Option<String>,
    pub url: Option<String>,
}

pub fn is_valid_url(candidate: &str) -> bool {
    // A backtrack-limit error counts as a mismatch.
    url_pattern().is_match(candidate).unwrap_or(false)
}

pub fn parse_customer(form: &FormData) -> Validated<CustomerInput> {
    let mut errors = FieldErrors::default();

    let name = form.non_blank("name").unwrap_or_default();
    if name.is_empty() {
        errors.push("name", NAME_REQUIRED);
    } else if !name_pattern().is_match(name) {
        errors.push("name", NAME_CHARSET);
    }

    let email = form.non_blank("email");

    let url = form.non_blank("url");
    if let Some(url) = url {
        if !is_valid_url(url) {
            errors.push("url", URL_INVALID);
        }
    }

    errors.finish(|| CustomerInput {
        name: name.to_string(),
        email: email.map(str::to_string),
        url: url.map(str::to_string),
    })
}
