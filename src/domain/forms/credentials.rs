//! Login form rules.

use super::{FieldErrors, FormData, Validated};
use std::sync::OnceLock;

pub const MIN_PASSWORD_LEN: usize = 6;

fn email_pattern() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
    })
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

// Keeps passwords out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub fn parse_credentials(form: &FormData) -> Validated<Credentials> {
    let mut errors = FieldErrors::default();

    let email = form.non_blank("email").unwrap_or_default();
    if !email_pattern().is_match(email) {
        errors.push("email", "Please enter a valid email address.");
    }

    let password = form.get("password").unwrap_or_default();
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters."),
        );
    }

    errors.finish(|| Credentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_credentials() {
        let form = FormData::new()
            .with("email", " user@nextmail.com ")
            .with("password", "123456");
        let creds = parse_credentials(&form).unwrap();
        assert_eq!(creds.email, "user@nextmail.com");
        assert_eq!(creds.password, "123456");
    }

    #[test]
    fn rejects_short_password_and_bad_email() {
        let form = FormData::new().with("email", "nobody").with("password", "12345");
        let errors = parse_credentials(&form).unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, ["email", "password"]);
    }

    #[test]
    fn debug_output_hides_the_password() {
        let creds = Credentials {
            email: "a@b.co".into(),
            password: "hunter22".into(),
        };
        assert!(!format!("{creds:?}").contains("hunter22"));
    }
}
