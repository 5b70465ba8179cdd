//! Login handling.
//!
//! Credential checking is delegated to an [`AuthProvider`]. Classified sign-in failures become
//! fixed user-facing messages; anything unclassified is returned as an [`AuthError`] for the
//! caller to surface as a server error.

use crate::domain::forms::FormData;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info};
use utoipa::ToSchema;

/// Provider id used by the login form.
pub const CREDENTIALS_PROVIDER: &str = "credentials";
pub const DEFAULT_REDIRECT: &str = "/dashboard";

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong.";

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

/// Why a provider refused to sign a user in.
#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    #[error("credentials rejected")]
    CredentialsSignin,
    #[error("access denied")]
    AccessDenied,
    #[error("provider misconfigured: {0}")]
    Configuration(String),
    /// Not a sign-in failure at all: infrastructure or programming errors.
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, provider_id: &str, credentials: &FormData) -> Result<Session, SignInError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    SignedIn { session: Session, redirect_to: String },
    /// Expected failure, carrying the message shown on the login form.
    Rejected(&'static str),
}

/// An unclassified sign-in failure.
#[derive(Debug, thiserror::Error)]
#[error("sign-in failed unexpectedly: {0}")]
pub struct AuthError(#[source] pub anyhow::Error);

/// Only local absolute paths are honoured as post-login destinations.
///
/// Browsers read a leading `//` or `/\` as a scheme-relative URL, so neither is local.
fn is_local_path(path: &str) -> bool {
    let mut chars = path.chars();
    chars.next() == Some('/')
        && !matches!(chars.next(), Some('/' | '\\'))
        && !path.chars().any(char::is_control)
}

fn redirect_target(form: &FormData) -> String {
    match form.non_blank("redirectTo") {
        Some(path) if is_local_path(path) => path.to_string(),
        _ => DEFAULT_REDIRECT.to_string(),
    }
}

/// Runs one sign-in attempt. No retries, no lockout.
pub async fn authenticate(provider: &dyn AuthProvider, form: &FormData) -> Result<AuthOutcome, AuthError> {
    match provider.sign_in(CREDENTIALS_PROVIDER, form).await {
        Ok(session) => {
            info!(user_id = %session.user_id, "signed in");
            Ok(AuthOutcome::SignedIn {
                session,
                redirect_to: redirect_target(form),
            })
        }
        Err(SignInError::CredentialsSignin) => Ok(AuthOutcome::Rejected(INVALID_CREDENTIALS)),
        Err(SignInError::Unexpected(e)) => {
            error!(error = %e, "sign-in failed unexpectedly");
            Err(AuthError(e))
        }
        Err(other) => {
            info!(reason = %other, "sign-in refused");
            Ok(AuthOutcome::Rejected(SOMETHING_WENT_WRONG))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Behaviour {
        Accept,
        BadCredentials,
        Denied,
        Misconfigured,
        Crash,
    }

    struct StubProvider(Behaviour);

    #[async_trait]
    impl AuthProvider for StubProvider {
        async fn sign_in(&self, provider_id: &str, _credentials: &FormData) -> Result<Session, SignInError> {
            assert_eq!(provider_id, CREDENTIALS_PROVIDER);
            match self.0 {
                Behaviour::Accept => Ok(Session {
                    user_id: "u1".into(),
                    name: "User".into(),
                    email: "user@nextmail.com".into(),
                }),
                Behaviour::BadCredentials => Err(SignInError::CredentialsSignin),
                Behaviour::Denied => Err(SignInError::AccessDenied),
                Behaviour::Misconfigured => Err(SignInError::Configuration("no secret".into())),
                Behaviour::Crash => Err(anyhow::anyhow!("connection reset").into()),
            }
        }
    }

    #[tokio::test]
    async fn wrong_password_maps_to_invalid_credentials() {
        let outcome = authenticate(&StubProvider(Behaviour::BadCredentials), &FormData::new())
            .await
            .unwrap();
        assert_eq!(outcome, AuthOutcome::Rejected("Invalid credentials."));
    }

    #[tokio::test]
    async fn other_classified_errors_are_generic() {
        for behaviour in [Behaviour::Denied, Behaviour::Misconfigured] {
            let outcome = authenticate(&StubProvider(behaviour), &FormData::new())
                .await
                .unwrap();
            assert_eq!(outcome, AuthOutcome::Rejected("Something went wrong."));
        }
    }

    #[tokio::test]
    async fn unclassified_errors_propagate() {
        let err = authenticate(&StubProvider(Behaviour::Crash), &FormData::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn success_redirects_to_a_local_path() {
        let provider = StubProvider(Behaviour::Accept);

        let form = FormData::new().with("redirectTo", "/dashboard/invoices");
        let Ok(AuthOutcome::SignedIn { redirect_to, .. }) = authenticate(&provider, &form).await else {
            panic!("expected sign-in");
        };
        assert_eq!(redirect_to, "/dashboard/invoices");

        for hostile in [
            "https://evil.example",
            "//evil.example",
            "/\\evil.example",
            "/\\/evil.example",
            "/dash\tboard",
            "/x\r\nSet-Cookie: a=b",
            "",
        ] {
            let form = FormData::new().with("redirectTo", hostile);
            let Ok(AuthOutcome::SignedIn { redirect_to, .. }) = authenticate(&provider, &form).await else {
                panic!("expected sign-in");
            };
            assert_eq!(redirect_to, DEFAULT_REDIRECT);
        }
    }
}
