//! E-mail + password provider backed by the `users` table.

use crate::app::auth::{AuthProvider, Session, SignInError, CREDENTIALS_PROVIDER};
use crate::crypto::verify_password;
use crate::domain::forms::{parse_credentials, FormData};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::debug;

#[derive(Clone)]
pub struct PgCredentialsProvider {
    pool: PgPool,
}

impl PgCredentialsProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthProvider for PgCredentialsProvider {
    async fn sign_in(&self, provider_id: &str, credentials: &FormData) -> Result<Session, SignInError> {
        if provider_id != CREDENTIALS_PROVIDER {
            return Err(SignInError::Configuration(format!(
                "unknown provider '{provider_id}'"
            )));
        }

        // Malformed credentials are indistinguishable from wrong ones to the caller.
        let creds = parse_credentials(credentials).map_err(|_| SignInError::CredentialsSignin)?;

        let row = sqlx::query("SELECT id, name, email, password FROM users WHERE email = $1")
            .bind(&creds.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SignInError::Unexpected(e.into()))?;

        let Some(row) = row else {
            debug!(email = %creds.email, "no such user");
            return Err(SignInError::CredentialsSignin);
        };

        let stored: String = row
            .try_get("password")
            .map_err(|e| SignInError::Unexpected(e.into()))?;
        if !verify_password(&creds.password, &stored) {
            debug!(email = %creds.email, "password mismatch");
            return Err(SignInError::CredentialsSignin);
        }

        Ok(Session {
            user_id: row.try_get("id").map_err(|e| SignInError::Unexpected(e.into()))?,
            name: row.try_get("name").map_err(|e| SignInError::Unexpected(e.into()))?,
            email: row.try_get("email").map_err(|e| SignInError::Unexpected(e.into()))?,
        })
    }
}
