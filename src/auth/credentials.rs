use std::{sync::Arc, time::Duration};

use anyhow::Context;
use secrecy::SecretString;
use uuid::Uuid;

use crate::{
    db::{DatabaseError, Store},
    deadline::bounded,
    error::Error,
    model::User,
    telemetry::spawn_blocking_with_tracing,
};

use super::{
    error::AuthError,
    password::{DUMMY_PASSWORD_HASH, compute_password_hash, verify_password_hash},
};

/// Emails are compared and stored trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn Store>,
    timeout: Duration,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[tracing::instrument(name = "sign up", skip_all)]
    pub async fn sign_up(&self, email: &str, password: SecretString) -> Result<User, Error> {
        let email = normalize_email(email);

        let existing = bounded(
            self.timeout,
            "get user by email",
            self.store.get_user_by_email(&email),
        )
        .await?;
        if existing.is_some() {
            return Err(AuthError::EmailTaken.into());
        }

        let password_hash = spawn_blocking_with_tracing(move || compute_password_hash(password))
            .await
            .context("compute password hash")
            .map_err(Error::Other)??;

        let user = User {
            id: Uuid::new_v4(),
            email,
        };

        // A concurrent sign-up can still win between the lookup and the insert.
        match bounded(
            self.timeout,
            "insert user",
            self.store.insert_user(&user, &password_hash),
        )
        .await
        {
            Ok(()) => {}
            Err(Error::Database(DatabaseError::UniqueViolation)) => {
                return Err(AuthError::EmailTaken.into());
            }
            Err(e) => return Err(e),
        }

        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    #[tracing::instrument(name = "sign in", skip_all)]
    pub async fn sign_in(&self, email: &str, password: SecretString) -> Result<User, Error> {
        let email = normalize_email(email);

        let found = bounded(
            self.timeout,
            "get user by email",
            self.store.get_user_by_email(&email),
        )
        .await?;

        let (user, password_hash) = match found {
            Some((user, password_hash)) => (Some(user), password_hash),
            None => (None, DUMMY_PASSWORD_HASH.to_string()),
        };

        spawn_blocking_with_tracing(move || verify_password_hash(password_hash, password))
            .await
            .context("verify password hash")
            .map_err(Error::Other)?
            .map_err(|e| match e {
                Error::Auth(AuthError::PasswordError(argon2::password_hash::Error::Password)) => {
                    Error::Auth(AuthError::IncorrectCredential)
                }
                other => other,
            })?;

        user.ok_or(Error::Auth(AuthError::IncorrectCredential))
    }
}
