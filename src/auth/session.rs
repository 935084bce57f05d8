use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{
    db::Store,
    deadline::bounded,
    error::Error,
    model::{SessionRecord, User},
};

use super::error::AuthError;

const TOKEN_BYTES: usize = 32;

/// Freshly issued session. The raw token only exists here and in the client cookie;
/// storage keeps its SHA-256 digest.
#[derive(Debug)]
pub struct Session {
    pub token: SecretString,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn Store>,
    ttl: chrono::Duration,
    timeout: Duration,
}

impl SessionStore {
    pub fn new(store: Arc<dyn Store>, ttl: chrono::Duration) -> Self {
        Self {
            store,
            ttl,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[tracing::instrument(name = "create session", skip_all, fields(user_id = %user_id))]
    pub async fn create_session(&self, user_id: Uuid) -> Result<Session, Error> {
        let token = generate_token();
        let created_at = Utc::now();
        let record = SessionRecord {
            token_hash: hash_token(&token),
            user_id,
            created_at,
            expires_at: created_at + self.ttl,
        };

        bounded(
            self.timeout,
            "insert session",
            self.store.insert_session(&record),
        )
        .await?;

        Ok(Session {
            token: token.into(),
            user_id,
            created_at,
            expires_at: record.expires_at,
        })
    }

    /// Resolves a raw token to its user. Unknown and expired tokens are both
    /// `Unauthenticated`; an expired record is dropped on sight.
    #[tracing::instrument(name = "validate session", skip_all)]
    pub async fn validate_session(&self, token: &str) -> Result<Uuid, Error> {
        if token.is_empty() {
            return Err(AuthError::Unauthenticated.into());
        }

        let token_hash = hash_token(token);
        let record = bounded(
            self.timeout,
            "get session",
            self.store.get_session(&token_hash),
        )
        .await?
        .ok_or(AuthError::Unauthenticated)?;

        if record.is_expired(Utc::now()) {
            bounded(
                self.timeout,
                "delete session",
                self.store.delete_session(&token_hash),
            )
            .await?;

            return Err(AuthError::Unauthenticated.into());
        }

        Ok(record.user_id)
    }

    /// Removing a token that was never issued is not an error.
    #[tracing::instrument(name = "destroy session", skip_all)]
    pub async fn destroy_session(&self, token: &str) -> Result<(), Error> {
        if token.is_empty() {
            return Ok(());
        }

        bounded(
            self.timeout,
            "delete session",
            self.store.delete_session(&hash_token(token)),
        )
        .await?;

        Ok(())
    }

    /// The user behind a token, or `None` when there is no valid session.
    #[tracing::instrument(name = "current user", skip_all)]
    pub async fn current_user(&self, token: Option<&str>) -> Result<Option<User>, Error> {
        let Some(token) = token else {
            return Ok(None);
        };

        let user_id = match self.validate_session(token).await {
            Ok(user_id) => user_id,
            Err(Error::Auth(AuthError::Unauthenticated)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let user = bounded(
            self.timeout,
            "get user by id",
            self.store.get_user_by_id(user_id),
        )
        .await?;

        Ok(user)
    }

    #[tracing::instrument(name = "purge expired sessions", skip_all)]
    pub async fn purge_expired(&self) -> Result<u64, Error> {
        let removed = bounded(
            self.timeout,
            "delete expired sessions",
            self.store.delete_expired_sessions(Utc::now()),
        )
        .await?;

        Ok(removed)
    }

    #[cfg(test)]
    pub(crate) async fn insert_raw(&self, token: &str, record: SessionRecord) -> Result<(), Error> {
        let record = SessionRecord {
            token_hash: hash_token(token),
            ..record
        };
        self.store.insert_session(&record).await?;
        Ok(())
    }
}

pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}

pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

impl Session {
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }
}
