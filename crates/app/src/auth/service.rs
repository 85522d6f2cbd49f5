//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use milkrun::contact::normalize_email;
use mockall::automock;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{
    AuthServiceError, CustomerIdentity, IssuedSession, SESSION_TOKEN_MIN_LEN,
    generate_session_token, hash_session_token, repository::PgAuthRepository,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Issue a new session token for the customer with `email`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::NotFound`] if no customer has that email, or an error if
    /// the database insert fails.
    pub async fn issue_session(
        &self,
        email: &str,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedSession, AuthServiceError> {
        let token = generate_session_token();

        let metadata = self
            .repository
            .insert_session(
                Uuid::now_v7(),
                &hash_session_token(&token),
                &normalize_email(email),
                expires_at,
            )
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        Ok(IssuedSession { token, metadata })
    }

    /// Revoke a session by its raw token. Returns `true` if the session was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_session(&self, token: &str) -> Result<bool, AuthServiceError> {
        Ok(self
            .repository
            .revoke_session(&hash_session_token(token))
            .await?)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<CustomerIdentity, AuthServiceError> {
        if bearer_token.len() < SESSION_TOKEN_MIN_LEN {
            return Err(AuthServiceError::NotFound);
        }

        let token_hash = hash_session_token(bearer_token);

        let identity = self
            .repository
            .find_session_customer(&token_hash)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        // Best-effort metadata update; auth success should not depend on this write.
        let _touch_result = self.repository.touch_session(&token_hash).await;

        Ok(identity)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a customer session token.
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<CustomerIdentity, AuthServiceError>;
}
